use crate::models::{ResizeMethod, StoreTarget};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tiny-squeeze",
    about = "Compress and resize images through the Tinify API",
    long_about = "tiny-squeeze uploads images to the Tinify compression service, downloads the \
                  compressed results and can request cover, fit and scale resizes of an uploaded \
                  image. Results can also be pushed straight to an S3 bucket by the service.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    tiny-squeeze shrink photo.jpg photo.min.jpg\n  \
    tiny-squeeze resize photo.jpg thumb.jpg -m cover -w 200 -H 200\n  \
    tiny-squeeze batch \"./images/*.png\" ./compressed -j 4\n  \
    tiny-squeeze shrink photo.png out.png --store-key-id ... --store-secret ... --store-region us-west-1 --store-path bucket/photo.png"
)]
pub struct Args {
    #[arg(
        long,
        global = true,
        env = "TINIFY_API_KEY",
        hide_env_values = true,
        help = "Tinify API key"
    )]
    pub api_key: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Override the shrink endpoint",
        long_help = "Send uploads to a different shrink endpoint, for example a proxy. \
                     Default: https://api.tinify.com/shrink"
    )]
    pub endpoint: Option<String>,

    #[arg(short, long, global = true, help = "Log request details")]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single image",
        long_about = "Upload an image for compression and optionally download the result. \
                      With the --store-* options the service also writes the result to S3."
    )]
    Shrink {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Where to save the compressed image")]
        output: Option<PathBuf>,

        #[command(flatten)]
        store: StoreArgs,
    },

    #[command(
        about = "Compress an image, then resize it",
        long_about = "Upload an image, then ask the service for a resized variant. \
                      cover crops to the exact size, fit keeps the aspect ratio inside the box, \
                      scale needs exactly one of --width or --height."
    )]
    Resize {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Where to save the resized image")]
        output: PathBuf,

        #[arg(short, long, help = "Resize method (cover, fit, scale)")]
        method: ResizeMethod,

        #[arg(short = 'w', long, default_value_t = 0, help = "Target width in pixels")]
        width: u32,

        #[arg(short = 'H', long, default_value_t = 0, help = "Target height in pixels")]
        height: u32,

        #[command(flatten)]
        store: StoreArgs,
    },

    #[command(
        about = "Compress many images in parallel",
        long_about = "Compress every image in a directory, a single file or a glob pattern. \
                      Each file is uploaded and downloaded independently."
    )]
    Batch {
        #[arg(
            help = "Input directory, file pattern, or glob",
            long_help = "Input can be a directory path, file pattern, or glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.png'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,

        #[arg(short = 'j', long, help = "Number of parallel uploads (default: CPU count)")]
        threads: Option<usize>,
    },
}

/// S3 destination the service should push results to.
#[derive(ClapArgs, Debug, Default)]
pub struct StoreArgs {
    #[arg(
        long,
        requires_all = ["store_secret", "store_region", "store_path"],
        help = "AWS access key id for the store target"
    )]
    pub store_key_id: Option<String>,

    #[arg(long, requires = "store_key_id", help = "AWS secret access key")]
    pub store_secret: Option<String>,

    #[arg(long, requires = "store_key_id", help = "AWS region, e.g. us-west-1")]
    pub store_region: Option<String>,

    #[arg(long, requires = "store_key_id", help = "Bucket and key, e.g. bucket/image.png")]
    pub store_path: Option<String>,
}

impl StoreArgs {
    pub fn to_target(&self) -> Option<StoreTarget> {
        match (
            &self.store_key_id,
            &self.store_secret,
            &self.store_region,
            &self.store_path,
        ) {
            (Some(key_id), Some(secret), Some(region), Some(path)) => Some(StoreTarget::new(
                key_id.as_str(),
                secret.as_str(),
                region.as_str(),
                path.as_str(),
            )),
            _ => None,
        }
    }
}
