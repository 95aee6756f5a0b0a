use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tiny_squeeze::cli::{Args, Commands};
use tiny_squeeze::constants::{
    API_KEY_ENV, COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ERROR_PREFIX,
    ORIGINAL_SIZE_PREFIX, SUCCESS_PREFIX,
};
use tiny_squeeze::utils::{calculate_compression_ratio, create_progress_spinner, format_file_size};
use tiny_squeeze::{
    batch_shrink_images, logger, report, report_warn, Client, ResizeMethod, ShrinkResult,
    StoreTarget,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);
    logger::set_quiet_mode(args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", ERROR_PREFIX, e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tiny_squeeze={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let api_key = args
        .api_key
        .with_context(|| format!("no API key given, pass --api-key or set {}", API_KEY_ENV))?;

    let mut client = Client::new(&api_key).context("failed to build API client")?;
    if let Some(endpoint) = args.endpoint {
        client = client.with_endpoint(endpoint);
    }

    match args.command {
        Commands::Shrink {
            input,
            output,
            store,
        } => {
            shrink_one(&client, &input, output.as_deref(), store.to_target().as_ref())?;
        }
        Commands::Resize {
            input,
            output,
            method,
            width,
            height,
            store,
        } => {
            if method == ResizeMethod::Scale && (width > 0) == (height > 0) {
                report_warn!("scale expects exactly one of --width or --height");
            }
            let result = shrink_one(&client, &input, None, None)?;

            let pb = create_progress_spinner(&format!("Requesting {} resize...", method.as_str()));
            let store = store.to_target();
            let output_path = Some(output.as_path());
            let data = match method {
                ResizeMethod::Cover => client.cover(&result, width, height, output_path, store.as_ref()),
                ResizeMethod::Fit => client.fit(&result, width, height, output_path, store.as_ref()),
                ResizeMethod::Scale => client.scale(&result, width, height, output_path, store.as_ref()),
            }
            .with_context(|| format!("{} resize failed", method.as_str()))?;
            pb.finish_and_clear();

            report!(
                "{} Resized ({}) to {:?}: {}",
                SUCCESS_PREFIX,
                method.as_str(),
                output,
                format_file_size(data.len() as u64)
            );
        }
        Commands::Batch {
            input,
            output,
            recursive,
            threads,
        } => {
            report!("🚀 Starting batch shrink...");
            report!("📁 Input: {}", input);
            report!("📁 Output: {:?}", output);

            let summary = batch_shrink_images(&client, &input, &output, recursive, threads)?;
            if summary.processed == 0 && summary.failed == 0 {
                report_warn!("No image files found in the input path");
                return Ok(());
            }

            report!("\n📊 Batch Summary:");
            report!("  📁 Total files processed: {}", summary.processed);
            report!("  📊 Total original size: {}", format_file_size(summary.total_before));
            report!("  📊 Total compressed size: {}", format_file_size(summary.total_after));
            report!("  🎯 Overall compression ratio: {:.1}%", summary.compression_ratio());
            report!("  ⏱️  Total time: {:?}", summary.elapsed);
            report!("  ⚡ Average speed: {:.2} files/second", summary.files_per_second());
            if summary.failed > 0 {
                bail!("{} of {} files failed", summary.failed, summary.failed + summary.processed);
            }
        }
    }

    Ok(())
}

fn shrink_one(
    client: &Client,
    input: &Path,
    output: Option<&Path>,
    store: Option<&StoreTarget>,
) -> Result<ShrinkResult> {
    report!("🗜️  Shrinking image: {:?}", input);

    let pb = create_progress_spinner("Uploading...");
    let result = client
        .shrink(input, output, store)
        .with_context(|| format!("failed to shrink {:?}", input))?;
    pb.finish_and_clear();

    if let Some(code) = &result.error {
        bail!(
            "service rejected {:?}: {} ({})",
            input,
            result.message.as_deref().unwrap_or("no message"),
            code
        );
    }

    if let (Some(before), Some(after)) = (&result.input, &result.output) {
        report!("{} {}", ORIGINAL_SIZE_PREFIX, format_file_size(before.size));
        report!("{} {}", COMPRESSED_SIZE_PREFIX, format_file_size(after.size));
        report!(
            "{} {:.1}%",
            COMPRESSION_RATIO_PREFIX,
            calculate_compression_ratio(before.size, after.size)
        );
    }
    if let Some(output) = output {
        if result.output_url().is_some() {
            if let Some(store) = store {
                report!("{} Stored to s3://{}", SUCCESS_PREFIX, store.path);
            }
            report!("{} Saved to {:?}", SUCCESS_PREFIX, output);
        } else {
            report_warn!("Service returned no output URL, nothing saved to {:?}", output);
        }
    }

    Ok(result)
}
