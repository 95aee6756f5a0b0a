pub mod batch;
pub mod cli;
pub mod client;
pub mod constants;
pub mod error;
pub mod logger;
pub mod models;
pub mod utils;

pub use batch::{batch_shrink_images, collect_image_files, plan_output_paths, BatchSummary};
pub use client::Client;
pub use error::{Error, Result};
pub use models::{
    ImageInput, ImageOutput, Resize, ResizeMethod, ShrinkResult, StoreTarget, TransformOptions,
};
pub use utils::{generate_output_path, is_image_file};
