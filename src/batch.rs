use crate::client::Client;
use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::error::{Error, Result};
use crate::utils::{calculate_compression_ratio, generate_output_path, is_image_file};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Totals gathered over one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_before: u64,
    pub total_after: u64,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_before, self.total_after)
    }

    pub fn files_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Shrinks every image found under `input` into `output`.
///
/// Each file is an independent shrink call with its own output path, so the
/// calls run side by side on a dedicated rayon pool. Directory inputs keep
/// their layout under `output`. Files the service rejects, files without a
/// usable output and files whose output path is already taken are counted
/// as failures and do not stop the batch.
///
/// # Arguments
/// * `client` - Client shared by all worker threads
/// * `input` - A file, a directory or a glob pattern
/// * `output` - Directory receiving the compressed files
/// * `recursive` - Descend into subdirectories when `input` is a directory
/// * `threads` - Worker count, defaults to the number of CPUs
pub fn batch_shrink_images(
    client: &Client,
    input: &str,
    output: &Path,
    recursive: bool,
    threads: Option<usize>,
) -> Result<BatchSummary> {
    let start_time = Instant::now();

    let image_files = collect_image_files(input, recursive)?;
    let input_root = Path::new(input)
        .is_dir()
        .then(|| Path::new(input).canonicalize())
        .transpose()?;
    let total_files = image_files.len();
    if total_files == 0 {
        return Ok(BatchSummary::default());
    }

    let parallelism = threads.unwrap_or_else(num_cpus::get).clamp(1, total_files);
    debug!(files = total_files, threads = parallelism, "starting batch");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()?;

    fs::create_dir_all(output)?;
    let targets = plan_output_paths(&image_files, input_root.as_deref(), output);

    let progress = ProgressBar::new(total_files as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let processed_count = AtomicUsize::new(0);
    let failed_count = AtomicUsize::new(0);
    let total_size_before = AtomicU64::new(0);
    let total_size_after = AtomicU64::new(0);

    pool.install(|| {
        image_files.par_iter().zip(targets).for_each(|(input_path, target)| {
            let outcome = target
                .and_then(|output_path| process_single_image(client, input_path, &output_path));
            match outcome {
                Ok((before_size, after_size)) => {
                    total_size_before.fetch_add(before_size, Ordering::Relaxed);
                    total_size_after.fetch_add(after_size, Ordering::Relaxed);
                    processed_count.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error!(path = ?input_path, "failed to shrink: {}", e);
                    progress.println(format!("❌ Failed to process {:?}: {}", input_path, e));
                    failed_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            progress.inc(1);
        });
    });

    progress.finish_with_message("✅ Batch shrink complete");

    Ok(BatchSummary {
        processed: processed_count.into_inner(),
        failed: failed_count.into_inner(),
        total_before: total_size_before.into_inner(),
        total_after: total_size_after.into_inner(),
        elapsed: start_time.elapsed(),
    })
}

pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        image_files.push(input_path.canonicalize()?);
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path).into_iter()
        } else {
            WalkDir::new(input_path).max_depth(1).into_iter()
        };

        for entry in walker.filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
        }) {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_image_file(path) {
                if let Ok(canonical_path) = path.canonicalize() {
                    image_files.push(canonical_path);
                }
            }
        }
    } else if let Ok(glob_pattern) = glob(input) {
        for entry in glob_pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) {
                if let Ok(canonical_path) = entry.canonicalize() {
                    image_files.push(canonical_path);
                }
            }
        }
    } else {
        return Err(Error::NoImageFilesFound(input.to_string()));
    }

    image_files.sort();
    Ok(image_files)
}

/// Pairs every input with its output path, in order. An input whose output
/// path was already handed to an earlier input gets `Error::DuplicateOutput`,
/// so no two parallel shrinks ever write the same file.
pub fn plan_output_paths(
    image_files: &[PathBuf],
    input_root: Option<&Path>,
    output_dir: &Path,
) -> Vec<Result<PathBuf>> {
    let mut claimed = HashSet::new();

    image_files
        .iter()
        .map(|input_path| {
            let output_path = generate_output_path(input_path, input_root, output_dir)?;
            if claimed.insert(output_path.clone()) {
                Ok(output_path)
            } else {
                Err(Error::DuplicateOutput(output_path))
            }
        })
        .collect()
}

fn process_single_image(client: &Client, input_path: &Path, output_path: &Path) -> Result<(u64, u64)> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let result = client.shrink(input_path, Some(output_path), None)?;

    if result.is_error() {
        return Err(Error::Api {
            code: result.error.unwrap_or_default(),
            message: result.message.unwrap_or_default(),
        });
    }

    let after = match (&result.output, result.output_url()) {
        (Some(output), Some(_)) => output.size,
        _ => return Err(Error::MissingOutputUrl),
    };
    let before = match &result.input {
        Some(input) => input.size,
        None => fs::metadata(input_path)?.len(),
    };

    Ok((before, after))
}
