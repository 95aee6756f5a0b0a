/// Helper functions shared by the client and the command-line front end.
use crate::constants::{PROGRESS_SPINNER_TEMPLATE, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Check if a file path carries an extension the service accepts
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Create a progress spinner with consistent styling
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(PROGRESS_SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

/// Mirrors `input_path` under `output_dir`, relative to `input_root` when the
/// file lives below it, otherwise by file name alone
pub fn generate_output_path(
    input_path: &Path,
    input_root: Option<&Path>,
    output_dir: &Path,
) -> Result<PathBuf> {
    if let Some(relative) = input_root.and_then(|root| input_path.strip_prefix(root).ok()) {
        if relative.file_name().is_some() {
            return Ok(output_dir.join(relative));
        }
    }

    let file_name = input_path
        .file_name()
        .ok_or_else(|| Error::NoImageFilesFound(input_path.display().to_string()))?;
    Ok(output_dir.join(file_name))
}

/// Format file size in human-readable format
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Percentage of the original size removed by compression
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("test.jpg")));
        assert!(is_image_file(Path::new("test.JPEG")));
        assert!(is_image_file(Path::new("test.png")));
        assert!(is_image_file(Path::new("test.webp")));
        assert!(!is_image_file(Path::new("test.txt")));
        assert!(!is_image_file(Path::new("test")));
    }

    #[test]
    fn test_generate_output_path_keeps_name() {
        let output =
            generate_output_path(Path::new("/in/photo.png"), None, Path::new("/out")).unwrap();
        assert_eq!(output, PathBuf::from("/out/photo.png"));
    }

    #[test]
    fn test_generate_output_path_mirrors_subdirectories() {
        let root = Path::new("/in");
        let a = generate_output_path(Path::new("/in/a/x.png"), Some(root), Path::new("/out"));
        let b = generate_output_path(Path::new("/in/b/x.png"), Some(root), Path::new("/out"));
        assert_eq!(a.unwrap(), PathBuf::from("/out/a/x.png"));
        assert_eq!(b.unwrap(), PathBuf::from("/out/b/x.png"));
    }

    #[test]
    fn test_generate_output_path_outside_root_uses_name() {
        let output = generate_output_path(
            Path::new("/elsewhere/photo.png"),
            Some(Path::new("/in")),
            Path::new("/out"),
        )
        .unwrap();
        assert_eq!(output, PathBuf::from("/out/photo.png"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_calculate_compression_ratio() {
        assert_eq!(calculate_compression_ratio(1000, 800), 20.0);
        assert_eq!(calculate_compression_ratio(1000, 1000), 0.0);
        assert_eq!(calculate_compression_ratio(0, 100), 0.0);
    }
}
