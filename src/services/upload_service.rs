//! Upload service - capability layer
//!
//! Scans the configured invoice folder and pushes each file to the site,
//! collecting the File doc references the batch will convert. Uploads run
//! before the batch and are not part of batch progress.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::clients::FrappeClient;
use crate::error::{AppError, AppResult, FileError};
use crate::models::UploadedFile;

/// Extensions the conversion backend accepts.
const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "tif", "tiff"];

pub struct UploadService {
    client: Arc<FrappeClient>,
}

impl UploadService {
    pub fn new(client: Arc<FrappeClient>) -> Self {
        Self { client }
    }

    /// Uploads every file in order; any failed upload aborts the run
    /// before a batch ever starts.
    pub async fn upload_all(&self, paths: &[PathBuf]) -> AppResult<Vec<UploadedFile>> {
        let mut uploaded = Vec::with_capacity(paths.len());
        for path in paths {
            let file = self.client.upload_file(path).await?;
            info!("✓ Uploaded {}", file);
            uploaded.push(file);
        }
        Ok(uploaded)
    }
}

/// Collects the invoice files under `folder`, sorted by name so runs are
/// deterministic. Unsupported files are skipped silently.
pub fn scan_invoice_folder(folder: &Path) -> AppResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder.to_string_lossy().to_string(),
        }));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(folder)
        .map_err(|e| AppError::file_read_failed(folder.to_string_lossy(), e))?
    {
        let entry = entry.map_err(|e| AppError::file_read_failed(folder.to_string_lossy(), e))?;
        let path = entry.path();
        if path.is_file() && is_supported(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a/invoice.pdf")));
        assert!(is_supported(Path::new("scan.JPEG")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    #[test]
    fn test_scan_missing_folder_errors() {
        let result = scan_invoice_folder(Path::new("definitely/not/a/folder"));
        assert!(matches!(
            result,
            Err(AppError::File(FileError::DirectoryNotFound { .. }))
        ));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = std::env::temp_dir().join(format!("i2e-scan-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.pdf"), b"x").unwrap();
        std::fs::write(dir.join("a.png"), b"x").unwrap();
        std::fs::write(dir.join("skip.txt"), b"x").unwrap();

        let paths = scan_invoice_folder(&dir).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.pdf"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
