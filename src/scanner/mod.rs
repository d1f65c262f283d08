//! Label photo discovery

use crate::error::{Result, WeinScanError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// Path below the scanned folder, `/`-separated
    pub relative_path: String,
    /// `<stem>.txt` next to the image; its content replaces OCR
    pub sidecar: Option<PathBuf>,
}

impl ImageInfo {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let sidecar = Some(path.with_extension("txt")).filter(|p| p.is_file());

        Self {
            path: path.to_path_buf(),
            relative_path: file_name.clone(),
            file_name,
            sidecar,
        }
    }

    fn relative_to(mut self, root: &Path) -> Self {
        if let Ok(rel) = self.path.strip_prefix(root) {
            self.relative_path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
        }
        self
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// Images in `folder`, sorted by relative path. Subfolders only with
/// `recursive`.
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(WeinScanError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| ImageInfo::from_path(e.path()).relative_to(folder))
        .collect();

    images.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    tracing::debug!(folder = %folder.display(), count = images.len(), "scanned photo folder");

    Ok(images)
}
