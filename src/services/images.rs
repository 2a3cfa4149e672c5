//! Key-addressed blob store for uploaded product images.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Public path prefix under which stored images are served.
pub const PUBLIC_IMAGES_PREFIX: &str = "/images";

/// Stores uploaded images in a flat directory under collision-free names.
///
/// Files are never deduplicated or deleted; replacing a product image or
/// deleting a product leaves the previous file behind.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if it does not exist yet.
    pub fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    /// Copy the file at `source` into the store under a fresh name that
    /// keeps the extension of `original_name`, returning the relative path
    /// the image will be served under.
    pub fn store(&self, source: &Path, original_name: Option<&str>) -> io::Result<String> {
        self.ensure_root()?;

        let mut file_name = Uuid::new_v4().to_string();
        let extension = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str());
        if let Some(extension) = extension {
            file_name.push('.');
            file_name.push_str(extension);
        }

        fs::copy(source, self.root.join(&file_name))?;

        Ok(format!("{PUBLIC_IMAGES_PREFIX}/{file_name}"))
    }
}
