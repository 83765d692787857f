// Image lookup for <img> elements.
//
// Images are fetched by the caller before rendering and stored under a
// content-addressed name: the MD5 hex digest of the `src` attribute plus a
// file extension (`img/foo.jpg` -> `ab502eb247b65f597780a4ee53c2fabd.jpg`).
// The converter only asks whether such a file exists.

use std::path::PathBuf;

/// Content-addressed file stem for an image `src`.
pub fn image_id(src: &str) -> String {
    format!("{:x}", md5::compute(src.as_bytes()))
}

/// Existence check for prepared image files.
pub trait ImageStore: Send + Sync {
    /// Returns the matching extension (e.g. `.png`) if a file for `id` exists.
    fn find(&self, id: &str) -> Option<String>;
}

/// Looks files up in a folder on disk, trying each extension in order.
#[derive(Debug, Clone)]
pub struct FolderImages {
    folder: PathBuf,
    extensions: Vec<String>,
}

impl FolderImages {
    pub fn new(folder: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            folder: folder.into(),
            extensions: extensions.to_vec(),
        }
    }
}

impl ImageStore for FolderImages {
    fn find(&self, id: &str) -> Option<String> {
        self.extensions
            .iter()
            .find(|ext| self.folder.join(format!("{id}{ext}")).exists())
            .cloned()
    }
}

/// A store that never finds anything. Every image renders as a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageStore for NoImages {
    fn find(&self, _id: &str) -> Option<String> {
        None
    }
}
