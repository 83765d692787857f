// Per-run conversion state and configuration.

use crate::images::ImageStore;
use std::fmt;
use std::path::PathBuf;

/// Converter settings.
#[derive(Debug, Clone)]
pub struct TexConfig {
    /// Custom LaTeX preamble (document class, packages, title...).
    pub preamble: String,
    /// Folder holding the prepared image files.
    pub image_folder: PathBuf,
    /// Image file extensions, in lookup order.
    pub supported_images: Vec<String>,
    /// Emit `\maketitle` right after `\begin{document}`.
    pub maketitle: bool,
    /// Width budget, in `ex`, shared by the columns of an autoscaled table.
    pub table_width: u32,
    pub debug: bool,
}

impl Default for TexConfig {
    fn default() -> Self {
        Self {
            preamble: String::new(),
            image_folder: PathBuf::new(),
            supported_images: [".jpg", ".png", ".pdf", ".gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            maketitle: true,
            table_width: 80,
            debug: false,
        }
    }
}

/// Something that degraded the output without aborting the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No handler for this tag; its content was rendered in an error box.
    Unimplemented { tag: String },
    /// No prepared file for this image; a placeholder was rendered.
    MissingImage { src: String, id: String },
    /// Autoscaled table whose cells are all empty; columns got equal widths.
    EmptyTable { columns: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Unimplemented { tag } => write!(f, "<{tag}> not yet implemented"),
            Diagnostic::MissingImage { src, id } => {
                write!(f, "image {src} ({id}) not found")
            }
            Diagnostic::EmptyTable { columns } => {
                write!(f, "autoscaled table with {columns} empty columns")
            }
        }
    }
}

/// State threaded through one render.
pub struct Context<'a> {
    pub config: &'a TexConfig,
    pub store: &'a dyn ImageStore,
    /// `src` of every image rendered so far, duplicates included.
    pub images: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a TexConfig, store: &'a dyn ImageStore) -> Self {
        Self {
            config,
            store,
            images: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, d: Diagnostic) {
        log::warn!("{d}");
        self.diagnostics.push(d);
    }
}
