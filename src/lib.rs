//! Convert HTML/XHTML documents to LaTeX.
//!
//! Every element is handed to the handler registered for its tag name; text
//! is escaped, tables are laid out with a fixed column count, and tags
//! without a handler show up as a red error box holding their content.
//!
//! ```no_run
//! use htmltex::{normalize_headings, HtmlTexer, TexConfig};
//!
//! let html = normalize_headings("<html><body><h2>Intro</h2><p>Hi</p></body></html>");
//! let texer = HtmlTexer::new(TexConfig::default());
//! let doc = texer.parse(&html)?;
//! for url in doc.images() {
//!     // Fetch `url` into the image folder under this name plus its extension.
//!     let _name = htmltex::image_id(&url);
//! }
//! println!("{}", doc.tex()?);
//! # Ok::<(), htmltex::Error>(())
//! ```

pub mod context;
pub mod dispatch;
pub mod document;
pub mod dom;
pub mod error;
pub mod escape;
pub mod headings;
pub mod images;
pub mod parse;
pub mod table;
pub mod wiki;

pub use context::{Context, Diagnostic, TexConfig};
pub use dispatch::{Dispatcher, Override};
pub use document::{Document, HtmlTexer, Rendered};
pub use dom::{Element, Node};
pub use error::{Error, Result};
pub use escape::latex_escape;
pub use headings::{fix_headings, normalize_headings};
pub use images::{image_id, FolderImages, ImageStore, NoImages};
