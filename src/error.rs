use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no BODY tag found in the document")]
    NoBody,

    #[error("more than one BODY tag found in the document ({0})")]
    MultipleBodies(usize),

    #[error("malformed XHTML: {0}")]
    Malformed(String),

    #[error("document has no root element")]
    EmptyDocument,

    #[error("unable to parse XML document: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
