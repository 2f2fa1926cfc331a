use thiserror::Error;

/// Fatal failures of a conversion run.
///
/// Non-fatal outcomes (unresolved hierarchy references, missing image files)
/// are reported as values instead; see [`crate::SkippedNode`] and
/// [`crate::RenderReport`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The input is missing a required structural section, or a requirement
    /// object has no identifier.
    #[error("malformed ReqIF document: {0}")]
    MalformedDocument(String),

    /// An existing image could not be decoded, or the PDF could not be produced.
    #[error("render error: {0}")]
    Render(String),
}
