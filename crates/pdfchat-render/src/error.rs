use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document has no content")]
    EmptyDocument,

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}
