use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read Word document: {0}")]
    Word(String),
}
