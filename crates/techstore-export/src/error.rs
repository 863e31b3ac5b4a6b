//! Export error types.

use thiserror::Error;

/// Document rendering failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(String),

    #[error("could not serialize rows: {0}")]
    Rows(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<xlsxwriter::XlsxError> for ExportError {
    fn from(err: xlsxwriter::XlsxError) -> Self {
        ExportError::Spreadsheet(err.to_string())
    }
}

/// Convenience type alias for Results with ExportError.
pub type ExportResult<T> = Result<T, ExportError>;
