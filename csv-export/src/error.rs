//! FILENAME: csv-export/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid questionnaire document: {0}")]
    InvalidDocument(String),

    #[error("Exported text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
