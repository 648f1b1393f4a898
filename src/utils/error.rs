use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrightloomError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Missing field `{field}` in {context}")]
    MissingFieldError { field: String, context: String },

    #[error("Unexpected data shape: {message}")]
    DataShapeError { message: String },
}

pub type Result<T> = std::result::Result<T, BrightloomError>;
