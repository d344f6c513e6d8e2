use thiserror::Error;

#[derive(Error, Debug)]
pub enum MashupError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("SPARQL endpoint error: {message}")]
    SparqlError { message: String },

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigFileError(#[from] toml::de::Error),

    #[error("Invalid config value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Model error: {message}")]
    ModelError { message: String },

    #[error("Unknown object kind tag: '{tag}'")]
    UnknownObjectKind { tag: String },

    #[error("Activity id '{activity_id}' has no known kind prefix")]
    UnknownActivityKind { activity_id: String },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

pub type Result<T> = std::result::Result<T, MashupError>;
