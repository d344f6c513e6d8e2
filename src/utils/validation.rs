use crate::utils::error::{MashupError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Backend endpoints must be absolute http(s) URLs.
pub fn validate_endpoint_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(MashupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(MashupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MashupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Accepts `.db` files and the rusqlite `:memory:` marker.
pub fn validate_db_path(field_name: &str, path: &str) -> Result<()> {
    if path == ":memory:" || path.ends_with(".db") {
        return Ok(());
    }
    Err(MashupError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: path.to_string(),
        reason: "Database path must end in .db or be :memory:".to_string(),
    })
}

pub fn validate_file_extension(field_name: &str, path: &str, extension: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MashupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    match std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if ext == extension => Ok(()),
        Some(ext) => Err(MashupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!("Unsupported file extension: {} (expected .{})", ext, extension),
        }),
        None => Err(MashupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MashupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
