//! Input checks run before any backend call.

use crate::errors::ValidationError;

/// Returns the trimmed query, rejecting empty and whitespace-only input.
pub fn validate_query(query: &str) -> Result<String, ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(trimmed.to_string())
}

/// Accepts `12345` or `12345-6789`. Blank input means "no zip code".
pub fn validate_zip_code(zip_code: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = zip_code else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (base, extension) = match trimmed.split_once('-') {
        Some((base, extension)) => (base, Some(extension)),
        None => (trimmed, None),
    };
    let digits = |part: &str, len: usize| {
        part.len() == len && part.chars().all(|ch| ch.is_ascii_digit())
    };

    let valid = digits(base, 5) && extension.map(|extension| digits(extension, 4)).unwrap_or(true);
    if !valid {
        return Err(ValidationError::InvalidZipCode(trimmed.to_string()));
    }
    Ok(Some(trimmed.to_string()))
}
