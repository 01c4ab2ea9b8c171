//! Common validation rules shared across request payloads and path parameters.

use validator::ValidationError;

/// Validates a webhook source token used as a directory name.
///
/// Requirements:
/// - 1-64 characters in length
/// - Only ASCII alphanumerics, `-` and `_`
pub fn validate_source_token(source: &str) -> Result<(), ValidationError> {
    if source.is_empty() || source.len() > 64 {
        return Err(ValidationError::new("source_invalid_length"));
    }

    if !source
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::new("source_invalid_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_rejects_empty() {
        assert!(validate_source_token("").is_err());
    }

    #[test]
    fn source_rejects_path_separators() {
        assert!(validate_source_token("../etc").is_err());
        assert!(validate_source_token("a/b").is_err());
        assert!(validate_source_token("a\\b").is_err());
        assert!(validate_source_token("..").is_err());
    }

    #[test]
    fn source_rejects_too_long() {
        assert!(validate_source_token(&"s".repeat(65)).is_err());
    }

    #[test]
    fn source_accepts_platform_names() {
        assert!(validate_source_token("stripe").is_ok());
        assert!(validate_source_token("facebook_lead_ads").is_ok());
        assert!(validate_source_token("zapier-2").is_ok());
    }
}
