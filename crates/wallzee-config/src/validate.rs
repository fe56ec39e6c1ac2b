//! Field parsing helpers for environment overrides.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse an absolute http(s) endpoint, dropping any trailing slash.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for unparsable URLs or other schemes.
pub fn parse_endpoint(field: &'static str, value: &str) -> ConfigResult<String> {
    let parsed = Url::parse(value.trim()).map_err(|_| ConfigError::InvalidField {
        field,
        value: Some(value.to_string()),
        reason: "must be an absolute URL",
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidField {
            field,
            value: Some(value.to_string()),
            reason: "must use http or https",
        });
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Require a non-blank identifier.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] for blank values.
pub fn parse_identifier(field: &'static str, value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

/// Parse a strictly positive integer.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for non-numeric or zero values.
pub fn parse_positive(field: &'static str, value: &str) -> ConfigResult<u64> {
    let number: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidField {
            field,
            value: Some(value.to_string()),
            reason: "must be a positive integer",
        })?;
    if number == 0 {
        return Err(ConfigError::InvalidField {
            field,
            value: Some(value.to_string()),
            reason: "must be greater than zero",
        });
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_normalized() {
        assert_eq!(
            parse_endpoint("E", "https://cloud.example.com/v1/").unwrap(),
            "https://cloud.example.com/v1"
        );
        assert!(parse_endpoint("E", "ftp://x").is_err());
        assert!(parse_endpoint("E", "not a url").is_err());
    }

    #[test]
    fn identifiers_must_not_be_blank() {
        assert_eq!(
            parse_identifier("ID", "  "),
            Err(ConfigError::MissingField { field: "ID" })
        );
        assert_eq!(parse_identifier("ID", " abc ").unwrap(), "abc");
    }

    #[test]
    fn positive_numbers() {
        assert_eq!(parse_positive("N", "12").unwrap(), 12);
        assert!(parse_positive("N", "0").is_err());
        assert!(parse_positive("N", "-1").is_err());
    }
}
