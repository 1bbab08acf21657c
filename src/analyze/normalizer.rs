//! URL validation and canonicalization
//!
//! User input is stored in canonical `scheme://host` form: path, query, and
//! fragment are discarded so that `https://Example.com/about?x=1` and
//! `https://example.com` dedup to the same entry.

use thiserror::Error;
use url::Url;

use crate::types::MAX_FIELD_CHARS;

/// Errors from URL normalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("URL is empty")]
    EmptyInput,
    #[error("URL exceeds {MAX_FIELD_CHARS} characters")]
    TooLong,
    #[error("URL is not a well-formed absolute URL")]
    InvalidFormat,
}

/// Validate a raw input string and reduce it to its canonical host.
///
/// The `url` crate lowercases scheme and host during parsing, so two inputs
/// differing only in case or surrounding whitespace produce the same
/// canonical form. A non-default port is part of the authority and is kept.
pub fn normalize(raw: &str) -> Result<String, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::EmptyInput);
    }
    if trimmed.chars().count() > MAX_FIELD_CHARS {
        return Err(NormalizeError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|_| NormalizeError::InvalidFormat)?;
    let host = url.host_str().ok_or(NormalizeError::InvalidFormat)?;

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_scheme_and_host_only() {
        assert_eq!(normalize("https://example.com").unwrap(), "https://example.com");
        assert_eq!(normalize("http://test.ru/path").unwrap(), "http://test.ru");
        assert_eq!(
            normalize("https://example.com/a/b?q=1#frag").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_normalize_is_case_and_whitespace_insensitive() {
        let a = normalize("https://Example.COM/path").unwrap();
        let b = normalize("  https://example.com  ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_keeps_explicit_port() {
        assert_eq!(
            normalize("http://example.com:8080/x").unwrap(),
            "http://example.com:8080"
        );
    }

    #[test]
    fn test_normalize_rejects_empty_input() {
        assert_eq!(normalize(""), Err(NormalizeError::EmptyInput));
        assert_eq!(normalize("   \t "), Err(NormalizeError::EmptyInput));
    }

    #[test]
    fn test_normalize_rejects_overlong_input() {
        let long = format!("https://{}.com", "a".repeat(300));
        assert_eq!(normalize(&long), Err(NormalizeError::TooLong));
    }

    #[test]
    fn test_normalize_rejects_malformed_input() {
        assert_eq!(normalize("not-a-url"), Err(NormalizeError::InvalidFormat));
        assert_eq!(normalize("example.com"), Err(NormalizeError::InvalidFormat));
        // Parses as a URL but has no host
        assert_eq!(normalize("mailto:me@example.com"), Err(NormalizeError::InvalidFormat));
    }
}
