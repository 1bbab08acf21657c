//! Core record types shared across the store, service, and surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length of a canonical host and of each extracted SEO field.
pub const MAX_FIELD_CHARS: usize = 255;

/// A stored URL entry. Immutable after creation; history accrues as checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Store-assigned identifier
    pub id: u64,
    /// Canonical `scheme://host` form, the dedup key
    pub host: String,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
}

/// SEO signals extracted from a fetched page.
///
/// Fields are always present; absent data is the empty string, and every
/// field is trimmed and truncated to [`MAX_FIELD_CHARS`] characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoFields {
    /// Text of the first `<h1>` element
    pub heading: String,
    /// Text of the `<title>` element
    pub title: String,
    /// `content` of the first `<meta name="description">` element
    pub description: String,
}

/// One point-in-time check of a URL entry.
///
/// A check row exists only for successful fetches; failed fetches leave the
/// history untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Store-assigned identifier, monotonic within the store
    pub id: u64,
    /// Owning URL entry
    pub url_id: u64,
    /// Final HTTP status of the fetch
    pub status_code: u16,
    /// Extracted SEO fields
    pub seo: SeoFields,
    /// When the check was recorded
    pub created_at: DateTime<Utc>,
}

/// A URL entry together with its most recent check, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlSummary {
    pub entry: UrlEntry,
    /// Latest check, if the entry has ever been checked
    pub last_check: Option<CheckRecord>,
}

/// Trim and truncate a field to at most [`MAX_FIELD_CHARS`] characters.
///
/// Truncation counts characters, not bytes, so multi-byte content is cut at
/// a valid boundary.
pub fn clamp_field(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(MAX_FIELD_CHARS) {
        Some((byte_idx, _)) => trimmed[..byte_idx].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_field_short_input() {
        assert_eq!(clamp_field("  hello  "), "hello");
        assert_eq!(clamp_field(""), "");
    }

    #[test]
    fn test_clamp_field_truncates_to_255_chars() {
        let long = "x".repeat(300);
        let clamped = clamp_field(&long);
        assert_eq!(clamped.chars().count(), MAX_FIELD_CHARS);
    }

    #[test]
    fn test_clamp_field_multibyte_boundary() {
        let long = "é".repeat(300);
        let clamped = clamp_field(&long);
        assert_eq!(clamped.chars().count(), MAX_FIELD_CHARS);
    }
}
