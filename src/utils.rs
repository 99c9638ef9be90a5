// src/utils.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp from a request payload.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp: {raw}"))
}

/// Normalize an email address for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_accepts_offsets() {
        let ts = parse_timestamp("2026-08-25T10:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-08-25T08:00:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("next tuesday").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}
