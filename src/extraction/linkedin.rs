// src/extraction/linkedin.rs
use regex::Regex;
use std::sync::LazyLock;

static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?linkedin\.com/in/[\w\-.]+/?$").unwrap()
});

/// Check whether a URL points at a public LinkedIn member profile.
/// Company pages, job posts, and anything outside `/in/` are rejected.
pub fn is_valid_profile_url(url: &str) -> bool {
    PROFILE_URL.is_match(url)
}

/// Canonicalize a profile URL: lowercase, https scheme, `www.` host prefix,
/// no trailing slash. Pure string transform; idempotent.
pub fn normalize_profile_url(url: &str) -> String {
    let mut normalized = url.trim().to_lowercase();
    if !normalized.starts_with("http") {
        normalized = format!("https://{}", normalized);
    }
    if !normalized.contains("www.") {
        normalized = normalized.replace("linkedin.com", "www.linkedin.com");
    }
    normalized.strip_suffix('/').map(String::from).unwrap_or(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile_urls() {
        assert!(is_valid_profile_url("https://www.linkedin.com/in/janedoe"));
        assert!(is_valid_profile_url("https://linkedin.com/in/janedoe"));
        assert!(is_valid_profile_url("http://www.linkedin.com/in/jane-doe"));
        assert!(is_valid_profile_url("https://www.linkedin.com/in/jane-doe.smith"));
        assert!(is_valid_profile_url("https://www.linkedin.com/in/janedoe/"));
        assert!(is_valid_profile_url("HTTPS://WWW.LINKEDIN.COM/IN/JANEDOE"));
    }

    #[test]
    fn test_invalid_profile_urls() {
        assert!(!is_valid_profile_url("https://linkedin.com/company/acme"));
        assert!(!is_valid_profile_url("linkedin.com/in/janedoe"));
        assert!(!is_valid_profile_url("https://www.linkedin.com/in/"));
        assert!(!is_valid_profile_url("https://www.linkedin.com/in/jane doe"));
        assert!(!is_valid_profile_url("https://example.com/in/janedoe"));
        assert!(!is_valid_profile_url("https://www.linkedin.com/in/janedoe/details"));
    }

    #[test]
    fn test_normalize_adds_scheme_and_www() {
        assert_eq!(
            normalize_profile_url("linkedin.com/in/janedoe/"),
            "https://www.linkedin.com/in/janedoe"
        );
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(
            normalize_profile_url("  HTTPS://www.LinkedIn.com/in/JaneDoe "),
            "https://www.linkedin.com/in/janedoe"
        );
    }

    #[test]
    fn test_normalize_keeps_existing_www() {
        assert_eq!(
            normalize_profile_url("https://www.linkedin.com/in/janedoe"),
            "https://www.linkedin.com/in/janedoe"
        );
    }

    #[test]
    fn test_normalize_idempotent() {
        for url in [
            "linkedin.com/in/janedoe/",
            "http://linkedin.com/in/jane-doe.smith",
            "https://www.linkedin.com/in/janedoe",
        ] {
            let once = normalize_profile_url(url);
            assert_eq!(normalize_profile_url(&once), once);
        }
    }
}
