//! Utility functions and helpers.

pub mod email;

use url::Url;

/// Resolve a potentially relative path against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("http://a.example").unwrap();
        assert_eq!(resolve_url(&base, "contact"), "http://a.example/contact");

        let base = Url::parse("https://example.com/team/page").unwrap();
        assert_eq!(
            resolve_url(&base, "contact"),
            "https://example.com/team/contact"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }
}
