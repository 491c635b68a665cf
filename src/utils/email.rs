// src/utils/email.rs

//! Email address extraction, validation and normalization.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// File suffixes that show up in scraped "addresses" but are image
/// references (e.g. `logo@2x.png`), never mailboxes.
const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

fn extract_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("email extraction pattern is valid")
    })
}

fn shape_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$")
            .expect("email shape pattern is valid")
    })
}

/// Extract the set of email addresses found in a page's text.
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    extract_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check whether a string is a plausible mailbox address.
///
/// Rejects image-file names that match the address shape, then applies
/// a full-match syntactic check.
pub fn is_valid_email(address: &str) -> bool {
    let lower = address.to_lowercase();
    if IMAGE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return false;
    }
    shape_pattern().is_match(address)
}

/// Normalize a raw sender header into a bare lower-cased address.
///
/// Accepts forms like `Name <p@x.com>`, `<p@x.com> Name` or a bare
/// address; returns `None` when no address is present.
pub fn normalize_address(raw: &str) -> Option<String> {
    let candidate = match raw.rsplit_once('<') {
        Some((_, rest)) => rest.split('>').next().unwrap_or(rest),
        None => raw,
    };
    let candidate = candidate.trim().to_lowercase();
    if candidate.contains('@') {
        Some(candidate)
    } else {
        None
    }
}
