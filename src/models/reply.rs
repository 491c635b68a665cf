//! Reply and forecast data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An inbound reply fetched from the mailbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    /// Raw sender header as read from the message
    pub from: String,

    pub subject: String,

    /// Plain-text body (first text/plain part for multipart messages)
    pub body: String,
}

/// Sales-readiness category for a contacted address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hot,
    Warm,
    Cold,
    Unknown,
}

impl Category {
    /// Parse a category name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "warm" => Some(Self::Warm),
            "cold" => Some(Self::Cold),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// One forecast row per engaged address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastRecord {
    pub email: String,
    pub category: Category,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("hot"), Some(Category::Hot));
        assert_eq!(Category::parse(" Warm "), Some(Category::Warm));
        assert_eq!(Category::parse("COLD"), Some(Category::Cold));
        assert_eq!(Category::parse("lukewarm"), None);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Hot).unwrap();
        assert_eq!(json, "\"hot\"");
        let back: Category = serde_json::from_str("\"warm\"").unwrap();
        assert_eq!(back, Category::Warm);
    }
}
