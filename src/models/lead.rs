//! Lead data structures across pipeline stages.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate organization produced by search.
///
/// Identity is the `url`; later stages correlate records by it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lead {
    /// Organization or page title
    pub name: String,

    /// Site URL
    pub url: String,

    /// Search result snippet
    pub snippet: String,
}

/// A lead with the addresses found on its site.
///
/// An empty set means enrichment ran and found nothing; such leads are
/// still present in the dataset (serialized with the `N/A` sentinel).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichedLead {
    pub name: String,
    pub url: String,
    pub snippet: String,

    /// Addresses found on the lead's pages, duplicate-free
    #[serde(with = "email_list")]
    pub emails: BTreeSet<String>,
}

impl EnrichedLead {
    /// Attach a set of found addresses to a lead.
    pub fn new(lead: Lead, emails: BTreeSet<String>) -> Self {
        Self {
            name: lead.name,
            url: lead.url,
            snippet: lead.snippet,
            emails,
        }
    }
}

/// An enriched lead with its suitability score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoredLead {
    pub name: String,
    pub url: String,
    pub snippet: String,

    #[serde(with = "email_list")]
    pub emails: BTreeSet<String>,

    /// Suitability score in 0..=10, derived from the address patterns
    pub score: u32,
}

impl ScoredLead {
    pub fn new(lead: EnrichedLead, score: u32) -> Self {
        Self {
            name: lead.name,
            url: lead.url,
            snippet: lead.snippet,
            emails: lead.emails,
            score,
        }
    }
}

/// Record of one outreach attempt to a unique address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachEvent {
    pub address: String,

    /// Whether the message was handed to the transport
    pub sent: bool,

    pub timestamp: DateTime<Utc>,
}

/// Tabular encoding of an email set: `", "`-joined list, `N/A` when empty.
mod email_list {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Deserializer, Serializer};

    const NONE_SENTINEL: &str = "N/A";

    pub fn serialize<S: Serializer>(
        emails: &BTreeSet<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if emails.is_empty() {
            serializer.serialize_str(NONE_SENTINEL)
        } else {
            let joined = emails.iter().cloned().collect::<Vec<_>>().join(", ");
            serializer.serialize_str(&joined)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() || raw.trim() == NONE_SENTINEL {
            return Ok(BTreeSet::new());
        }
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}
