// src/pipeline/engage.rs

//! Engagement stage: outreach sending.

use chrono::Utc;

use crate::error::Result;
use crate::models::{EngagementConfig, OutreachEvent, ScoredLead};
use crate::services::Mailer;
use crate::storage::{LocalStore, SCORED_LEADS};
use crate::utils::email::is_valid_email;

/// Addresses to contact, in deterministic order.
///
/// Walks the ranked leads, keeps addresses of leads at or above the
/// threshold that pass validation, and deduplicates across overlapping
/// email sets so each address appears at most once.
pub fn engaged_addresses(leads: &[ScoredLead], min_score: u32) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut addresses = Vec::new();
    for lead in leads {
        if lead.score < min_score {
            continue;
        }
        for email in &lead.emails {
            if is_valid_email(email) && seen.insert(email.clone()) {
                addresses.push(email.clone());
            }
        }
    }
    addresses
}

/// Send one outreach message per unique valid address above threshold.
///
/// Engagement is optional: a missing scored dataset or absent transport
/// is a skip, not an error, and a failed send degrades only that
/// address.
pub async fn run_engage(
    store: &LocalStore,
    mailer: Option<&dyn Mailer>,
    config: &EngagementConfig,
) -> Result<Vec<OutreachEvent>> {
    let Some(leads) = store
        .read_records_optional::<ScoredLead>(SCORED_LEADS)
        .await?
    else {
        log::warn!("No scored leads to engage; skipping");
        return Ok(Vec::new());
    };

    let addresses = engaged_addresses(&leads, config.min_score);
    if mailer.is_none() {
        log::warn!(
            "Email credentials not set; skipping outreach to {} addresses",
            addresses.len()
        );
    }

    let mut events = Vec::new();
    for address in addresses {
        let sent = match mailer {
            Some(mailer) => match mailer.send(&address, &config.subject, &config.body).await {
                Ok(()) => {
                    log::info!("Sent outreach to {}", address);
                    true
                }
                Err(error) => {
                    log::warn!("Failed to send to {}: {}", address, error);
                    false
                }
            },
            None => false,
        };
        events.push(OutreachEvent {
            address,
            sent,
            timestamp: Utc::now(),
        });
    }

    log::info!(
        "Engagement finished: {}/{} messages sent",
        events.iter().filter(|e| e.sent).count(),
        events.len()
    );
    Ok(events)
}
