// src/services/correlator.rs

//! Reply correlation.
//!
//! Joins outreach targets with whatever replies came back, keyed by the
//! normalized sender address.

use std::collections::HashMap;

use crate::models::Reply;
use crate::utils::email::normalize_address;

/// Build a sender-address → reply-body lookup.
///
/// Senders are normalized (display name and angle brackets stripped,
/// lower-cased); a later reply from the same address overwrites an
/// earlier one. Replies without a parseable address are dropped.
pub fn correlate(replies: &[Reply]) -> HashMap<String, String> {
    let mut bodies = HashMap::new();
    for reply in replies {
        if let Some(address) = normalize_address(&reply.from) {
            bodies.insert(address, reply.body.clone());
        }
    }
    bodies
}
