// src/services/scorer.rs

//! Lead scoring heuristics.
//!
//! Maps an address set to a suitability score used purely for ranking.
//! Free-mail providers score lowest, role accounts in the middle,
//! addresses that look personal or company-specific highest.

use std::collections::BTreeSet;

/// Maximum score a lead can reach.
const MAX_SCORE: u32 = 10;

/// Score an address set. Pure, deterministic, order-invariant.
///
/// Empty input scores 0. Per address: free-mail domain +1, role
/// account +2, anything else +3; the sum is clamped to 10.
pub fn score_emails(emails: &BTreeSet<String>) -> u32 {
    let mut score = 0;
    for email in emails {
        let email = email.to_lowercase();
        if email.contains("@gmail.com") || email.contains("@outlook.com") {
            score += 1;
        } else if email.contains("info@") || email.contains("admin@") {
            score += 2;
        } else {
            score += 3;
        }
    }
    score.min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(emails: &[&str]) -> BTreeSet<String> {
        emails.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(score_emails(&BTreeSet::new()), 0);
    }

    #[test]
    fn test_address_weights() {
        assert_eq!(score_emails(&set(&["someone@gmail.com"])), 1);
        assert_eq!(score_emails(&set(&["person@outlook.com"])), 1);
        assert_eq!(score_emails(&set(&["info@acme.example"])), 2);
        assert_eq!(score_emails(&set(&["admin@acme.example"])), 2);
        assert_eq!(score_emails(&set(&["jane@acme.example"])), 3);
    }

    #[test]
    fn test_free_mail_takes_precedence_over_role() {
        // A role account on a free-mail domain counts as free mail.
        assert_eq!(score_emails(&set(&["info@gmail.com"])), 1);
    }

    #[test]
    fn test_sum_is_clamped() {
        let many: BTreeSet<String> = (0..6).map(|i| format!("person{i}@acme.example")).collect();
        assert_eq!(score_emails(&many), 10);
    }

    #[test]
    fn test_in_range_for_arbitrary_sets() {
        let mixed = set(&[
            "a@gmail.com",
            "info@acme.example",
            "jane@acme.example",
            "b@outlook.com",
        ]);
        let score = score_emails(&mixed);
        assert!(score <= 10);
        assert_eq!(score, 1 + 2 + 3 + 1);
    }

    #[test]
    fn test_order_invariant() {
        // BTreeSet input makes this structural, but the weights must not
        // depend on iteration position either.
        let forward = set(&["a@gmail.com", "z@acme.example"]);
        let reverse = set(&["z@acme.example", "a@gmail.com"]);
        assert_eq!(score_emails(&forward), score_emails(&reverse));
    }
}
