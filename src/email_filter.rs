// src/email_filter.rs
use std::collections::HashSet;

use tracing::debug;

use crate::models::MAX_EMAIL_SLOTS;

/// Asset URLs whose tail happens to match the email pattern.
const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".png", ".gif", ".svg"];

/// Post-processes a listing's raw matches: scrape artifacts out, case-only
/// duplicates collapsed, survivors capped at the slot count.
pub struct EmailFilter {
    denylist: Vec<String>,
}

impl EmailFilter {
    pub fn new(denylist: Vec<String>) -> Self {
        let denylist = denylist.into_iter().map(|d| d.to_lowercase()).collect();
        Self { denylist }
    }

    /// Cleans one listing's raw match set, preserving first-seen order. An
    /// empty return means the listing has no email. Idempotent.
    pub fn clean(&self, raw: &[String]) -> Vec<String> {
        let plausible: Vec<&String> = raw
            .iter()
            .filter(|email| !has_image_suffix(email))
            .filter(|email| has_plausible_tld(email))
            .filter(|email| !self.is_denylisted(email))
            .collect();

        // Case-only duplicates: a non-lowercase entry is dropped when its
        // lowercase form is present anywhere in the surviving set. Checked
        // against the full set so the collapse is order-independent.
        let lowercase_forms: HashSet<String> = plausible
            .iter()
            .filter(|email| is_all_lowercase(email))
            .map(|email| email.to_string())
            .collect();

        let survivors: Vec<String> = plausible
            .into_iter()
            .filter(|email| {
                is_all_lowercase(email) || !lowercase_forms.contains(&email.to_lowercase())
            })
            .take(MAX_EMAIL_SLOTS)
            .cloned()
            .collect();

        if survivors.len() != raw.len() {
            debug!("Email filter kept {}/{} matches", survivors.len(), raw.len());
        }

        survivors
    }

    fn is_denylisted(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.denylist.iter().any(|entry| email.contains(entry))
    }
}

fn has_image_suffix(email: &str) -> bool {
    let email = email.to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| email.ends_with(suffix))
}

/// A real match ends in a 2- or 3-character final segment, so one of the two
/// characters just before it must be a dot. Anything else is a malformed
/// scrape artifact.
fn has_plausible_tld(email: &str) -> bool {
    let bytes = email.as_bytes();
    if bytes.len() < 4 {
        return false;
    }
    bytes[bytes.len() - 3] == b'.' || bytes[bytes.len() - 4] == b'.'
}

fn is_all_lowercase(email: &str) -> bool {
    !email.chars().any(|c| c.is_ascii_uppercase())
}
