// src/web_crawler/extractor.rs
use std::collections::HashSet;

use regex::Regex;

/// Matches ASCII-local-part addresses with a dotted domain and a TLD of at
/// least two characters, applied to raw page bodies.
pub struct EmailExtractor {
    email_regex: Regex,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .unwrap(),
        }
    }

    /// All distinct matches on a page, in first-seen order.
    pub fn extract(&self, body: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.email_regex
            .find_iter(body)
            .map(|m| m.as_str().to_string())
            .filter(|email| seen.insert(email.clone()))
            .collect()
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}
