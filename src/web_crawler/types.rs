// src/web_crawler/types.rs
use serde::Serialize;

/// Which traversal stage produced a listing's final email result. This tag is
/// the sole per-listing diagnostic the pipeline surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMethod {
    Homepage,
    PriorityPage,
    RegularPages,
    FoundNothing,
    NoLinks,
}

/// The outcome of one listing's crawl, created exactly once per listing.
#[derive(Debug, Clone, Serialize)]
pub struct SiteCrawl {
    pub place_id: String,
    pub method: CrawlMethod,
    /// Raw matches in first-seen order; empty only for the no-email methods.
    pub emails: Vec<String>,
    /// Pages that contributed at least one match.
    pub source_urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched { body: String },
    Failed { reason: FetchFailure },
}

impl FetchOutcome {
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchOutcome::Fetched { body } => Some(body),
            FetchOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Connection,
    BadStatus(u16),
    UndecodableBody,
    /// The URL sits on a social-network domain and was never requested.
    DomainExcluded,
}
