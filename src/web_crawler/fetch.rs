// src/web_crawler/fetch.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::models::Result;
use crate::web_crawler::types::{FetchFailure, FetchOutcome};

/// Hosts on these domains are never fetched.
const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
];

/// Seam to HTTP. The engine only talks to this trait; every failure is an
/// outcome, never an error, so one bad page cannot abort a crawl.
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; PlaceScraper/1.0)")
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }
}

fn is_social_host(host: &str) -> bool {
    SOCIAL_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_owned)) {
            Some(host) => host,
            None => {
                return FetchOutcome::Failed {
                    reason: FetchFailure::Connection,
                }
            }
        };

        if is_social_host(&host) {
            debug!("Skipping social network URL {}", url);
            return FetchOutcome::Failed {
                reason: FetchFailure::DomainExcluded,
            };
        }

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(_) => {
                return FetchOutcome::Failed {
                    reason: FetchFailure::Connection,
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Failed {
                reason: FetchFailure::BadStatus(status.as_u16()),
            };
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(_) => {
                return FetchOutcome::Failed {
                    reason: FetchFailure::Connection,
                }
            }
        };

        match String::from_utf8(bytes.to_vec()) {
            Ok(body) => {
                debug!("Fetched {} bytes from {}", body.len(), url);
                FetchOutcome::Fetched { body }
            }
            Err(_) => FetchOutcome::Failed {
                reason: FetchFailure::UndecodableBody,
            },
        }
    }
}
