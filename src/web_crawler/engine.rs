// src/web_crawler/engine.rs
use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::CrawlerConfig;
use crate::metrics::RunMetrics;
use crate::models::Listing;
use crate::web_crawler::extractor::EmailExtractor;
use crate::web_crawler::fetch::PageFetcher;
use crate::web_crawler::links::{extract_links, host_of, partition_links};
use crate::web_crawler::types::{CrawlMethod, FetchFailure, FetchOutcome, SiteCrawl};

/// One listing's crawl outcome plus the page tallies it produced. Tallies
/// are merged into the run totals at the join point.
#[derive(Debug)]
pub struct SiteReport {
    pub crawl: SiteCrawl,
    pub metrics: RunMetrics,
}

pub struct CrawlEngine<F: PageFetcher> {
    fetcher: F,
    extractor: EmailExtractor,
    config: CrawlerConfig,
}

impl<F: PageFetcher + Sync> CrawlEngine<F> {
    pub fn new(fetcher: F, config: CrawlerConfig) -> Self {
        Self {
            fetcher,
            extractor: EmailExtractor::new(),
            config,
        }
    }

    /// Crawl every listing that has a website. Listings run concurrently up
    /// to the configured bound over one shared fetcher and are joined with a
    /// single wait-for-all; a failure inside one listing's crawl never
    /// aborts another's.
    pub async fn crawl_all(&self, listings: &[Listing]) -> Vec<SiteReport> {
        let sites: Vec<(&Listing, &str)> = listings
            .iter()
            .filter_map(|listing| listing.website.as_deref().map(|website| (listing, website)))
            .collect();

        info!("Crawling {} sites for contact emails", sites.len());

        stream::iter(
            sites
                .into_iter()
                .map(|(listing, website)| self.crawl_site(listing, website)),
        )
        .buffer_unordered(self.config.max_concurrent_sites.max(1))
        .collect()
        .await
    }

    /// One listing's tiered traversal. Strictly sequential within the
    /// listing: homepage, then the priority tier with early exit, then the
    /// whole remaining tier.
    pub async fn crawl_site(&self, listing: &Listing, homepage_url: &str) -> SiteReport {
        let mut metrics = RunMetrics::default();

        let homepage = self.fetch_page(homepage_url, &mut metrics).await;
        if let Some(body) = homepage.body() {
            let matches = self.extractor.extract(body);
            if !matches.is_empty() {
                debug!("{}: email on homepage", listing.name);
                metrics.emails_found += matches.len();
                return SiteReport {
                    crawl: SiteCrawl {
                        place_id: listing.place_id.clone(),
                        method: CrawlMethod::Homepage,
                        emails: matches,
                        source_urls: vec![homepage_url.to_string()],
                    },
                    metrics,
                };
            }
        }

        // A failed homepage fetch has no body, so link extraction comes up
        // empty and the crawl ends as NoLinks.
        let links = extract_links(homepage.body().unwrap_or(""), homepage_url);
        if links.is_empty() {
            debug!("{}: no links on homepage", listing.name);
            return SiteReport {
                crawl: SiteCrawl {
                    place_id: listing.place_id.clone(),
                    method: CrawlMethod::NoLinks,
                    emails: Vec::new(),
                    source_urls: Vec::new(),
                },
                metrics,
            };
        }

        let homepage_host = host_of(homepage_url).unwrap_or_default();
        let tiers = partition_links(&links, &homepage_host, &self.config.priority_keywords);
        debug!(
            "{}: {} priority links, {} remaining links",
            listing.name,
            tiers.priority.len(),
            tiers.remaining.len()
        );

        // Priority tier: the first page with a match ends the crawl, and
        // only that page's matches are kept.
        for url in &tiers.priority {
            if let Some(body) = self.fetch_page(url, &mut metrics).await.body() {
                let matches = self.extractor.extract(body);
                if !matches.is_empty() {
                    debug!("{}: email on priority page {}", listing.name, url);
                    metrics.emails_found += matches.len();
                    return SiteReport {
                        crawl: SiteCrawl {
                            place_id: listing.place_id.clone(),
                            method: CrawlMethod::PriorityPage,
                            emails: matches,
                            source_urls: vec![url.clone()],
                        },
                        metrics,
                    };
                }
            }
        }

        // Remaining tier: every page is fetched, matches and contributing
        // URLs accumulate across the whole tier.
        let mut emails = Vec::new();
        let mut seen = HashSet::new();
        let mut source_urls = Vec::new();
        for url in &tiers.remaining {
            if let Some(body) = self.fetch_page(url, &mut metrics).await.body() {
                let matches = self.extractor.extract(body);
                if matches.is_empty() {
                    continue;
                }
                source_urls.push(url.clone());
                for email in matches {
                    if seen.insert(email.clone()) {
                        emails.push(email);
                    }
                }
            }
        }

        let method = if emails.is_empty() {
            CrawlMethod::FoundNothing
        } else {
            metrics.emails_found += emails.len();
            CrawlMethod::RegularPages
        };

        SiteReport {
            crawl: SiteCrawl {
                place_id: listing.place_id.clone(),
                method,
                emails,
                source_urls,
            },
            metrics,
        }
    }

    async fn fetch_page(&self, url: &str, metrics: &mut RunMetrics) -> FetchOutcome {
        let outcome = self.fetcher.fetch(url).await;
        match &outcome {
            FetchOutcome::Fetched { body } => {
                metrics.pages_visited += 1;
                metrics.words_scanned += body.split_whitespace().count();
            }
            FetchOutcome::Failed {
                reason: FetchFailure::DomainExcluded,
            } => {
                // Never requested, so it does not count as a page visit.
                debug!("Excluded domain, not fetched: {}", url);
            }
            FetchOutcome::Failed { reason } => {
                metrics.pages_visited += 1;
                warn!("Fetch failed for {}: {:?}", url, reason);
            }
        }
        outcome
    }
}
