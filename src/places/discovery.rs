use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::geo::{within_radius, GeoPoint};
use crate::metrics::RunMetrics;
use crate::models::{Listing, Result};
use crate::places::client::PlaceLookup;
use crate::places::types::{PlaceDetails, RawCandidate};

/// The provider's continuation token only becomes valid after a server-side
/// indexing delay. This is an external requirement, not a politeness knob.
const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

pub struct PlaceDiscovery<'a, P: PlaceLookup> {
    lookup: &'a P,
    config: &'a SearchConfig,
}

impl<'a, P: PlaceLookup> PlaceDiscovery<'a, P> {
    pub fn new(lookup: &'a P, config: &'a SearchConfig) -> Self {
        Self { lookup, config }
    }

    /// Run every configured keyword sequentially, deduplicate the combined
    /// candidate list by place id (first occurrence wins) and enrich each
    /// unique listing with its detail fields.
    pub async fn discover(
        &self,
        center: GeoPoint,
        metrics: &mut RunMetrics,
    ) -> Result<Vec<Listing>> {
        let mut candidates = Vec::new();

        for keyword in self.config.keyword_list() {
            info!("Searching nearby places for '{}'", keyword);
            let survivors = self.search_keyword(center, &keyword).await?;
            info!("Keyword '{}': {} candidates in radius", keyword, survivors.len());
            metrics.keywords_searched += 1;
            candidates.extend(survivors);
        }

        let unique = dedup_by_place_id(candidates);
        metrics.places_found += unique.len();
        info!("{} unique places after dedup", unique.len());

        let mut listings = Vec::with_capacity(unique.len());
        for candidate in unique {
            let details = match self.lookup.place_details(&candidate.place_id).await {
                Ok(details) => details,
                Err(e) => {
                    warn!(
                        "Detail lookup failed for {} ({}): {}",
                        candidate.name, candidate.place_id, e
                    );
                    PlaceDetails::default()
                }
            };

            if details.website.is_some() {
                metrics.places_with_website += 1;
            }

            listings.push(Listing {
                place_id: candidate.place_id,
                name: candidate.name,
                types: candidate.types,
                location: candidate.location,
                website: details.website,
            });
        }

        Ok(listings)
    }

    /// Page through one keyword's nearby search, applying the radius filter
    /// per page. The provider is known to return candidates outside the
    /// nominal radius, so this pass is mandatory.
    async fn search_keyword(&self, center: GeoPoint, keyword: &str) -> Result<Vec<RawCandidate>> {
        let mut survivors = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages_fetched = 0;

        loop {
            let page = self
                .lookup
                .nearby_page(
                    center,
                    self.config.radius_meters,
                    keyword,
                    page_token.as_deref(),
                )
                .await?;
            pages_fetched += 1;

            let returned = page.candidates.len();
            let mut kept = 0;
            for candidate in page.candidates {
                if within_radius(center, candidate.location, self.config.radius_meters) {
                    survivors.push(candidate);
                    kept += 1;
                }
            }
            debug!(
                "Page {} for '{}': kept {}/{} candidates",
                pages_fetched, keyword, kept, returned
            );

            let Some(token) = page.next_page_token else {
                break;
            };
            if pages_fetched >= self.config.max_pages_per_keyword {
                debug!("Page cap reached for '{}'", keyword);
                break;
            }

            page_token = Some(token);
            tokio::time::sleep(PAGE_TOKEN_DELAY).await;
        }

        Ok(survivors)
    }
}

fn dedup_by_place_id(candidates: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.place_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::types::NearbyPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockLookup {
        // Pages are handed out per keyword in order.
        pages: Mutex<HashMap<String, Vec<NearbyPage>>>,
        details: HashMap<String, PlaceDetails>,
        nearby_calls: Mutex<usize>,
    }

    impl MockLookup {
        fn new(pages: HashMap<String, Vec<NearbyPage>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                details: HashMap::new(),
                nearby_calls: Mutex::new(0),
            }
        }

        fn with_website(mut self, place_id: &str, website: &str) -> Self {
            self.details.insert(
                place_id.to_string(),
                PlaceDetails {
                    website: Some(website.to_string()),
                },
            );
            self
        }
    }

    #[async_trait]
    impl PlaceLookup for MockLookup {
        async fn geocode(&self, _query: &str) -> Result<GeoPoint> {
            Ok(CENTER)
        }

        async fn nearby_page(
            &self,
            _center: GeoPoint,
            _radius_meters: f64,
            keyword: &str,
            _page_token: Option<&str>,
        ) -> Result<NearbyPage> {
            *self.nearby_calls.lock().unwrap() += 1;
            let mut pages = self.pages.lock().unwrap();
            let queue = pages.get_mut(keyword).ok_or("unknown keyword")?;
            if queue.is_empty() {
                return Err("no more pages queued".into());
            }
            Ok(queue.remove(0))
        }

        async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
            Ok(self.details.get(place_id).cloned().unwrap_or_default())
        }
    }

    const CENTER: GeoPoint = GeoPoint {
        latitude: 52.370,
        longitude: 4.895,
    };

    fn candidate(place_id: &str, latitude: f64, longitude: f64) -> RawCandidate {
        RawCandidate {
            place_id: place_id.to_string(),
            name: format!("Shop {}", place_id),
            types: vec!["store".to_string()],
            location: GeoPoint {
                latitude,
                longitude,
            },
        }
    }

    fn search_config(radius_meters: f64, keywords: &str) -> SearchConfig {
        SearchConfig {
            location: "Amsterdam, Netherlands".to_string(),
            radius_meters,
            keywords: keywords.to_string(),
            max_pages_per_keyword: 3,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_radius_candidates_dropped() {
        // ~600 m north of the center; the requested radius is 500 m.
        let far = candidate("far", 52.3754, 4.895);
        let near = candidate("near", 52.371, 4.895);
        let pages = HashMap::from([(
            "barber".to_string(),
            vec![NearbyPage {
                candidates: vec![near, far],
                next_page_token: None,
            }],
        )]);
        let lookup = MockLookup::new(pages);
        let config = search_config(500.0, "barber");
        let mut metrics = RunMetrics::default();

        let listings = PlaceDiscovery::new(&lookup, &config)
            .discover(CENTER, &mut metrics)
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].place_id, "near");
        assert_eq!(metrics.places_found, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dedup_across_keywords_first_wins() {
        let pages = HashMap::from([
            (
                "barber".to_string(),
                vec![NearbyPage {
                    candidates: vec![candidate("p1", 52.371, 4.895)],
                    next_page_token: None,
                }],
            ),
            (
                "hairdresser".to_string(),
                vec![NearbyPage {
                    candidates: vec![candidate("p1", 52.371, 4.895), candidate("p2", 52.369, 4.894)],
                    next_page_token: None,
                }],
            ),
        ]);
        let lookup = MockLookup::new(pages);
        let config = search_config(500.0, "barber, hairdresser");
        let mut metrics = RunMetrics::default();

        let listings = PlaceDiscovery::new(&lookup, &config)
            .discover(CENTER, &mut metrics)
            .await
            .unwrap();

        let ids: Vec<&str> = listings.iter().map(|l| l.place_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(metrics.keywords_searched, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_website_stays_explicit_none() {
        let pages = HashMap::from([(
            "barber".to_string(),
            vec![NearbyPage {
                candidates: vec![candidate("p1", 52.371, 4.895), candidate("p2", 52.369, 4.894)],
                next_page_token: None,
            }],
        )]);
        let lookup = MockLookup::new(pages).with_website("p2", "https://example-barber.nl");
        let config = search_config(500.0, "barber");
        let mut metrics = RunMetrics::default();

        let listings = PlaceDiscovery::new(&lookup, &config)
            .discover(CENTER, &mut metrics)
            .await
            .unwrap();

        assert_eq!(listings[0].website, None);
        assert_eq!(
            listings[1].website.as_deref(),
            Some("https://example-barber.nl")
        );
        assert_eq!(metrics.places_with_website, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paging_follows_token_and_respects_cap() {
        // Every page returns a token; the cap must stop the loop at 3 pages.
        let page = |id: &str| NearbyPage {
            candidates: vec![candidate(id, 52.371, 4.895)],
            next_page_token: Some("token".to_string()),
        };
        let pages = HashMap::from([(
            "barber".to_string(),
            vec![page("p1"), page("p2"), page("p3"), page("p4")],
        )]);
        let lookup = MockLookup::new(pages);
        let config = search_config(500.0, "barber");
        let mut metrics = RunMetrics::default();

        let listings = PlaceDiscovery::new(&lookup, &config)
            .discover(CENTER, &mut metrics)
            .await
            .unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(*lookup.nearby_calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_lookup_failure_degrades_to_no_website() {
        struct FailingDetails(MockLookup);

        #[async_trait]
        impl PlaceLookup for FailingDetails {
            async fn geocode(&self, query: &str) -> Result<GeoPoint> {
                self.0.geocode(query).await
            }
            async fn nearby_page(
                &self,
                center: GeoPoint,
                radius_meters: f64,
                keyword: &str,
                page_token: Option<&str>,
            ) -> Result<NearbyPage> {
                self.0
                    .nearby_page(center, radius_meters, keyword, page_token)
                    .await
            }
            async fn place_details(&self, _place_id: &str) -> Result<PlaceDetails> {
                Err("details unavailable".into())
            }
        }

        let pages = HashMap::from([(
            "barber".to_string(),
            vec![NearbyPage {
                candidates: vec![candidate("p1", 52.371, 4.895)],
                next_page_token: None,
            }],
        )]);
        let lookup = FailingDetails(MockLookup::new(pages));
        let config = search_config(500.0, "barber");
        let mut metrics = RunMetrics::default();

        let listings = PlaceDiscovery::new(&lookup, &config)
            .discover(CENTER, &mut metrics)
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].website, None);
    }
}
