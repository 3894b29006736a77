use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::geo::GeoPoint;
use crate::models::Result;
use crate::places::types::{NearbyPage, PlaceDetails, RawCandidate};

const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const PLACE_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Fields requested from the detail endpoint for every listing.
const DETAIL_FIELDS: &str = "website";

/// Seam to the place-lookup provider. Discovery only talks to this trait,
/// so tests can run against an in-memory implementation.
#[async_trait]
pub trait PlaceLookup {
    /// Resolve an address or place name to coordinates.
    async fn geocode(&self, query: &str) -> Result<GeoPoint>;

    /// One page of a nearby search. Pass the token from the previous page to
    /// continue; `None` starts a fresh query.
    async fn nearby_page(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        keyword: &str,
        page_token: Option<&str>,
    ) -> Result<NearbyPage>;

    /// Detail lookup for one place, restricted to the fixed field set.
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails>;
}

pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    place_id: String,
    name: String,
    #[serde(default)]
    types: Vec<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: DetailsResult,
}

#[derive(Debug, Deserialize, Default)]
struct DetailsResult {
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

impl GooglePlacesClient {
    pub fn new(api_key: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; PlaceScraper/1.0)")
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client, api_key })
    }

    fn check_status(status: &str) -> Result<()> {
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            other => Err(format!("Place lookup returned status {}", other).into()),
        }
    }
}

#[async_trait]
impl PlaceLookup for GooglePlacesClient {
    async fn geocode(&self, query: &str) -> Result<GeoPoint> {
        debug!("Geocoding {}", query);

        let response: GeocodeResponse = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await?;

        Self::check_status(&response.status)?;
        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| format!("Location not found: {}", query))?;

        Ok(GeoPoint {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        })
    }

    async fn nearby_page(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        keyword: &str,
        page_token: Option<&str>,
    ) -> Result<NearbyPage> {
        // A continuation request carries the token instead of the query.
        let request = match page_token {
            Some(token) => self.client.get(NEARBY_SEARCH_URL).query(&[
                ("pagetoken", token.to_string()),
                ("key", self.api_key.clone()),
            ]),
            None => self.client.get(NEARBY_SEARCH_URL).query(&[
                (
                    "location",
                    format!("{},{}", center.latitude, center.longitude),
                ),
                ("radius", radius_meters.to_string()),
                ("keyword", keyword.to_string()),
                ("key", self.api_key.clone()),
            ]),
        };

        let response: NearbyResponse = request.send().await?.json().await?;
        Self::check_status(&response.status)?;

        debug!(
            "Nearby page for '{}': {} candidates, token present: {}",
            keyword,
            response.results.len(),
            response.next_page_token.is_some()
        );

        let candidates = response
            .results
            .into_iter()
            .map(|r| RawCandidate {
                place_id: r.place_id,
                name: r.name,
                types: r.types,
                location: GeoPoint {
                    latitude: r.geometry.location.lat,
                    longitude: r.geometry.location.lng,
                },
            })
            .collect();

        Ok(NearbyPage {
            candidates,
            next_page_token: response.next_page_token,
        })
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let response: DetailsResponse = self
            .client
            .get(PLACE_DETAILS_URL)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        Self::check_status(&response.status)?;

        Ok(PlaceDetails {
            website: response.result.website,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_response_parsing() {
        let json = r#"{
            "status": "OK",
            "next_page_token": "tok123",
            "results": [{
                "place_id": "p1",
                "name": "Example Barber",
                "types": ["hair_care", "point_of_interest"],
                "geometry": {"location": {"lat": 52.370, "lng": 4.895}}
            }]
        }"#;
        let parsed: NearbyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.next_page_token.as_deref(), Some("tok123"));
        assert_eq!(parsed.results[0].place_id, "p1");
        assert_eq!(parsed.results[0].geometry.location.lat, 52.370);
    }

    #[test]
    fn test_details_response_without_website() {
        // The provider omits fields it has no value for.
        let json = r#"{"status": "OK", "result": {}}"#;
        let parsed: DetailsResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.result.website.is_none());
    }

    #[test]
    fn test_zero_results_is_not_an_error() {
        assert!(GooglePlacesClient::check_status("ZERO_RESULTS").is_ok());
        assert!(GooglePlacesClient::check_status("OVER_QUERY_LIMIT").is_err());
    }
}
