use crate::geo::GeoPoint;

/// One page of a nearby search. A `next_page_token` of `None` is the
/// provider's "no more pages" signal.
#[derive(Debug, Clone)]
pub struct NearbyPage {
    pub candidates: Vec<RawCandidate>,
    pub next_page_token: Option<String>,
}

/// A candidate as the provider returns it, before geofiltering and dedup.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub place_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub location: GeoPoint,
}

/// The fixed detail field set requested per listing. Fields the provider
/// omits stay `None` so every listing has a uniform shape downstream.
#[derive(Debug, Clone, Default)]
pub struct PlaceDetails {
    pub website: Option<String>,
}
