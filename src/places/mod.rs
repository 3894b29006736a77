pub mod client;
pub mod discovery;
pub mod types;

pub use client::{GooglePlacesClient, PlaceLookup};
pub use discovery::PlaceDiscovery;
pub use types::{NearbyPage, PlaceDetails, RawCandidate};
