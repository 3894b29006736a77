use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Number of email columns in the export, and the cap applied by the filter.
pub const MAX_EMAIL_SLOTS: usize = 15;

/// A business listing as it comes out of discovery: deduplicated by place id
/// and enriched with its website. Immutable once crawling starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub place_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub location: GeoPoint,
    /// Backfilled from the detail lookup; `None` when the provider omits it.
    pub website: Option<String>,
}

/// One export row. Built at cleanup time for listings that kept both a
/// website and at least one email, discarded after export.
#[derive(Debug, Clone, Serialize)]
pub struct FinalRecord {
    pub name: String,
    pub types: Vec<String>,
    pub website: String,
    pub email_slots: [Option<String>; MAX_EMAIL_SLOTS],
}

impl FinalRecord {
    pub fn new(listing: &Listing, website: String, emails: Vec<String>) -> Self {
        let mut email_slots: [Option<String>; MAX_EMAIL_SLOTS] = Default::default();
        for (slot, email) in email_slots.iter_mut().zip(emails) {
            *slot = Some(email);
        }
        Self {
            name: listing.name.clone(),
            types: listing.types.clone(),
            website,
            email_slots,
        }
    }
}
