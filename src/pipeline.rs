use std::collections::HashMap;

use tracing::info;

use crate::email_filter::EmailFilter;
use crate::models::{FinalRecord, Listing};
use crate::web_crawler::engine::SiteReport;

/// Join listings with their crawl outcomes by place id and reduce them to
/// export rows. Listings without a website, and listings whose email set is
/// empty after filtering, are excluded.
pub fn build_final_records(
    listings: &[Listing],
    reports: &[SiteReport],
    filter: &EmailFilter,
) -> Vec<FinalRecord> {
    let crawls: HashMap<&str, &SiteReport> = reports
        .iter()
        .map(|report| (report.crawl.place_id.as_str(), report))
        .collect();

    let records: Vec<FinalRecord> = listings
        .iter()
        .filter_map(|listing| {
            let website = listing.website.clone()?;
            let report = crawls.get(listing.place_id.as_str())?;
            let emails = filter.clean(&report.crawl.emails);
            if emails.is_empty() {
                return None;
            }
            Some(FinalRecord::new(listing, website, emails))
        })
        .collect();

    info!(
        "{} of {} listings kept an email after filtering",
        records.len(),
        listings.len()
    );

    records
}
