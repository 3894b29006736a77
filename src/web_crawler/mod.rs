pub mod engine;
pub mod extractor;
pub mod fetch;
pub mod links;
pub mod types;

pub use engine::{CrawlEngine, SiteReport};
pub use fetch::{HttpFetcher, PageFetcher};
pub use types::{CrawlMethod, FetchFailure, FetchOutcome, SiteCrawl};
