use std::time::Instant;

use dialoguer::{theme::ColorfulTheme, Confirm};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod email_filter;
mod export;
mod geo;
mod metrics;
mod models;
mod pipeline;
mod places;
mod web_crawler;

use config::{load_config, Config};
use email_filter::EmailFilter;
use export::{export_records_json, export_records_xlsx};
use metrics::RunMetrics;
use models::Result;
use pipeline::build_final_records;
use places::{GooglePlacesClient, PlaceDiscovery, PlaceLookup};
use web_crawler::{CrawlEngine, CrawlMethod, HttpFetcher, SiteReport};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Missing or unreadable configuration is fatal; there is no partial run.
    let config = load_config("config.yml")
        .await
        .map_err(|e| format!("Failed to load config.yml: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("place_scraper={}", config.logging.level).parse()?),
        )
        .init();

    let api_key = std::env::var("PLACES_API_KEY")
        .map_err(|_| "PLACES_API_KEY is not set; add it to the environment or an .env file")?;

    tokio::select! {
        result = run(config, api_key) => result,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
            Ok(())
        }
    }
}

async fn run(config: Config, api_key: String) -> Result<()> {
    tokio::fs::create_dir_all(&config.output.directory).await?;

    let lookup = GooglePlacesClient::new(api_key, config.crawler.fetch_timeout_seconds)?;

    println!("📍 Resolving center point: {}", config.search.location);
    let center = lookup.geocode(&config.search.location).await?;
    info!(
        "Center resolved to {:.5}, {:.5}",
        center.latitude, center.longitude
    );

    let mut metrics = RunMetrics::default();
    let listings = PlaceDiscovery::new(&lookup, &config.search)
        .discover(center, &mut metrics)
        .await?;

    let with_website = listings.iter().filter(|l| l.website.is_some()).count();
    println!(
        "\n🔎 Discovery complete: {} unique places, {} with a website",
        listings.len(),
        with_website
    );

    if with_website == 0 {
        println!("❌ No websites to crawl");
        metrics.print_summary();
        return Ok(());
    }

    if !Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Crawl {} websites for contact emails?", with_website))
        .default(true)
        .interact()?
    {
        println!("❌ Crawl cancelled");
        return Ok(());
    }

    let fetcher = HttpFetcher::new(config.crawler.fetch_timeout_seconds)?;
    let engine = CrawlEngine::new(fetcher, config.crawler.clone());

    let start = Instant::now();
    let reports = engine.crawl_all(&listings).await;
    for report in &reports {
        metrics.merge(&report.metrics);
    }
    println!("🏁 Crawl finished in {:.1}s", start.elapsed().as_secs_f64());
    print_method_breakdown(&reports);

    let filter = EmailFilter::new(config.crawler.email_denylist.clone());
    let records = build_final_records(&listings, &reports, &filter);

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let xlsx_path = format!("{}/leads_{}.xlsx", config.output.directory, timestamp);
    let json_path = format!("{}/leads_{}.json", config.output.directory, timestamp);
    export_records_xlsx(&records, &xlsx_path)?;
    export_records_json(&records, &json_path).await?;

    println!("\n✅ Exported {} records:", records.len());
    println!("  📄 {}", xlsx_path);
    println!("  📄 {}", json_path);
    metrics.print_summary();

    Ok(())
}

fn print_method_breakdown(reports: &[SiteReport]) {
    let count = |method: CrawlMethod| {
        reports
            .iter()
            .filter(|r| r.crawl.method == method)
            .count()
    };

    println!("\n📋 Crawl Outcomes:");
    println!("  🏠 Homepage: {}", count(CrawlMethod::Homepage));
    println!("  ⭐ Priority page: {}", count(CrawlMethod::PriorityPage));
    println!("  📄 Regular pages: {}", count(CrawlMethod::RegularPages));
    println!("  🕳️  Found nothing: {}", count(CrawlMethod::FoundNothing));
    println!("  🔗 No links: {}", count(CrawlMethod::NoLinks));
}
