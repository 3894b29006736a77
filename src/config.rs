use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub crawler: CrawlerConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Free-form address or place name, resolved once through the geocoder.
    pub location: String,
    pub radius_meters: f64,
    /// Comma-separated search keywords, e.g. "barber, hairdresser".
    pub keywords: String,
    #[serde(default = "default_max_pages_per_keyword")]
    pub max_pages_per_keyword: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlerConfig {
    #[serde(default = "default_max_concurrent_sites")]
    pub max_concurrent_sites: usize,
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
    /// A link whose target or text contains one of these is a priority page.
    #[serde(default = "default_priority_keywords")]
    pub priority_keywords: Vec<String>,
    /// Matches containing any of these substrings are scrape artifacts.
    #[serde(default = "default_email_denylist")]
    pub email_denylist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
}

impl SearchConfig {
    /// The keyword list as configured, trimmed, empty entries dropped.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

fn default_max_pages_per_keyword() -> usize {
    3
}

fn default_max_concurrent_sites() -> usize {
    8
}

fn default_fetch_timeout_seconds() -> u64 {
    10
}

fn default_priority_keywords() -> Vec<String> {
    [
        "contact",
        "contacto",
        "kontakt",
        "about",
        "about-us",
        "over-ons",
        "impressum",
        "team",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_email_denylist() -> Vec<String> {
    [
        "example.com",
        "sentry.io",
        "sentry.wixpress.com",
        "wixpress.com",
        "mysite.com",
        "yourdomain",
        "domain.com",
        "website.com",
        "godaddy.com",
        "squarespace.com",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                location: "Amsterdam, Netherlands".to_string(),
                radius_meters: 1000.0,
                keywords: "barber".to_string(),
                max_pages_per_keyword: default_max_pages_per_keyword(),
            },
            crawler: CrawlerConfig {
                max_concurrent_sites: default_max_concurrent_sites(),
                fetch_timeout_seconds: default_fetch_timeout_seconds(),
                priority_keywords: default_priority_keywords(),
                email_denylist: default_email_denylist(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
