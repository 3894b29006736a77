// src/web_crawler/links.rs
use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

/// A hyperlink lifted from a homepage: the absolute URL it resolves to plus
/// the raw target and anchor text it was written with.
#[derive(Debug, Clone)]
pub struct ExtractedLink {
    pub url: String,
    pub raw_target: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct TieredLinks {
    /// Probable contact pages; checked first, with early exit.
    pub priority: Vec<String>,
    /// On-site leftovers; all of them are checked, no early exit.
    pub remaining: Vec<String>,
}

/// Pull every `a[href]` out of a page body and resolve it against the page
/// URL. Deduplicated by resolved URL, first occurrence wins.
pub fn extract_links(body: &str, page_url: &str) -> Vec<ExtractedLink> {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(body);
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_target(&base, href) else {
            continue;
        };
        if !seen.insert(resolved.clone()) {
            continue;
        }
        links.push(ExtractedLink {
            url: resolved,
            raw_target: href.to_string(),
            text: element.text().collect::<String>(),
        });
    }

    links
}

/// Split links into the priority tier and the on-site remaining tier. Runs
/// once, right after extraction. A link is priority when its raw target or
/// anchor text contains a contact keyword; remaining links additionally must
/// contain the homepage's host, which keeps the crawl from following
/// outbound and advertising links.
pub fn partition_links(
    links: &[ExtractedLink],
    homepage_host: &str,
    priority_keywords: &[String],
) -> TieredLinks {
    let mut tiers = TieredLinks::default();

    for link in links {
        if is_priority(link, priority_keywords) {
            tiers.priority.push(link.url.clone());
        } else if !homepage_host.is_empty() && link.url.contains(homepage_host) {
            tiers.remaining.push(link.url.clone());
        }
    }

    tiers
}

pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
}

fn is_priority(link: &ExtractedLink, priority_keywords: &[String]) -> bool {
    let target = link.raw_target.to_lowercase();
    let text = link.text.to_lowercase();
    priority_keywords
        .iter()
        .any(|keyword| target.contains(keyword) || text.contains(keyword))
}

fn resolve_target(base: &Url, href: &str) -> Option<String> {
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "https://example-barber.nl/";

    fn keywords() -> Vec<String> {
        vec!["contact".to_string(), "over-ons".to_string()]
    }

    #[test]
    fn test_relative_links_resolved_against_homepage() {
        let body = r#"<a href="/contact">Contact</a> <a href="prices.html">Prices</a>"#;
        let links = extract_links(body, HOME);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example-barber.nl/contact",
                "https://example-barber.nl/prices.html"
            ]
        );
    }

    #[test]
    fn test_duplicate_targets_kept_once() {
        let body = r#"<a href="/contact">Contact</a> <a href="/contact">Contact us</a>"#;
        assert_eq!(extract_links(body, HOME).len(), 1);
    }

    #[test]
    fn test_mailto_tel_and_anchors_skipped() {
        let body = r##"
            <a href="mailto:info@example-barber.nl">Mail</a>
            <a href="tel:+3120000000">Call</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">Menu</a>
        "##;
        assert!(extract_links(body, HOME).is_empty());
    }

    #[test]
    fn test_priority_matched_on_target_or_text() {
        let body = r#"
            <a href="/contact">Reach us</a>
            <a href="/pages/17">Over-ons</a>
            <a href="/prices">Prices</a>
        "#;
        let links = extract_links(body, HOME);
        let tiers = partition_links(&links, "example-barber.nl", &keywords());
        assert_eq!(
            tiers.priority,
            vec![
                "https://example-barber.nl/contact",
                "https://example-barber.nl/pages/17"
            ]
        );
        assert_eq!(tiers.remaining, vec!["https://example-barber.nl/prices"]);
    }

    #[test]
    fn test_remaining_tier_is_on_site_only() {
        let body = r#"
            <a href="/prices">Prices</a>
            <a href="https://ads.partner-network.com/banner">Ad</a>
            <a href="https://shop.example-barber.nl/gift-cards">Gift cards</a>
        "#;
        let links = extract_links(body, HOME);
        let tiers = partition_links(&links, "example-barber.nl", &keywords());
        assert_eq!(
            tiers.remaining,
            vec![
                "https://example-barber.nl/prices",
                "https://shop.example-barber.nl/gift-cards"
            ]
        );
    }

    #[test]
    fn test_priority_links_bypass_on_site_filter() {
        // The host restriction only applies to the remaining tier.
        let body = r#"<a href="https://linktr.ee/barber-contact">Contact</a>"#;
        let links = extract_links(body, HOME);
        let tiers = partition_links(&links, "example-barber.nl", &keywords());
        assert_eq!(tiers.priority, vec!["https://linktr.ee/barber-contact"]);
        assert!(tiers.remaining.is_empty());
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://example-barber.nl/contact").as_deref(),
            Some("example-barber.nl")
        );
        assert_eq!(host_of("not a url"), None);
    }
}
