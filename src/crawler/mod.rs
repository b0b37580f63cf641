//! Page-number driven crawl of the gym directory list pages.

pub mod links;

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use crate::models::LinkEntry;
use crate::traits::PageFetcher;

pub use links::collect_list_links;

static PAGE_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").expect("valid page regex"));

/// Walks `?page=N` list pages until a page contributes no new links.
pub struct ListCrawler<'a> {
    fetcher: &'a dyn PageFetcher,
    cards: &'a [Selector],
    wait: Duration,
    max_pages: usize,
}

impl<'a> ListCrawler<'a> {
    /// # Arguments
    /// * `cards` - Card selectors, applied in order
    /// * `wait` - Settle delay after each navigation
    /// * `max_pages` - Stop after this many pages with new links; `0` means no cap
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        cards: &'a [Selector],
        wait: Duration,
        max_pages: usize,
    ) -> Self {
        Self {
            fetcher,
            cards,
            wait,
            max_pages,
        }
    }

    /// Collect every card link reachable from `start_url`, in first-seen order.
    ///
    /// Navigation failures are returned as-is: without list pages there is
    /// nothing to crawl.
    pub async fn crawl(&self, start_url: &str) -> Result<Vec<LinkEntry>> {
        let mut current_page = start_page(start_url);
        let mut all_links: Vec<LinkEntry> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut visited_pages = 0;

        loop {
            let url = set_page(start_url, current_page)?;
            let page = self
                .fetcher
                .navigate(&url)
                .await
                .with_context(|| format!("Failed to fetch list page {current_page} ({url})"))?;
            tokio::time::sleep(self.wait).await;

            let links = {
                let document = Html::parse_document(&page.html);
                collect_list_links(&document, &page.final_url, self.cards)
            };

            let new_links: Vec<LinkEntry> = links
                .into_iter()
                .filter(|link| !seen.contains(&link.url))
                .collect();
            info!(
                "[list] page {}: +{} new (total {})",
                current_page,
                new_links.len(),
                all_links.len() + new_links.len()
            );

            if new_links.is_empty() {
                info!("Page {} added no new links, directory exhausted", current_page);
                break;
            }

            seen.extend(new_links.iter().map(|link| link.url.clone()));
            all_links.extend(new_links);
            visited_pages += 1;

            if self.max_pages != 0 && visited_pages >= self.max_pages {
                info!("Reached page limit ({})", self.max_pages);
                break;
            }

            current_page += 1;
        }

        Ok(dedup_links(all_links))
    }
}

/// Page number carried by `url`'s `page` parameter, or 1.
pub fn start_page(url: &str) -> usize {
    PAGE_PARAM_RE
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

/// Rewrite `url`'s `page` query parameter to `page`.
///
/// Other parameters keep their order and their first value; `page` keeps its
/// position if present and is appended otherwise.
pub fn set_page(url: &str, page: usize) -> Result<String> {
    let mut parsed = Url::parse(url).with_context(|| format!("Invalid start URL: {url}"))?;

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if !pairs.iter().any(|(k, _)| *k == key) {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }
    if let Some((_, value)) = pairs.iter_mut().find(|(k, _)| k == "page") {
        *value = page.to_string();
    } else {
        pairs.push(("page".to_string(), page.to_string()));
    }

    parsed.query_pairs_mut().clear().extend_pairs(&pairs);
    Ok(parsed.into())
}

/// Drop repeated URLs, keeping the first entry (and its thumbnail) for each.
pub fn dedup_links(links: Vec<LinkEntry>) -> Vec<LinkEntry> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.url.clone()))
        .collect()
}
