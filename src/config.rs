//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use scraper::Selector;

use crate::extract::parse_selector_list;

/// Elements whose presence means a detail page has rendered enough to extract.
pub const LANDMARKS: &str = "h1, h2, main, article, .content, .container";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Crawl a paginated gym directory and export one CSV row per gym.
#[derive(Debug, Clone, Parser)]
#[command(name = "gym-finder", version)]
pub struct Config {
    /// First list page, with or without `?page=N`
    #[arg(long, env = "GYM_START_URL")]
    pub start_url: String,

    /// Output CSV path
    #[arg(long, env = "GYM_OUT", default_value = "gyms.csv")]
    pub out: PathBuf,

    /// Comma-separated selectors for list-page cards
    #[arg(
        long,
        env = "GYM_CARD_SELECTORS",
        default_value = ".item-box-margin,.col-sm-6.col-md-4,article.gym-card,.card-simple"
    )]
    pub cards: String,

    /// Comma-separated selectors tried in order for the gym name
    #[arg(long, env = "GYM_TITLE_SELECTORS", default_value = "h1,h2,.title,.page-title")]
    pub titles: String,

    /// Milliseconds to wait after each navigation
    #[arg(long, env = "GYM_WAIT_MS", default_value_t = 1200)]
    pub wait: u64,

    /// Stop after this many list pages with new links (0 = all pages)
    #[arg(long, env = "GYM_MAX_PAGES", default_value_t = 0)]
    pub max_pages: usize,

    /// Navigation timeout for list pages, in milliseconds
    #[arg(long, env = "GYM_LIST_TIMEOUT_MS", default_value_t = 30_000)]
    pub list_timeout_ms: u64,

    /// Navigation timeout for detail pages, in milliseconds
    #[arg(long, env = "GYM_DETAIL_TIMEOUT_MS", default_value_t = 30_000)]
    pub detail_timeout_ms: u64,

    /// Upper bound on waiting for a detail page landmark, in milliseconds
    #[arg(long, env = "GYM_LANDMARK_TIMEOUT_MS", default_value_t = 8_000)]
    pub landmark_timeout_ms: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "GYM_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Config {
    pub fn selectors(&self) -> Result<SiteSelectors> {
        Ok(SiteSelectors {
            cards: parse_selector_list(&self.cards)?,
            titles: parse_selector_list(&self.titles)?,
        })
    }

    pub fn timing(&self) -> CrawlTiming {
        CrawlTiming {
            settle: Duration::from_millis(self.wait),
            detail_timeout: Duration::from_millis(self.detail_timeout_ms),
            landmark_timeout: Duration::from_millis(self.landmark_timeout_ms),
            max_pages: self.max_pages,
        }
    }
}

/// Parsed CSS selectors for the directory being crawled
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Card containers on list pages, applied in order
    pub cards: Vec<Selector>,
    /// Name candidates on detail pages, first match wins
    pub titles: Vec<Selector>,
}

/// Delays, deadlines and the page cap
#[derive(Debug, Clone, Copy)]
pub struct CrawlTiming {
    pub settle: Duration,
    pub detail_timeout: Duration,
    pub landmark_timeout: Duration,
    /// `0` means no cap
    pub max_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_start_url_given() {
        let config =
            Config::try_parse_from(["gym-finder", "--start-url", "https://gym.example/gyms"]).unwrap();
        assert_eq!(config.out, PathBuf::from("gyms.csv"));
        assert_eq!(config.wait, 1200);
        assert_eq!(config.max_pages, 0);
        assert_eq!(config.list_timeout_ms, 30_000);

        let selectors = config.selectors().unwrap();
        assert_eq!(selectors.cards.len(), 4);
        assert_eq!(selectors.titles.len(), 4);

        let timing = config.timing();
        assert_eq!(timing.detail_timeout, Duration::from_secs(30));
        assert_eq!(timing.landmark_timeout, Duration::from_secs(8));
    }

    #[test]
    fn bad_selector_is_an_error() {
        let config = Config::try_parse_from([
            "gym-finder",
            "--start-url",
            "https://gym.example/gyms",
            "--cards",
            ".ok, [broken",
        ])
        .unwrap();
        assert!(config.selectors().is_err());
    }
}
