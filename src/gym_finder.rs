use std::time::Duration;

use anyhow::Result;
use scraper::Selector;
use tracing::{debug, info, warn};

use crate::config::{Config, CrawlTiming, LANDMARKS, SiteSelectors};
use crate::crawler::ListCrawler;
use crate::extract::DetailExtractor;
use crate::fetch::HttpFetcher;
use crate::models::{LinkEntry, Record};
use crate::traits::PageFetcher;

/// Crawls the directory, then visits every gym page in turn.
pub struct GymFinder {
    fetcher: Box<dyn PageFetcher>,
    cards: Vec<Selector>,
    extractor: DetailExtractor,
    timing: CrawlTiming,
}

impl GymFinder {
    pub fn new(fetcher: Box<dyn PageFetcher>, selectors: SiteSelectors, timing: CrawlTiming) -> Self {
        Self {
            fetcher,
            cards: selectors.cards,
            extractor: DetailExtractor::new(selectors.titles),
            timing,
        }
    }

    /// Build a finder that fetches over HTTP with the configured selectors and timing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            &config.user_agent,
            Duration::from_millis(config.list_timeout_ms),
        )?;
        Ok(Self::new(Box::new(fetcher), config.selectors()?, config.timing()))
    }

    /// One record per unique gym, in the order the list pages revealed them.
    ///
    /// A failing list page aborts the run. A failing gym page does not: its
    /// record carries the error and the run moves on.
    pub async fn run(&self, start_url: &str) -> Result<Vec<Record>> {
        let crawler = ListCrawler::new(
            self.fetcher.as_ref(),
            &self.cards,
            self.timing.settle,
            self.timing.max_pages,
        );
        let links = crawler.crawl(start_url).await?;
        info!("Found {} unique gyms", links.len());

        let total = links.len();
        let mut records = Vec::with_capacity(total);
        for (i, link) in links.iter().enumerate() {
            let record = self.visit(link).await;
            info!(
                "[{}/{}] {} | err={}",
                i + 1,
                total,
                record.name,
                !record.error.is_empty()
            );
            records.push(record);
        }

        Ok(records)
    }

    async fn visit(&self, link: &LinkEntry) -> Record {
        let seed = Record::seeded(link);
        match self.scrape_detail(link, seed.clone()).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to scrape {}: {:#}", link.url, e);
                Record {
                    error: format!("{e:#}"),
                    ..seed
                }
            }
        }
    }

    async fn scrape_detail(&self, link: &LinkEntry, seed: Record) -> Result<Record> {
        let page = self
            .fetcher
            .navigate_with_timeout(&link.url, self.timing.detail_timeout)
            .await?;

        match self
            .fetcher
            .wait_for_selector(&page, LANDMARKS, self.timing.landmark_timeout)
            .await
        {
            Err(e) if e.is_timeout() => debug!("No landmark on {}, extracting anyway", link.url),
            Err(e) => return Err(e.into()),
            Ok(()) => {}
        }
        tokio::time::sleep(self.timing.settle).await;

        Ok(self.extractor.extract(&page.html, &page.final_url, seed))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::error::FetchError;
    use crate::extract::parse_selector_list;
    use crate::traits::Page;

    /// In-memory site: list pages by URL, detail pages by URL, and URLs that time out.
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        slow: Vec<String>,
    }

    impl FakeSite {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn slow(mut self, url: &str) -> Self {
            self.slow.push(url.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn navigate(&self, url: &str) -> Result<Page> {
            let html = self
                .pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("connection refused: {url}"))?;
            Ok(Page {
                html,
                final_url: url.to_string(),
            })
        }

        async fn navigate_with_timeout(
            &self,
            url: &str,
            timeout: Duration,
        ) -> Result<Page, FetchError> {
            if self.slow.iter().any(|u| u == url) {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis(),
                });
            }
            let html = self.pages.get(url).cloned().unwrap_or_default();
            Ok(Page {
                html,
                final_url: url.to_string(),
            })
        }
    }

    fn finder(site: FakeSite, max_pages: usize) -> GymFinder {
        let selectors = SiteSelectors {
            cards: parse_selector_list(".card").unwrap(),
            titles: parse_selector_list("h1").unwrap(),
        };
        let timing = CrawlTiming {
            settle: Duration::ZERO,
            detail_timeout: Duration::from_millis(100),
            landmark_timeout: Duration::from_millis(10),
            max_pages,
        };
        GymFinder::new(Box::new(site), selectors, timing)
    }

    const LIST_1: &str = r#"<html><body>
        <div class="card"><a href="/g/1"><img src="/uploads/t1.jpg"></a></div>
        <div class="card"><a href="/g/2"><img src="/uploads/t2.jpg"></a></div>
        </body></html>"#;
    const LIST_2: &str = r#"<html><body>
        <div class="card"><a href="/g/2">again</a></div>
        <div class="card"><a href="/g/3">new</a></div>
        </body></html>"#;

    fn site() -> FakeSite {
        FakeSite::default()
            .page("https://gym.example/gyms?page=1", LIST_1)
            .page("https://gym.example/gyms?page=2", LIST_2)
            .page("https://gym.example/gyms?page=3", LIST_2)
            .page(
                "https://gym.example/g/1",
                "<html><body><h1>باشگاه یک</h1><p>تلفن ۰۹۱۲۱۲۳۴۵۶۷</p></body></html>",
            )
            .page(
                "https://gym.example/g/3",
                "<html><body><p>بدون عنوان</p></body></html>",
            )
            .slow("https://gym.example/g/2")
    }

    #[tokio::test]
    async fn failing_detail_page_is_recorded_and_skipped() {
        let records = finder(site(), 0).run("https://gym.example/gyms").await.unwrap();

        assert_eq!(records.len(), 3);

        assert_eq!(records[0].name, "باشگاه یک");
        assert_eq!(records[0].phones, "+989121234567");
        assert_eq!(records[0].cover_image, "https://gym.example/uploads/t1.jpg");
        assert_eq!(records[0].error, "");
        assert_eq!(records[0].has_male, Some(false));

        assert_eq!(records[1].details_url, "https://gym.example/g/2");
        assert_eq!(records[1].thumbnail, "https://gym.example/uploads/t2.jpg");
        assert!(records[1].error.contains("timed out"));
        assert_eq!(records[1].name, "");
        assert_eq!(records[1].has_male, None);
        assert_eq!(records[1].has_female, None);

        // No landmark on this page: extraction still runs.
        assert_eq!(records[2].details_url, "https://gym.example/g/3");
        assert_eq!(records[2].description, "بدون عنوان");
        assert_eq!(records[2].error, "");
    }

    #[tokio::test]
    async fn page_cap_limits_gyms_visited() {
        let records = finder(site(), 1).run("https://gym.example/gyms?page=1").await.unwrap();
        let urls: Vec<_> = records.iter().map(|r| r.details_url.as_str()).collect();
        assert_eq!(urls, vec!["https://gym.example/g/1", "https://gym.example/g/2"]);
    }

    #[tokio::test]
    async fn list_page_failure_aborts_the_run() {
        let site = FakeSite::default().page("https://gym.example/gyms?page=1", LIST_1);
        let err = finder(site, 0).run("https://gym.example/gyms").await.unwrap_err();
        assert!(format!("{err:#}").contains("list page 2"));
    }
}
