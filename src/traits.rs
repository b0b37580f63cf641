//! The page-fetch seam between the crawler and whatever renders pages

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::FetchError;

/// A rendered document and the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub html: String,
    /// Base for resolving relative links; may differ from the requested URL after redirects
    pub final_url: String,
}

/// Trait for anything that can navigate to a URL and hand back rendered HTML.
///
/// Exactly one navigation is outstanding at a time; implementations need not
/// be re-entrant.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Navigate to a list page
    ///
    /// # Arguments
    /// * `url` - The absolute URL to load
    ///
    /// # Returns
    /// * `Result<Page>` - The rendered page or a fatal navigation error
    async fn navigate(&self, url: &str) -> Result<Page>;

    /// Navigate to a detail page with a deadline
    ///
    /// # Arguments
    /// * `url` - The absolute URL to load
    /// * `timeout` - Upper bound on the navigation
    ///
    /// # Returns
    /// * `Result<Page, FetchError>` - The page, or `FetchError::Timeout` when the deadline passed
    async fn navigate_with_timeout(&self, url: &str, timeout: Duration)
    -> Result<Page, FetchError>;

    /// Wait until one of the comma-separated `selector`s is present on `page`.
    ///
    /// A static fetcher has nothing left to wait for, so the default only
    /// checks the document it already has and reports a timeout if no
    /// landmark is there. Rendering drivers should override this.
    async fn wait_for_selector(
        &self,
        page: &Page,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        if landmark_present(&page.html, selector) {
            Ok(())
        } else {
            Err(FetchError::Timeout {
                url: page.final_url.clone(),
                timeout_ms: timeout.as_millis(),
            })
        }
    }
}

fn landmark_present(html: &str, selector: &str) -> bool {
    let Ok(selector) = Selector::parse(selector) else {
        return false;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Static;

    #[async_trait]
    impl PageFetcher for Static {
        async fn navigate(&self, _url: &str) -> Result<Page> {
            unreachable!()
        }

        async fn navigate_with_timeout(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> Result<Page, FetchError> {
            unreachable!()
        }
    }

    fn page(html: &str) -> Page {
        Page {
            html: html.to_string(),
            final_url: "https://gym.example/g/1".to_string(),
        }
    }

    #[tokio::test]
    async fn default_wait_succeeds_when_landmark_present() {
        let res = Static
            .wait_for_selector(&page("<main><p>x</p></main>"), "h1, main", Duration::from_millis(5))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn default_wait_reports_timeout_without_landmark() {
        let err = Static
            .wait_for_selector(&page("<p>x</p>"), "h1, .content", Duration::from_millis(5))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
