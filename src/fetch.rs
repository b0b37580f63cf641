//! Plain HTTP implementation of [`PageFetcher`] backed by `reqwest`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::FetchError;
use crate::traits::{Page, PageFetcher};

/// Fetches server-rendered pages over HTTP.
///
/// Pages that only fill in their content client-side come back without it;
/// the default landmark check then reports a timeout and extraction proceeds
/// on whatever the server sent.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    /// Deadline for list-page navigation
    list_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, list_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fa-IR,fa;q=0.9,en;q=0.6"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            list_timeout,
        })
    }

    async fn read_page(url: &str, response: Response) -> Result<Page, FetchError> {
        if !response.status().is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;
        debug!("Fetched {} ({} bytes)", final_url, html.len());

        Ok(Page { html, final_url })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn navigate(&self, url: &str) -> Result<Page> {
        Ok(self.navigate_with_timeout(url, self.list_timeout).await?)
    }

    async fn navigate_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Page, FetchError> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis(),
                }
            } else {
                FetchError::Http(e)
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        match Self::read_page(url, response).await {
            Err(FetchError::Http(e)) => Err(classify(e)),
            other => other,
        }
    }
}
