use crate::config::HttpConfig;
use crate::dom::Page;
use crate::error::{Result, ScrapeError};
use reqwest::header::USER_AGENT;
use std::path::Path;

/// HTTP access to the reference site. One request at a time; callers pace themselves.
#[derive(Clone)]
pub struct SiteClient {
    client: reqwest::Client,
    image_user_agent: String,
}

impl SiteClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            image_user_agent: config.image_user_agent.clone(),
        })
    }

    /// Fetches `url` and parses the body into a navigable document.
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        tracing::debug!("Fetching page: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            ScrapeError::from(e)
        })?;

        if !response.status().is_success() {
            let error_msg = format!("GET {} failed with status: {}", url, response.status());
            tracing::error!("{}", error_msg);
            return Err(ScrapeError::NetworkError(error_msg));
        }

        let body = response.text().await?;
        Ok(Page::parse(url, &body))
    }

    /// Downloads `url` to `dest`, presenting the image user agent the site expects.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        tracing::debug!("Downloading {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.image_user_agent.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            let error_msg = format!("GET {} failed with status: {}", url, response.status());
            tracing::error!("{}", error_msg);
            return Err(ScrapeError::NetworkError(error_msg));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}
