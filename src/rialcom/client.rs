// src/rialcom/client.rs
use crate::config::ScraperConfig;
use crate::utils::error::FetchError;
use reqwest::header;
use scraper::Html;

// The site serves a stripped page to non-browser agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// Creates a reqwest client that looks like a desktop browser.
fn build_client(config: &ScraperConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static(ACCEPT_LANGUAGE));

    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(config.request_timeout)
        .build()
}

/// Downloads the tariff page and parses it. Any failure here is fatal for the run.
pub async fn fetch_document(config: &ScraperConfig) -> Result<Html, FetchError> {
    let client = build_client(config)?;

    tracing::info!("Downloading tariff page: {}", config.url);
    tracing::debug!("Using User-Agent: {}", BROWSER_USER_AGENT);

    let response = client.get(&config.url).send().await.map_err(|e| {
        tracing::error!("Request to {} failed: {}", config.url, e);
        FetchError::Network(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, config.url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(config.url.clone()));
        }
        return Err(FetchError::Http(status));
    }

    // Decodes with the charset from Content-Type, UTF-8 otherwise
    let body = response.text().await?;
    tracing::info!("Page loaded ({} bytes)", body.len());

    Ok(Html::parse_document(&body))
}
