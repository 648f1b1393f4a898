use crate::config::{ClientConfig, Environment};
use crate::core::store::{Store, DEFAULT_CHUNK_DAYS};
use crate::domain::model::StoreRecord;
use crate::utils::error::{BrightloomError, Result};
use crate::utils::validation::{self, Validate};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

const AUTH_HEADER: &str = "X-AuthToken";

/// Authenticated session against one Brightloom environment. Stateless beyond
/// the base URL and the reused connection pool.
#[derive(Debug)]
pub struct Client {
    base_url: String,
    session: reqwest::Client,
    default_chunk_days: u32,
}

impl Client {
    pub fn new(api_key: &str, environment: Environment) -> Result<Self> {
        Self::build(api_key, environment.base_url().to_string())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client = Self::new(&config.api_key, config.environment)?;
        client.default_chunk_days = config.chunk_days.unwrap_or(DEFAULT_CHUNK_DAYS);
        Ok(client)
    }

    /// Point the client at a non-standard base URL (self-hosted gateways,
    /// test servers).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        validation::validate_url("base_url", base_url)?;
        Self::build(api_key, base_url.trim_end_matches('/').to_string())
    }

    fn build(api_key: &str, base_url: String) -> Result<Self> {
        let token = HeaderValue::from_str(api_key).map_err(|_| BrightloomError::ConfigError {
            message: "api_key contains characters not allowed in a header value".to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, token);

        let session = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url,
            session,
            default_chunk_days: DEFAULT_CHUNK_DAYS,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chunk size used by [`Store::get_orders`] when none is given.
    pub fn default_chunk_days(&self) -> u32 {
        self.default_chunk_days
    }

    /// Fetch every store visible to this API key. Each returned [`Store`]
    /// borrows this client for its own requests.
    pub async fn list_stores(&self) -> Result<Vec<Store<'_>>> {
        let url = format!("{}/stores", self.base_url);
        tracing::debug!("GET {}", url);

        let response = self.session.get(&url).send().await?.error_for_status()?;
        let body: Value = response.json().await?;

        let stores = body.get("stores").and_then(Value::as_array).ok_or_else(|| {
            BrightloomError::MissingFieldError {
                field: "stores".to_string(),
                context: "stores response".to_string(),
            }
        })?;

        tracing::info!("Listed {} stores", stores.len());

        stores
            .iter()
            .map(|entry| {
                let record: StoreRecord = serde_json::from_value(entry.clone())?;
                Ok(Store::new(record, self))
            })
            .collect()
    }

    /// Authenticated GET that follows `total_pages` pagination: the first
    /// request carries `page_number=1`; if the body reports `total_pages = N`,
    /// pages 2 through N are fetched in order. Returns every page body, a
    /// singleton when the response is unpaginated.
    pub(crate) async fn get_paginated(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Value>> {
        let first = self.get_page(url, params, 1).await?;
        let total_pages = first.get("total_pages").and_then(Value::as_u64).unwrap_or(1);

        let mut pages = Vec::with_capacity(total_pages as usize);
        pages.push(first);

        for page_number in 2..=total_pages {
            pages.push(self.get_page(url, params, page_number).await?);
        }

        Ok(pages)
    }

    async fn get_page(&self, url: &str, params: &[(&str, String)], page_number: u64) -> Result<Value> {
        tracing::debug!("GET {} (page {})", url, page_number);

        let response = self
            .session
            .get(url)
            .query(params)
            .query(&[("page_number", page_number.to_string())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
