use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::http::{bearer_headers, expect_status, expect_success, shared_client};
use super::page::{decode_items, Page};
use super::template::{PathParams, ResourceTemplate};
use crate::auth::Credential;
use crate::error::{Result, SetupError};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Authenticated client for templated REST collections.
///
/// Every request carries the credential the client was built with. The
/// client never refreshes it; callers build a new client per batch run from
/// a freshly obtained credential.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
    page_size: usize,
}

impl ResourceClient {
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            http: shared_client().clone(),
            base_url: base_url.into(),
            credential,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(
        &self,
        template: &ResourceTemplate,
        params: &PathParams,
    ) -> Result<(String, String)> {
        let path = template.render(params)?;
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok((path, url))
    }

    /// One page starting at `offset`.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        template: &ResourceTemplate,
        params: &PathParams,
        offset: usize,
    ) -> Result<Page<T>> {
        let (path, url) = self.resolve(template, params)?;
        let response = self
            .http
            .get(&url)
            .headers(bearer_headers(&self.credential))
            .query(&[("limit", self.page_size), ("offset", offset)])
            .send()
            .await
            .map_err(|e| SetupError::transport(&path, &e))?;

        let response = expect_status(&path, response, StatusCode::OK).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| SetupError::transport(&path, &e))?;
        let items = decode_items(&body).map_err(|e| SetupError::decode(&path, e))?;

        tracing::debug!(resource = %path, offset, count = items.len(), "fetched page");
        Ok(Page::new(items, self.page_size))
    }

    /// Every item of the collection, in server order.
    ///
    /// Pages are requested until one comes back short. A collection whose
    /// size is a multiple of the page size therefore costs one extra request
    /// for the trailing empty page. Any failure discards what was gathered.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        template: &ResourceTemplate,
        params: &PathParams,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut offset = 0;
        let mut requests = 0usize;

        loop {
            let page: Page<T> = self.fetch_page(template, params, offset).await?;
            requests += 1;
            offset += self.page_size;
            let last = page.is_last_page;
            items.extend(page.items);
            if last {
                break;
            }
        }

        tracing::info!(resource = %template, total = items.len(), requests, "fetched collection");
        Ok(items)
    }

    /// Single resource. A non-2xx status is an error carrying the status.
    pub async fn get<T: DeserializeOwned>(
        &self,
        template: &ResourceTemplate,
        params: &PathParams,
    ) -> Result<T> {
        let (path, url) = self.resolve(template, params)?;
        let response = self
            .http
            .get(&url)
            .headers(bearer_headers(&self.credential))
            .send()
            .await
            .map_err(|e| SetupError::transport(&path, &e))?;

        let response = expect_success(&path, response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| SetupError::transport(&path, &e))?;
        serde_json::from_slice(&body).map_err(|e| SetupError::decode(&path, e))
    }

    /// POST `payload` as JSON. Succeeds only on `201 Created`.
    ///
    /// The payload may be a single object or an array for bulk endpoints.
    /// No retry happens here.
    pub async fn create<B: Serialize + ?Sized>(
        &self,
        template: &ResourceTemplate,
        params: &PathParams,
        payload: &B,
    ) -> Result<()> {
        let (path, url) = self.resolve(template, params)?;
        let response = self
            .http
            .post(&url)
            .headers(bearer_headers(&self.credential))
            .json(payload)
            .send()
            .await
            .map_err(|e| SetupError::transport(&path, &e))?;

        expect_status(&path, response, StatusCode::CREATED).await?;
        tracing::debug!(resource = %path, "created resource");
        Ok(())
    }
}
