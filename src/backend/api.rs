//! HTTP client for the archive backend API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::types::*;
use crate::error::ApiError;

/// Category used by the backend when none is given
pub const FALLBACK_CATEGORY: &str = "diger";

/// Minimum width sent when the caller leaves the filter at zero
const DEFAULT_MIN_WIDTH: u32 = 800;

/// Everything the client needs from the backend.
///
/// The orchestration layer only talks to this trait, so it can run against a
/// fake in tests.
#[async_trait]
pub trait ArchiveApi: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn category_images(&self, slug: &str, limit: u32) -> Result<Vec<Entity>, ApiError>;
    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<Entity>, ApiError>;
    async fn search_all(&self, query: &str, limit: u32) -> Result<Vec<Entity>, ApiError>;
    async fn search_videos(&self, query: &str, limit: u32) -> Result<Vec<VideoEntity>, ApiError>;
    async fn category_videos(&self, category: &str, limit: u32) -> Result<Vec<VideoEntity>, ApiError>;
    async fn download(&self, url: &str, category: &str, title: Option<&str>) -> Result<DownloadResponse, ApiError>;
    async fn download_batch(&self, images: &[Entity], category_slug: &str) -> Result<BatchDownloadResult, ApiError>;
    async fn downloaded(&self, category: Option<&str>) -> Result<Vec<DownloadedFile>, ApiError>;
    async fn open_downloads_folder(&self) -> Result<FolderResponse, ApiError>;
    async fn stats(&self) -> Result<Stats, ApiError>;
    async fn history(&self, limit: u32) -> Result<Vec<HistoryEntry>, ApiError>;
    async fn clear_history(&self) -> Result<(), ApiError>;
    async fn toggle_favorite(&self, image_id: &str) -> Result<FavoriteResponse, ApiError>;
    async fn favorites(&self) -> Result<Vec<Entity>, ApiError>;
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}

/// Parameters for `/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    pub query: String,
    pub limit: u32,
    pub min_width: u32,
    pub category: Option<String>,
}

impl ImageQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let min_width = if self.min_width == 0 {
            DEFAULT_MIN_WIDTH
        } else {
            self.min_width
        };
        let mut params = vec![
            ("q", self.query.clone()),
            ("limit", self.limit.to_string()),
            ("min_width", min_width.to_string()),
        ];
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            params.push(("category", category.clone()));
        }
        params
    }
}

/// Per-call overrides, merged over the JSON defaults
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    fn get(query: Vec<(&'static str, String)>) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// FastAPI validation errors carry a list instead of a string
    fn message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// Client for communicating with the archive backend
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API endpoint (`endpoint` starts with `/`)
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url, endpoint)
    }

    /// Resolve a backend-relative path such as `/downloads/x.jpg`
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            path.to_string()
        }
    }

    /// Send a request and decode the JSON body.
    ///
    /// Failures are logged here and still returned to the caller.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let result = self.send(endpoint, options).await;
        if let Err(ref e) = result {
            tracing::error!("API error on {}: {}", endpoint, e);
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!("{} {}", options.method, url);

        let mut builder = self
            .client
            .request(options.method, &url)
            .headers(merge_headers(options.headers));
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = options.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::message);
            return Err(ApiError::from_status(status.as_u16(), detail));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch raw bytes (thumbnails); not routed through `/api`
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), None));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// JSON content type, overridden by anything the caller supplies
fn merge_headers(overrides: HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in overrides.iter() {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

fn rejected(error: Option<String>, fallback: &str) -> ApiError {
    ApiError::Rejected(error.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait]
impl ArchiveApi for BackendClient {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let resp: CategoriesResponse = self.request("/categories", RequestOptions::default()).await?;
        if !resp.success {
            return Err(rejected(None, "Could not load categories"));
        }
        Ok(resp.categories)
    }

    async fn category_images(&self, slug: &str, limit: u32) -> Result<Vec<Entity>, ApiError> {
        let endpoint = format!("/category-images/{}", urlencoding::encode(slug));
        let resp: ImagesResponse = self
            .request(&endpoint, RequestOptions::get(vec![("limit", limit.to_string())]))
            .await?;
        if !resp.success {
            return Err(rejected(None, "Could not load category images"));
        }
        Ok(resp.images)
    }

    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<Entity>, ApiError> {
        let resp: ImagesResponse = self
            .request("/search", RequestOptions::get(query.params()))
            .await?;
        if !resp.success {
            return Err(rejected(None, "Image search failed"));
        }
        Ok(resp.images)
    }

    async fn search_all(&self, query: &str, limit: u32) -> Result<Vec<Entity>, ApiError> {
        let params = vec![("q", query.to_string()), ("limit", limit.to_string())];
        let resp: ImagesResponse = self.request("/search-all", RequestOptions::get(params)).await?;
        if !resp.success {
            return Err(rejected(None, "Search across sources failed"));
        }
        Ok(resp.images)
    }

    async fn search_videos(&self, query: &str, limit: u32) -> Result<Vec<VideoEntity>, ApiError> {
        let params = vec![("q", query.to_string()), ("limit", limit.to_string())];
        let resp: VideosResponse = self.request("/videos", RequestOptions::get(params)).await?;
        if !resp.success {
            return Err(rejected(None, "Video search failed"));
        }
        Ok(resp.videos)
    }

    async fn category_videos(&self, category: &str, limit: u32) -> Result<Vec<VideoEntity>, ApiError> {
        let endpoint = format!("/videos/{}", urlencoding::encode(category));
        let resp: VideosResponse = self
            .request(&endpoint, RequestOptions::get(vec![("limit", limit.to_string())]))
            .await?;
        if !resp.success {
            return Err(rejected(None, "Could not load category videos"));
        }
        Ok(resp.videos)
    }

    async fn download(&self, url: &str, category: &str, title: Option<&str>) -> Result<DownloadResponse, ApiError> {
        let category = if category.is_empty() { FALLBACK_CATEGORY } else { category };
        let mut query = vec![("url", url.to_string()), ("category", category.to_string())];
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            query.push(("title", title.to_string()));
        }
        let options = RequestOptions {
            query,
            ..RequestOptions::with_method(Method::POST)
        };
        let resp: DownloadResponse = self.request("/download", options).await?;
        if !resp.success {
            return Err(rejected(resp.error, "Download failed"));
        }
        Ok(resp)
    }

    async fn download_batch(&self, images: &[Entity], category_slug: &str) -> Result<BatchDownloadResult, ApiError> {
        let body = serde_json::to_value(BatchDownloadRequest {
            images,
            category_slug,
        })?;
        let options = RequestOptions {
            body: Some(body),
            ..RequestOptions::with_method(Method::POST)
        };
        let result: BatchDownloadResult = self.request("/download-batch", options).await?;
        if !result.success {
            return Err(rejected(None, "Batch download failed"));
        }
        Ok(result)
    }

    async fn downloaded(&self, category: Option<&str>) -> Result<Vec<DownloadedFile>, ApiError> {
        let query = category
            .map(|c| vec![("category", c.to_string())])
            .unwrap_or_default();
        let resp: DownloadedResponse = self.request("/downloaded", RequestOptions::get(query)).await?;
        if !resp.success {
            return Err(rejected(None, "Could not list downloaded images"));
        }
        Ok(resp.images)
    }

    async fn open_downloads_folder(&self) -> Result<FolderResponse, ApiError> {
        self.request("/open-downloads-folder", RequestOptions::default()).await
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        let stats: Stats = self.request("/stats", RequestOptions::default()).await?;
        if !stats.success {
            return Err(rejected(None, "Could not load stats"));
        }
        Ok(stats)
    }

    async fn history(&self, limit: u32) -> Result<Vec<HistoryEntry>, ApiError> {
        let resp: HistoryResponse = self
            .request("/history", RequestOptions::get(vec![("limit", limit.to_string())]))
            .await?;
        Ok(resp.history)
    }

    async fn clear_history(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .request("/history", RequestOptions::with_method(Method::DELETE))
            .await?;
        Ok(())
    }

    async fn toggle_favorite(&self, image_id: &str) -> Result<FavoriteResponse, ApiError> {
        let endpoint = format!("/favorites/{}", urlencoding::encode(image_id));
        self.request(&endpoint, RequestOptions::with_method(Method::POST)).await
    }

    async fn favorites(&self) -> Result<Vec<Entity>, ApiError> {
        let resp: ImagesResponse = self.request("/favorites", RequestOptions::default()).await?;
        Ok(resp.images)
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.request("/health", RequestOptions::default()).await
    }
}
