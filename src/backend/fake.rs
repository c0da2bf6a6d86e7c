//! In-memory backend for orchestration tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::api::{ArchiveApi, ImageQuery};
use super::types::*;
use crate::error::ApiError;

#[derive(Default)]
pub struct FakeApi {
    pub images: HashMap<String, Result<Vec<Entity>, ApiError>>,
    pub videos: HashMap<String, Result<Vec<VideoEntity>, ApiError>>,
    pub category_images: HashMap<String, Vec<Entity>>,
    pub categories: Vec<Category>,
    pub downloaded: Vec<DownloadedFile>,
    pub batch: Option<BatchDownloadResult>,
    /// Takes precedence over `batch`
    pub batch_error: Option<ApiError>,
    pub stats: Stats,
    pub history: Vec<HistoryEntry>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn image(id: &str) -> Entity {
    Entity {
        source_id: id.to_string(),
        title: format!("Image {}", id),
        source_url: format!("https://upload.example.org/{}.jpg", id),
        ..Default::default()
    }
}

pub fn video(id: &str) -> VideoEntity {
    VideoEntity {
        source_id: format!("archive_{}", id),
        title: format!("Newsreel {}", id),
        page_url: format!("https://archive.org/details/{}", id),
        download_url: format!("https://archive.org/download/{}", id),
        ..Default::default()
    }
}

#[async_trait]
impl ArchiveApi for FakeApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("categories".to_string());
        Ok(self.categories.clone())
    }

    async fn category_images(&self, slug: &str, limit: u32) -> Result<Vec<Entity>, ApiError> {
        self.record(format!("category_images {} {}", slug, limit));
        self.category_images
            .get(slug)
            .cloned()
            .ok_or_else(|| ApiError::from_status(404, Some("Category not found".to_string())))
    }

    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<Entity>, ApiError> {
        self.record(format!("search_images {} {}", query.query, query.min_width));
        self.images.get(&query.query).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn search_all(&self, query: &str, limit: u32) -> Result<Vec<Entity>, ApiError> {
        self.record(format!("search_all {} {}", query, limit));
        self.images.get(query).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn search_videos(&self, query: &str, limit: u32) -> Result<Vec<VideoEntity>, ApiError> {
        self.record(format!("search_videos {} {}", query, limit));
        self.videos.get(query).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn category_videos(&self, category: &str, limit: u32) -> Result<Vec<VideoEntity>, ApiError> {
        self.record(format!("category_videos {} {}", category, limit));
        Ok(Vec::new())
    }

    async fn download(&self, url: &str, category: &str, _title: Option<&str>) -> Result<DownloadResponse, ApiError> {
        self.record(format!("download {} {}", url, category));
        Ok(DownloadResponse {
            success: true,
            ..Default::default()
        })
    }

    async fn download_batch(&self, images: &[Entity], category_slug: &str) -> Result<BatchDownloadResult, ApiError> {
        self.record(format!("download_batch {} {}", images.len(), category_slug));
        if let Some(err) = &self.batch_error {
            return Err(err.clone());
        }
        self.batch
            .ok_or_else(|| ApiError::Network("connection reset".to_string()))
    }

    async fn downloaded(&self, _category: Option<&str>) -> Result<Vec<DownloadedFile>, ApiError> {
        self.record("downloaded".to_string());
        Ok(self.downloaded.clone())
    }

    async fn open_downloads_folder(&self) -> Result<FolderResponse, ApiError> {
        self.record("open_downloads_folder".to_string());
        Ok(FolderResponse {
            success: false,
            path: "/srv/archive/downloads".to_string(),
        })
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        self.record("stats".to_string());
        Ok(self.stats)
    }

    async fn history(&self, limit: u32) -> Result<Vec<HistoryEntry>, ApiError> {
        self.record(format!("history {}", limit));
        Ok(self.history.clone())
    }

    async fn clear_history(&self) -> Result<(), ApiError> {
        self.record("clear_history".to_string());
        Ok(())
    }

    async fn toggle_favorite(&self, image_id: &str) -> Result<FavoriteResponse, ApiError> {
        self.record(format!("toggle_favorite {}", image_id));
        Ok(FavoriteResponse::default())
    }

    async fn favorites(&self) -> Result<Vec<Entity>, ApiError> {
        self.record("favorites".to_string());
        Ok(Vec::new())
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.record("health".to_string());
        Ok(HealthResponse {
            status: "healthy".to_string(),
            version: None,
        })
    }
}
