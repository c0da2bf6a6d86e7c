//! Wire types for the archive backend API

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `"1944"`, `1944` or `null`; the scrapers are not consistent
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// One image result as returned by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, deserialize_with = "string_or_number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub source_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "is_downloaded", default, deserialize_with = "nullable")]
    pub downloaded: bool,
}

impl Entity {
    /// Identifier used for selection; falls back to the database id
    pub fn key(&self) -> &str {
        if self.source_id.is_empty() {
            self.id.as_deref().unwrap_or_default()
        } else {
            &self.source_id
        }
    }

    /// Build an entity from a file already stored by the backend
    pub fn from_downloaded(file: &DownloadedFile) -> Self {
        Self {
            source_id: file.filename.clone(),
            title: file.filename.clone(),
            source_url: file.web_url.clone(),
            thumbnail_url: Some(file.web_url.clone()),
            file_size: Some(file.file_size),
            downloaded: true,
            ..Default::default()
        }
    }
}

/// One video result (Archive.org)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoEntity {
    #[serde(default, deserialize_with = "nullable")]
    pub source_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub page_url: String,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub download_url: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Browsable category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_count: u64,
}

impl Category {
    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().filter(|i| !i.is_empty()).unwrap_or("📁")
    }
}

/// File stored in the local downloads folder
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DownloadedFile {
    #[serde(default, deserialize_with = "nullable")]
    pub filename: String,
    #[serde(default, deserialize_with = "nullable")]
    pub web_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub file_size: u64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Search history entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub query: String,
    #[serde(default, deserialize_with = "nullable")]
    pub results_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub images: Vec<Entity>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideosResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub videos: Vec<VideoEntity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `/download-batch`
#[derive(Debug, Serialize)]
pub struct BatchDownloadRequest<'a> {
    pub images: &'a [Entity],
    pub category_slug: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct BatchDownloadResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub downloaded: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub skipped: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub failed: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub total: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadedResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub images: Vec<DownloadedFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub total_downloaded: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub total_size_mb: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoriteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wikimedia_image() {
        let json = r#"{
            "source_id": "12345",
            "title": "Tiger I in Tunisia",
            "source_url": "https://upload.wikimedia.org/tiger.jpg",
            "thumbnail_url": "https://upload.wikimedia.org/thumb/tiger.jpg",
            "width": 1920,
            "height": 1080,
            "file_size": 2048,
            "license": "Public domain",
            "source": "wikimedia"
        }"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.key(), "12345");
        assert_eq!(entity.width, Some(1920));
        assert!(!entity.downloaded);
    }

    #[test]
    fn test_nulls_collapse_to_defaults() {
        let json = r#"{"source_id": "a", "title": null, "source_url": null, "is_downloaded": null}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.title, "");
        assert!(!entity.downloaded);

        let resp: ImagesResponse = serde_json::from_str(r#"{"success": true, "images": null}"#).unwrap();
        assert!(resp.images.is_empty());
    }

    #[test]
    fn test_database_id_used_when_source_id_missing() {
        let entity: Entity = serde_json::from_str(r#"{"id": 7, "title": "x"}"#).unwrap();
        assert_eq!(entity.key(), "7");
    }

    #[test]
    fn test_video_year_accepts_numbers() {
        let video: VideoEntity =
            serde_json::from_str(r#"{"source_id": "archive_x", "year": 1944, "downloads": 12}"#).unwrap();
        assert_eq!(video.year.as_deref(), Some("1944"));

        let video: VideoEntity = serde_json::from_str(r#"{"source_id": "archive_y", "year": ""}"#).unwrap();
        assert_eq!(video.year, None);
    }

    #[test]
    fn test_downloaded_file_to_entity() {
        let file = DownloadedFile {
            filename: "tiger.jpg".to_string(),
            web_url: "/downloads/tanklar/tiger.jpg".to_string(),
            file_size: 1536,
            category: Some("tanklar".to_string()),
        };
        let entity = Entity::from_downloaded(&file);
        assert_eq!(entity.key(), "tiger.jpg");
        assert_eq!(entity.thumbnail_url.as_deref(), Some("/downloads/tanklar/tiger.jpg"));
        assert!(entity.downloaded);
    }

    #[test]
    fn test_batch_request_body() {
        let images = vec![Entity {
            source_id: "1".to_string(),
            title: "t".to_string(),
            source_url: "u".to_string(),
            ..Default::default()
        }];
        let body = serde_json::to_value(BatchDownloadRequest {
            images: &images,
            category_slug: "diger",
        })
        .unwrap();
        assert_eq!(body["category_slug"], "diger");
        assert_eq!(body["images"][0]["source_id"], "1");
        assert_eq!(body["images"][0]["is_downloaded"], false);
    }
}
