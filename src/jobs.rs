//! Backend calls issued by the session and their results
//!
//! A `Fetch` describes one call (or the dual search pair). `execute` runs it
//! against any `ArchiveApi`, and the session applies the `Fetched` result.

use crate::backend::*;
use crate::error::ApiError;
use crate::state::Ticket;

/// Where a video listing comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Query(String),
    Category(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    /// Images and videos for one query, fetched concurrently
    Search {
        images: ImageQuery,
        video_limit: u32,
    },
    SearchAll { query: String, limit: u32 },
    CategoryImages { slug: String, limit: u32 },
    Videos { source: VideoSource, limit: u32 },
    Downloaded,
    Categories,
    Stats,
    History { limit: u32 },
    ClearHistory,
    BatchDownload { images: Vec<Entity>, category: String },
    DownloadOne { entity: Entity, category: String },
    OpenFolder,
}

#[derive(Debug, Clone)]
pub enum Fetched {
    Search {
        query: String,
        images: Result<Vec<Entity>, ApiError>,
        videos: Result<Vec<VideoEntity>, ApiError>,
    },
    SearchAll {
        query: String,
        result: Result<Vec<Entity>, ApiError>,
    },
    CategoryImages {
        slug: String,
        result: Result<Vec<Entity>, ApiError>,
    },
    Videos(Result<Vec<VideoEntity>, ApiError>),
    Downloaded(Result<Vec<DownloadedFile>, ApiError>),
    Categories(Result<Vec<Category>, ApiError>),
    Stats(Result<Stats, ApiError>),
    History(Result<Vec<HistoryEntry>, ApiError>),
    HistoryCleared(Result<(), ApiError>),
    BatchDownload(Result<BatchDownloadResult, ApiError>),
    DownloadOne {
        id: String,
        result: Result<DownloadResponse, ApiError>,
    },
    OpenFolder(Result<FolderResponse, ApiError>),
}

/// A call to run; `ticket` is `None` for actions that must always apply
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub ticket: Option<Ticket>,
    pub fetch: Fetch,
}

/// Run one fetch to completion.
///
/// The dual search waits for both legs; each leg keeps its own result.
pub async fn execute(api: &dyn ArchiveApi, fetch: Fetch) -> Fetched {
    match fetch {
        Fetch::Search { images, video_limit } => {
            let (image_result, video_result) = tokio::join!(
                api.search_images(&images),
                api.search_videos(&images.query, video_limit)
            );
            Fetched::Search {
                query: images.query,
                images: image_result,
                videos: video_result,
            }
        }
        Fetch::SearchAll { query, limit } => {
            let result = api.search_all(&query, limit).await;
            Fetched::SearchAll { query, result }
        }
        Fetch::CategoryImages { slug, limit } => {
            let result = api.category_images(&slug, limit).await;
            Fetched::CategoryImages { slug, result }
        }
        Fetch::Videos { source, limit } => Fetched::Videos(match source {
            VideoSource::Query(query) => api.search_videos(&query, limit).await,
            VideoSource::Category(category) => api.category_videos(&category, limit).await,
        }),
        Fetch::Downloaded => Fetched::Downloaded(api.downloaded(None).await),
        Fetch::Categories => Fetched::Categories(api.categories().await),
        Fetch::Stats => Fetched::Stats(api.stats().await),
        Fetch::History { limit } => Fetched::History(api.history(limit).await),
        Fetch::ClearHistory => Fetched::HistoryCleared(api.clear_history().await),
        Fetch::BatchDownload { images, category } => {
            Fetched::BatchDownload(api.download_batch(&images, &category).await)
        }
        Fetch::DownloadOne { entity, category } => {
            let title = Some(entity.title.as_str()).filter(|t| !t.is_empty());
            let result = api.download(&entity.source_url, &category, title).await;
            Fetched::DownloadOne {
                id: entity.key().to_string(),
                result,
            }
        }
        Fetch::OpenFolder => Fetched::OpenFolder(api.open_downloads_folder().await),
    }
}
