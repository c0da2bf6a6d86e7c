//! Projection of the displayed list into card descriptors
//!
//! Rendering is a pure function of the list and the selection. The UI layer
//! turns the descriptors into widgets and rebuilds them from scratch each time.

use crate::backend::{Entity, VideoEntity};
use crate::format::{format_file_size, format_resolution};
use crate::state::{Displayed, Selection};

/// Message/icon pair shown instead of cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub icon: String,
}

impl EmptyState {
    pub fn new(message: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            icon: icon.into(),
        }
    }
}

impl Default for EmptyState {
    fn default() -> Self {
        Self::new("No images", "🖼️")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Image card with a selection checkbox
    Select { selected: bool },
    /// Video card; opens external pages instead of being selectable
    Video { download_url: String, watch_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDescriptor {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub meta: Vec<String>,
    pub downloaded: bool,
    pub action: CardAction,
}

impl CardDescriptor {
    pub fn selected(&self) -> bool {
        matches!(self.action, CardAction::Select { selected: true })
    }

    pub fn is_video(&self) -> bool {
        matches!(self.action, CardAction::Video { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Cards(Vec<CardDescriptor>),
    Empty(EmptyState),
}

/// Render the displayed list; `empty` overrides the default placeholder
pub fn render(displayed: &Displayed, selection: &Selection, empty: Option<&EmptyState>) -> Rendered {
    if displayed.is_empty() {
        return Rendered::Empty(empty.cloned().unwrap_or_default());
    }

    let cards = match displayed {
        Displayed::Images(images) => images.iter().map(|e| image_card(e, selection)).collect(),
        Displayed::Videos(videos) => videos.iter().map(video_card).collect(),
    };
    Rendered::Cards(cards)
}

fn title_or_untitled(title: &str) -> String {
    if title.trim().is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    }
}

fn image_card(entity: &Entity, selection: &Selection) -> CardDescriptor {
    let mut meta = Vec::new();
    if let Some(resolution) = format_resolution(entity.width, entity.height) {
        meta.push(resolution);
    }
    let size = format_file_size(entity.file_size.unwrap_or(0));
    if !size.is_empty() {
        meta.push(size);
    }

    let thumbnail = entity
        .thumbnail_url
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&entity.source_url)
        .to_string();

    CardDescriptor {
        id: entity.key().to_string(),
        title: title_or_untitled(&entity.title),
        thumbnail,
        meta,
        downloaded: entity.downloaded,
        action: CardAction::Select {
            selected: selection.contains(entity.key()),
        },
    }
}

fn video_card(video: &VideoEntity) -> CardDescriptor {
    let mut meta = vec![format!("{} downloads", video.downloads)];
    if let Some(year) = &video.year {
        meta.push(year.clone());
    }

    CardDescriptor {
        id: video.source_id.clone(),
        title: title_or_untitled(&video.title),
        thumbnail: video.thumbnail_url.clone(),
        meta,
        downloaded: false,
        action: CardAction::Video {
            download_url: video.download_url.clone(),
            watch_url: video.page_url.clone(),
        },
    }
}
