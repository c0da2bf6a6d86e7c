//! Image/video split for a single search query

use super::view::Displayed;
use crate::backend::{Entity, VideoEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchTab {
    #[default]
    Images,
    Videos,
}

/// Both result lists of one search, fetched independently
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSplit {
    query: String,
    images: Vec<Entity>,
    videos: Vec<VideoEntity>,
    active: SearchTab,
}

impl SearchSplit {
    /// Picks the first non-empty tab, images first
    pub fn new(query: String, images: Vec<Entity>, videos: Vec<VideoEntity>) -> Self {
        let active = if images.is_empty() && !videos.is_empty() {
            SearchTab::Videos
        } else {
            SearchTab::Images
        };
        Self {
            query,
            images,
            videos,
            active,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active(&self) -> SearchTab {
        self.active
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    pub fn total(&self) -> usize {
        self.image_count() + self.video_count()
    }

    /// Tabs are hidden when neither list has anything
    pub fn tabs_visible(&self) -> bool {
        self.total() > 0
    }

    pub fn switch(&mut self, tab: SearchTab) {
        self.active = tab;
    }

    /// The list to put on screen for the active tab
    pub fn active_list(&self) -> Displayed {
        match self.active {
            SearchTab::Images => Displayed::Images(self.images.clone()),
            SearchTab::Videos => Displayed::Videos(self.videos.clone()),
        }
    }
}
