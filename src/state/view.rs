//! View-state store: what the grid is currently showing

use crate::backend::{Entity, VideoEntity};

/// Default minimum width for image searches
pub const DEFAULT_MIN_WIDTH: u32 = 600;

/// Minimum width choices offered in the filter
pub const MIN_WIDTH_CHOICES: [u32; 4] = [600, 800, 1200, 1920];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    #[default]
    Search,
    Category,
    Downloaded,
    Favorites,
    Videos,
}

/// Whatever list currently fills the grid
#[derive(Debug, Clone, PartialEq)]
pub enum Displayed {
    Images(Vec<Entity>),
    Videos(Vec<VideoEntity>),
}

impl Default for Displayed {
    fn default() -> Self {
        Displayed::Images(Vec::new())
    }
}

impl Displayed {
    pub fn len(&self) -> usize {
        match self {
            Displayed::Images(images) => images.len(),
            Displayed::Videos(videos) => videos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids that may be selected; videos are never selectable
    pub fn selectable_ids(&self) -> Vec<String> {
        match self {
            Displayed::Images(images) => images.iter().map(|e| e.key().to_string()).collect(),
            Displayed::Videos(_) => Vec::new(),
        }
    }

    pub fn images(&self) -> &[Entity] {
        match self {
            Displayed::Images(images) => images,
            Displayed::Videos(_) => &[],
        }
    }

    pub fn find_image(&self, id: &str) -> Option<&Entity> {
        self.images().iter().find(|e| e.key() == id)
    }
}

/// Single record of the current view and its filters
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    view: ViewKind,
    category: Option<String>,
    query: Option<String>,
    displayed: Displayed,
    min_width: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: ViewKind::default(),
            category: None,
            query: None,
            displayed: Displayed::default(),
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ViewState {
    pub fn new(min_width: u32) -> Self {
        Self {
            min_width,
            ..Default::default()
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn displayed(&self) -> &Displayed {
        &self.displayed
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn set_view(&mut self, view: ViewKind) {
        self.view = view;
    }

    /// Activating a category clears the query
    pub fn set_category(&mut self, slug: Option<String>) {
        self.category = non_empty(slug);
        if self.category.is_some() {
            self.query = None;
        }
    }

    /// Activating a query clears the category
    pub fn set_query(&mut self, text: Option<String>) {
        self.query = non_empty(text);
        if self.query.is_some() {
            self.category = None;
        }
    }

    pub fn set_min_width(&mut self, min_width: u32) {
        self.min_width = min_width;
    }

    /// Swap the displayed list and return its selectable ids.
    ///
    /// Only `Session` calls this, so the selection is always rescoped with it.
    pub(crate) fn replace_entities(&mut self, list: Displayed) -> Vec<String> {
        self.displayed = list;
        self.displayed.selectable_ids()
    }
}
