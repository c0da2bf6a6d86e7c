//! Orchestration: user intents in, state changes and backend jobs out
//!
//! `Session` owns the whole client state. Every intent mutates it first and
//! returns the jobs to run; every result comes back through `apply`, which
//! drops anything answered after a newer request on the same channel.

use std::collections::HashSet;

use crate::backend::*;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::jobs::{Fetch, Fetched, Job, VideoSource};
use crate::render::{render, EmptyState, Rendered};
use crate::state::*;

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// What an intent or a result asks the caller to do next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub jobs: Vec<Job>,
    pub notices: Vec<Notice>,
}

impl Effects {
    fn notice(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            jobs: Vec::new(),
            notices: vec![Notice::new(severity, message)],
        }
    }

    fn push_notice(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push(Notice::new(severity, message));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageTitle {
    pub title: String,
    pub subtitle: String,
}

impl PageTitle {
    fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    fn welcome() -> Self {
        Self::new("Start searching", "Search WW2 images or browse the categories")
    }
}

/// Which search filled the grid; refresh and the width filter repeat it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    /// Images and videos
    Dual,
    /// Images from every source
    All,
}

/// Per-request limits taken from the configuration
#[derive(Debug, Clone, Copy)]
struct Limits {
    search: u32,
    video: u32,
    category: u32,
    category_video: u32,
    search_all: u32,
    history: u32,
}

// ============================================================================
// Session
// ============================================================================

pub struct Session {
    limits: Limits,
    view: ViewState,
    selection: Selection,
    split: Option<SearchSplit>,
    search_mode: Option<SearchMode>,
    video_source: Option<VideoSource>,
    batch_in_flight: bool,
    empty: Option<EmptyState>,
    page: PageTitle,
    categories: Vec<Category>,
    stats: Option<Stats>,
    history: Vec<HistoryEntry>,
    marked_downloaded: HashSet<String>,
    sequencer: Sequencer,
    loading: Option<String>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            limits: Limits {
                search: config.search_limit,
                video: config.video_limit,
                category: config.category_limit,
                category_video: config.category_video_limit,
                search_all: config.search_all_limit,
                history: config.history_limit,
            },
            view: ViewState::new(config.min_width),
            selection: Selection::new(),
            split: None,
            search_mode: None,
            video_source: None,
            batch_in_flight: false,
            empty: None,
            page: PageTitle::welcome(),
            categories: Vec::new(),
            stats: None,
            history: Vec::new(),
            marked_downloaded: HashSet::new(),
            sequencer: Sequencer::new(),
            loading: None,
        }
    }

    // ------------------------------------------------------------------------
    // Read access for the UI
    // ------------------------------------------------------------------------

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> SelectionSummary {
        self.selection.summary()
    }

    pub fn split(&self) -> Option<&SearchSplit> {
        self.split.as_ref()
    }

    pub fn page(&self) -> &PageTitle {
        &self.page
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn loading(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    /// A batch download is waiting for its result
    pub fn batch_in_flight(&self) -> bool {
        self.batch_in_flight
    }

    /// Downloaded from the detail view during this session
    pub fn is_marked(&self, id: &str) -> bool {
        self.marked_downloaded.contains(id)
    }

    /// Downloaded either according to the backend or during this session
    pub fn is_downloaded(&self, entity: &Entity) -> bool {
        entity.downloaded || self.is_marked(entity.key())
    }

    pub fn find_image(&self, id: &str) -> Option<&Entity> {
        self.view.displayed().find_image(id)
    }

    /// Rebuild the card list from the current state
    pub fn rendered(&self) -> Rendered {
        render(self.view.displayed(), &self.selection, self.empty.as_ref())
    }

    // ------------------------------------------------------------------------
    // Internal transitions
    // ------------------------------------------------------------------------

    /// The only way the displayed list changes; selection follows it
    fn replace_entities(&mut self, list: Displayed, empty: Option<EmptyState>) {
        let ids = self.view.replace_entities(list);
        self.selection.on_list_replaced(ids);
        self.empty = empty;
    }

    fn grid_job(&mut self, fetch: Fetch, loading: &str) -> Job {
        self.loading = Some(loading.to_string());
        Job {
            ticket: Some(self.sequencer.issue(Channel::Grid)),
            fetch,
        }
    }

    fn sequenced(&mut self, channel: Channel, fetch: Fetch) -> Job {
        Job {
            ticket: Some(self.sequencer.issue(channel)),
            fetch,
        }
    }

    fn stats_job(&mut self) -> Job {
        self.sequenced(Channel::Stats, Fetch::Stats)
    }

    fn history_job(&mut self) -> Job {
        let limit = self.limits.history;
        self.sequenced(Channel::History, Fetch::History { limit })
    }

    fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    /// Startup: categories, stats and history
    pub fn load_initial(&mut self) -> Effects {
        let categories = self.sequenced(Channel::Categories, Fetch::Categories);
        let stats = self.stats_job();
        let history = self.history_job();
        Effects {
            jobs: vec![categories, stats, history],
            notices: Vec::new(),
        }
    }

    /// Image + video search for `query`
    pub fn search(&mut self, query: &str) -> Effects {
        let query = query.trim();
        if query.is_empty() {
            return Effects::default();
        }

        self.view.set_view(ViewKind::Search);
        self.view.set_query(Some(query.to_string()));
        self.search_mode = Some(SearchMode::Dual);
        self.video_source = None;
        self.page = PageTitle::new(format!("\"{}\" search", query), "Searching images and videos...");

        let fetch = Fetch::Search {
            images: ImageQuery {
                query: query.to_string(),
                limit: self.limits.search,
                min_width: self.view.min_width(),
                category: self.view.category().map(str::to_string),
            },
            video_limit: self.limits.video,
        };
        let job = self.grid_job(fetch, "Searching...");
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    /// Image search across every source; no video tab
    pub fn search_all(&mut self, query: &str) -> Effects {
        let query = query.trim();
        if query.is_empty() {
            return Effects::default();
        }

        self.view.set_view(ViewKind::Search);
        self.view.set_query(Some(query.to_string()));
        self.split = None;
        self.search_mode = Some(SearchMode::All);
        self.video_source = None;
        self.page = PageTitle::new(format!("\"{}\" in all sources", query), "Searching every archive...");

        let fetch = Fetch::SearchAll {
            query: query.to_string(),
            limit: self.limits.search_all,
        };
        let job = self.grid_job(fetch, "Searching all sources...");
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    pub fn select_category(&mut self, slug: &str) -> Effects {
        self.view.set_view(ViewKind::Category);
        self.view.set_category(Some(slug.to_string()));
        self.split = None;
        self.video_source = None;
        self.page = match self.category(slug) {
            Some(c) => PageTitle::new(
                c.name.clone(),
                format!("{} {}", c.icon_or_default(), c.description.as_deref().unwrap_or_default())
                    .trim_end()
                    .to_string(),
            ),
            None => PageTitle::new(slug, ""),
        };

        let fetch = Fetch::CategoryImages {
            slug: slug.to_string(),
            limit: self.limits.category,
        };
        let job = self.grid_job(fetch, "Loading images...");
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    pub fn load_downloaded(&mut self) -> Effects {
        self.view.set_view(ViewKind::Downloaded);
        self.view.set_category(None);
        self.view.set_query(None);
        self.split = None;
        self.video_source = None;
        self.page = PageTitle::new("Downloaded images", "Your local collection");

        let job = self.grid_job(Fetch::Downloaded, "Loading images...");
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    /// Favorites are not implemented by the backend flow yet
    pub fn load_favorites(&mut self) -> Effects {
        self.view.set_view(ViewKind::Favorites);
        self.view.set_category(None);
        self.view.set_query(None);
        self.split = None;
        self.video_source = None;
        self.page = PageTitle::new("Favorites", "Images you liked");

        // Supersede whatever grid request is still in flight
        self.sequencer.issue(Channel::Grid);
        self.loading = None;
        self.replace_entities(
            Displayed::default(),
            Some(EmptyState::new("Favorites are coming soon!", "⭐")),
        );
        Effects::default()
    }

    pub fn load_videos(&mut self, source: VideoSource) -> Effects {
        self.view.set_view(ViewKind::Videos);
        self.split = None;
        let (limit, subtitle) = match &source {
            VideoSource::Query(q) => {
                self.view.set_query(Some(q.clone()));
                (self.limits.video, format!("\"{}\" search", q))
            }
            VideoSource::Category(c) => {
                self.view.set_query(None);
                self.view.set_category(None);
                (self.limits.category_video, format!("{} videos", c))
            }
        };
        self.page = PageTitle::new("🎬 WW2 Videos", subtitle);
        self.video_source = Some(source.clone());

        let job = self.grid_job(Fetch::Videos { source, limit }, "Loading videos...");
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    /// Drop the query; fall back to the active category or the welcome screen
    pub fn clear_search(&mut self) -> Effects {
        self.view.set_query(None);
        self.split = None;
        self.search_mode = None;
        if let Some(slug) = self.view.category().map(str::to_string) {
            return self.select_category(&slug);
        }

        self.view.set_view(ViewKind::Search);
        self.sequencer.issue(Channel::Grid);
        self.loading = None;
        self.page = PageTitle::welcome();
        self.replace_entities(Displayed::default(), None);
        Effects::default()
    }

    /// Applies to image searches only; re-runs an active search
    pub fn set_min_width(&mut self, min_width: u32) -> Effects {
        self.view.set_min_width(min_width);
        match (self.view.view(), self.view.query().map(str::to_string)) {
            (ViewKind::Search, Some(query)) if self.search_mode == Some(SearchMode::Dual) => self.search(&query),
            _ => Effects::default(),
        }
    }

    /// Show the other half of the current search; never refetches
    pub fn switch_tab(&mut self, tab: SearchTab) -> Effects {
        let Some(split) = self.split.as_mut() else {
            return Effects::default();
        };
        split.switch(tab);
        let list = split.active_list();
        let empty = match tab {
            SearchTab::Images => EmptyState::new("No images found", "🖼️"),
            SearchTab::Videos => EmptyState::new("No videos found", "🎬"),
        };
        self.replace_entities(list, Some(empty));
        Effects::default()
    }

    pub fn refresh(&mut self) -> Effects {
        let mut effects = match (self.view.view(), self.view.query().map(str::to_string)) {
            (ViewKind::Category, _) if self.view.category().is_some() => {
                let slug = self.view.category().unwrap_or_default().to_string();
                self.select_category(&slug)
            }
            (ViewKind::Search, Some(query)) if self.search_mode == Some(SearchMode::All) => self.search_all(&query),
            (ViewKind::Search, Some(query)) => self.search(&query),
            (ViewKind::Downloaded, _) => self.load_downloaded(),
            (ViewKind::Videos, _) => match self.video_source.clone() {
                Some(source) => self.load_videos(source),
                None => Effects::default(),
            },
            _ => {
                let categories = self.sequenced(Channel::Categories, Fetch::Categories);
                let stats = self.stats_job();
                Effects {
                    jobs: vec![categories, stats],
                    notices: Vec::new(),
                }
            }
        };
        effects.push_notice(Severity::Success, "Refreshed");
        effects
    }

    pub fn toggle(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Select-all checkbox
    pub fn set_all_selected(&mut self, selected: bool) {
        if selected {
            let ids = self.view.displayed().selectable_ids();
            self.selection.select_all(&ids);
        } else {
            self.selection.clear_all();
        }
    }

    pub fn download_selected(&mut self) -> Effects {
        if self.batch_in_flight {
            return Effects::notice(Severity::Warning, "A download is already in progress");
        }
        if !self.selection.batch_action_enabled() {
            return Effects::notice(Severity::Warning, "Select some images first");
        }

        let images: Vec<Entity> = self
            .selection
            .ordered()
            .into_iter()
            .filter_map(|id| self.view.displayed().find_image(id))
            .cloned()
            .collect();
        let category = self
            .view
            .category()
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string();

        self.loading = Some(format!("Downloading {} images...", images.len()));
        self.batch_in_flight = true;
        Effects {
            jobs: vec![Job {
                ticket: None,
                fetch: Fetch::BatchDownload { images, category },
            }],
            notices: Vec::new(),
        }
    }

    /// Download from the detail view into `category`
    pub fn download_one(&mut self, id: &str, category: &str) -> Effects {
        let Some(entity) = self.find_image(id).cloned() else {
            return Effects::notice(Severity::Error, "That image is no longer on screen");
        };
        Effects {
            jobs: vec![Job {
                ticket: None,
                fetch: Fetch::DownloadOne {
                    entity,
                    category: category.to_string(),
                },
            }],
            notices: Vec::new(),
        }
    }

    pub fn open_downloads_folder(&mut self) -> Effects {
        Effects {
            jobs: vec![Job {
                ticket: None,
                fetch: Fetch::OpenFolder,
            }],
            notices: Vec::new(),
        }
    }

    pub fn load_history(&mut self) -> Effects {
        let job = self.history_job();
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    pub fn clear_history(&mut self) -> Effects {
        let job = self.sequenced(Channel::History, Fetch::ClearHistory);
        Effects {
            jobs: vec![job],
            notices: Vec::new(),
        }
    }

    pub fn toggle_favorite(&mut self) -> Effects {
        Effects::notice(Severity::Info, "Favorites are coming soon!")
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    /// Apply a finished job; stale results are dropped without effects
    pub fn apply(&mut self, ticket: Option<Ticket>, fetched: Fetched) -> Effects {
        if let Some(ticket) = ticket {
            if !self.sequencer.is_latest(ticket) {
                tracing::debug!("Discarding stale response {:?}", ticket);
                return Effects::default();
            }
            if ticket.channel == Channel::Grid {
                self.loading = None;
            }
        }

        match fetched {
            Fetched::Search { query, images, videos } => self.apply_search(query, images, videos),
            Fetched::SearchAll { query, result } => self.apply_search_all(query, result),
            Fetched::CategoryImages { slug, result } => self.apply_category(slug, result),
            Fetched::Videos(result) => self.apply_videos(result),
            Fetched::Downloaded(result) => self.apply_downloaded(result),
            Fetched::Categories(result) => match result {
                Ok(categories) => {
                    self.categories = categories;
                    Effects::default()
                }
                Err(e) => failure("Could not load categories", &e),
            },
            Fetched::Stats(result) => {
                match result {
                    Ok(stats) => self.stats = Some(stats),
                    Err(e) => tracing::error!("Could not load stats: {}", e),
                }
                Effects::default()
            }
            Fetched::History(result) => {
                match result {
                    Ok(history) => self.history = history,
                    Err(e) => tracing::error!("Could not load search history: {}", e),
                }
                Effects::default()
            }
            Fetched::HistoryCleared(result) => match result {
                Ok(()) => {
                    self.history.clear();
                    Effects::notice(Severity::Success, "Search history cleared")
                }
                Err(e) => failure("Could not clear search history", &e),
            },
            Fetched::BatchDownload(result) => self.apply_batch(result),
            Fetched::DownloadOne { id, result } => match result {
                Ok(_) => {
                    self.marked_downloaded.insert(id);
                    let mut effects = Effects::notice(Severity::Success, "Image downloaded!");
                    effects.jobs.push(self.stats_job());
                    effects
                }
                Err(e) => failure("Download failed", &e),
            },
            Fetched::OpenFolder(result) => match result {
                Ok(folder) if folder.success => Effects::notice(Severity::Success, "Downloads folder opened 📂"),
                Ok(folder) => Effects::notice(Severity::Info, format!("Downloads folder: {}", folder.path)),
                Err(e) => failure("Could not open the downloads folder", &e),
            },
        }
    }

    fn apply_search(
        &mut self,
        query: String,
        images: Result<Vec<Entity>, ApiError>,
        videos: Result<Vec<VideoEntity>, ApiError>,
    ) -> Effects {
        let mut effects = Effects::default();
        let images = images.unwrap_or_else(|e| {
            tracing::error!("Image search for {:?} failed: {}", query, e);
            effects.push_notice(Severity::Warning, format!("Image search failed: {}", e));
            Vec::new()
        });
        let videos = videos.unwrap_or_else(|e| {
            tracing::error!("Video search for {:?} failed: {}", query, e);
            effects.push_notice(Severity::Warning, format!("Video search failed: {}", e));
            Vec::new()
        });

        let split = SearchSplit::new(query.clone(), images, videos);
        let empty = if !split.tabs_visible() {
            EmptyState::new("No results found", EmptyState::default().icon)
        } else if split.active() == SearchTab::Videos {
            EmptyState::new("No videos found", "🎬")
        } else {
            EmptyState::new("No images found", "🖼️")
        };
        self.page = PageTitle::new(
            format!("\"{}\" search", query),
            format!("{} results found", split.total()),
        );
        let list = split.active_list();
        self.split = Some(split);
        self.replace_entities(list, Some(empty));

        effects.jobs.push(self.history_job());
        effects
    }

    fn apply_search_all(&mut self, query: String, result: Result<Vec<Entity>, ApiError>) -> Effects {
        match result {
            Ok(images) => {
                self.page = PageTitle::new(
                    format!("\"{}\" in all sources", query),
                    format!("{} results found", images.len()),
                );
                self.replace_entities(
                    Displayed::Images(images),
                    Some(EmptyState::new("No results found", "🔍")),
                );
                Effects::default()
            }
            Err(e) => {
                self.replace_entities(Displayed::default(), Some(EmptyState::new("Search failed", "❌")));
                failure("Search failed", &e)
            }
        }
    }

    fn apply_category(&mut self, slug: String, result: Result<Vec<Entity>, ApiError>) -> Effects {
        match result {
            Ok(images) => {
                tracing::info!("Loaded {} images for category {}", images.len(), slug);
                self.replace_entities(
                    Displayed::Images(images),
                    Some(EmptyState::new("No images in this category yet", "📭")),
                );
                Effects::default()
            }
            Err(e) => {
                self.replace_entities(Displayed::default(), Some(EmptyState::new("Could not load images", "❌")));
                failure("Could not load images", &e)
            }
        }
    }

    fn apply_videos(&mut self, result: Result<Vec<VideoEntity>, ApiError>) -> Effects {
        match result {
            Ok(videos) => {
                self.replace_entities(
                    Displayed::Videos(videos),
                    Some(EmptyState::new("No videos found", "🎬")),
                );
                Effects::default()
            }
            Err(e) => {
                self.replace_entities(Displayed::default(), Some(EmptyState::new("Could not load videos", "❌")));
                failure("Could not load videos", &e)
            }
        }
    }

    fn apply_downloaded(&mut self, result: Result<Vec<DownloadedFile>, ApiError>) -> Effects {
        match result {
            Ok(files) => {
                let images = files.iter().map(Entity::from_downloaded).collect();
                self.replace_entities(
                    Displayed::Images(images),
                    Some(EmptyState::new("You haven't downloaded anything yet", "📭")),
                );
                Effects::default()
            }
            Err(e) => {
                self.replace_entities(Displayed::default(), Some(EmptyState::new("Could not load images", "❌")));
                failure("Could not load downloaded images", &e)
            }
        }
    }

    /// Partial failure still completes: selection clears and stats refresh.
    /// A transport failure keeps the selection so the user can retry.
    fn apply_batch(&mut self, result: Result<BatchDownloadResult, ApiError>) -> Effects {
        self.loading = None;
        self.batch_in_flight = false;
        match result {
            Ok(batch) => {
                let severity = if batch.failed > 0 {
                    Severity::Warning
                } else {
                    Severity::Success
                };
                let mut message = format!("{} images downloaded, {} skipped", batch.downloaded, batch.skipped);
                if batch.failed > 0 {
                    message.push_str(&format!(", {} failed", batch.failed));
                }
                tracing::info!(
                    "Batch download: {} downloaded, {} skipped, {} failed of {}",
                    batch.downloaded,
                    batch.skipped,
                    batch.failed,
                    batch.total
                );

                self.selection.clear_all();
                let mut effects = Effects::notice(severity, message);
                effects.jobs.push(self.stats_job());
                effects
            }
            Err(e) => failure("Download failed", &e),
        }
    }
}

/// Log a failed call and turn it into an error notice
fn failure(context: &str, err: &ApiError) -> Effects {
    tracing::error!("{}: {}", context, err);
    Effects::notice(Severity::Error, format!("{}: {}", context, err))
}

/// Run jobs to completion one after another and feed results back.
///
/// Used by the CLI; the GUI runs jobs as `iced` tasks instead.
pub async fn drive(session: &mut Session, api: &dyn ArchiveApi, effects: Effects) -> Vec<Notice> {
    let mut notices = effects.notices;
    let mut queue = effects.jobs;
    while !queue.is_empty() {
        let job = queue.remove(0);
        let fetched = crate::jobs::execute(api, job.fetch).await;
        let mut next = session.apply(job.ticket, fetched);
        queue.append(&mut next.jobs);
        notices.append(&mut next.notices);
    }
    notices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{image, video, FakeApi};
    use crate::render::CardDescriptor;

    fn session() -> Session {
        Session::new(&AppConfig::default())
    }

    fn cards(session: &Session) -> Vec<CardDescriptor> {
        match session.rendered() {
            Rendered::Cards(cards) => cards,
            Rendered::Empty(e) => panic!("Expected cards, got {:?}", e),
        }
    }

    fn tank_api() -> FakeApi {
        let mut api = FakeApi::default();
        api.images.insert(
            "tank".to_string(),
            Ok(vec![image("t1"), image("t2"), image("t3")]),
        );
        api.videos
            .insert("tank".to_string(), Ok(vec![video("v1"), video("v2")]));
        api
    }

    #[tokio::test]
    async fn test_search_counts_and_default_tab() {
        let api = tank_api();
        let mut session = session();
        let effects = session.search("tank");
        let notices = drive(&mut session, &api, effects).await;

        assert!(notices.is_empty());
        let split = session.split().unwrap();
        assert_eq!(split.image_count(), 3);
        assert_eq!(split.video_count(), 2);
        assert_eq!(split.active(), SearchTab::Images);
        assert!(split.tabs_visible());
        assert_eq!(cards(&session).len(), 3);
        assert_eq!(session.page().subtitle, "5 results found");
        assert_eq!(session.loading(), None);

        let calls = api.calls();
        assert!(calls.contains(&"search_images tank 600".to_string()));
        assert!(calls.contains(&"search_videos tank 30".to_string()));
    }

    #[tokio::test]
    async fn test_search_without_results() {
        let api = FakeApi::default();
        let mut session = session();
        let effects = session.search("obscure_term_x");
        drive(&mut session, &api, effects).await;

        assert!(!session.split().unwrap().tabs_visible());
        match session.rendered() {
            Rendered::Empty(empty) => assert_eq!(empty.icon, EmptyState::default().icon),
            other => panic!("Expected empty state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_leg_degrades_to_empty() {
        let mut api = tank_api();
        api.images.insert(
            "tank".to_string(),
            Err(ApiError::from_status(500, Some("Arama hatası".to_string()))),
        );
        let mut session = session();
        let effects = session.search("tank");
        let notices = drive(&mut session, &api, effects).await;

        let split = session.split().unwrap();
        assert_eq!(split.image_count(), 0);
        assert_eq!(split.video_count(), 2);
        assert_eq!(split.active(), SearchTab::Videos);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Warning);
        assert!(cards(&session).iter().all(|c| c.is_video()));
    }

    #[tokio::test]
    async fn test_tab_switch_does_not_fetch() {
        let api = tank_api();
        let mut session = session();
        let effects = session.search("tank");
        drive(&mut session, &api, effects).await;
        let calls_before = api.calls().len();

        let effects = session.switch_tab(SearchTab::Videos);
        assert!(effects.jobs.is_empty());
        assert_eq!(cards(&session).len(), 2);
        session.switch_tab(SearchTab::Images);
        assert_eq!(cards(&session).len(), 3);
        assert_eq!(api.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_tab_switch_rescopes_selection() {
        let api = tank_api();
        let mut session = session();
        let effects = session.search("tank");
        drive(&mut session, &api, effects).await;

        session.toggle("t1");
        assert_eq!(session.selection().count, 1);
        session.switch_tab(SearchTab::Videos);
        assert_eq!(session.selection().count, 0);
        assert!(!session.selection().batch_action_enabled);
    }

    #[tokio::test]
    async fn test_stale_search_response_is_discarded() {
        let mut api = tank_api();
        api.images
            .insert("plane".to_string(), Ok(vec![image("p1")]));
        let mut session = session();

        let first = session.search("tank").jobs.remove(0);
        let second = session.search("plane").jobs.remove(0);

        let fetched = crate::jobs::execute(&api, second.fetch).await;
        session.apply(second.ticket, fetched);
        let fetched = crate::jobs::execute(&api, first.fetch).await;
        let effects = session.apply(first.ticket, fetched);

        assert_eq!(effects, Effects::default());
        assert_eq!(session.split().unwrap().query(), "plane");
        assert_eq!(cards(&session)[0].id, "p1");
    }

    #[tokio::test]
    async fn test_category_switch_clears_query_and_selection() {
        let mut api = tank_api();
        api.category_images
            .insert("ucaklar".to_string(), vec![image("a1"), image("a2")]);
        let mut session = session();
        let effects = session.search("tank");
        drive(&mut session, &api, effects).await;
        session.toggle("t2");

        let effects = session.select_category("ucaklar");
        drive(&mut session, &api, effects).await;

        assert_eq!(session.view().query(), None);
        assert_eq!(session.view().category(), Some("ucaklar"));
        assert_eq!(session.view().view(), ViewKind::Category);
        assert_eq!(session.selection().count, 0);
        assert!(api.calls().contains(&"category_images ucaklar 100".to_string()));
    }

    #[tokio::test]
    async fn test_empty_category_message() {
        let mut api = FakeApi::default();
        api.category_images.insert("posterler".to_string(), Vec::new());
        let mut session = session();
        let effects = session.select_category("posterler");
        drive(&mut session, &api, effects).await;

        assert_eq!(
            session.rendered(),
            Rendered::Empty(EmptyState::new("No images in this category yet", "📭"))
        );
    }

    #[tokio::test]
    async fn test_category_failure_notifies() {
        let api = FakeApi::default();
        let mut session = session();
        let effects = session.select_category("missing");
        let notices = drive(&mut session, &api, effects).await;

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
        assert!(notices[0].message.contains("Category not found"));
        assert!(session.view().displayed().is_empty());
    }

    #[tokio::test]
    async fn test_batch_download_clears_selection() {
        let mut api = FakeApi::default();
        api.images.insert(
            "tank".to_string(),
            Ok((1..=5).map(|i| image(&i.to_string())).collect()),
        );
        api.batch = Some(BatchDownloadResult {
            success: true,
            downloaded: 3,
            skipped: 1,
            failed: 0,
            total: 4,
        });
        let mut session = session();
        let effects = session.search("tank");
        drive(&mut session, &api, effects).await;
        for id in ["1", "2", "3", "4"] {
            session.toggle(id);
        }

        let effects = session.download_selected();
        let notices = drive(&mut session, &api, effects).await;

        assert_eq!(session.selection().count, 0);
        assert!(!session.selection().batch_action_enabled);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Success);
        assert_eq!(notices[0].message, "3 images downloaded, 1 skipped");
        let calls = api.calls();
        assert!(calls.contains(&"download_batch 4 diger".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("stats"));
    }

    #[tokio::test]
    async fn test_batch_partial_failure_warns() {
        let mut api = FakeApi::default();
        api.category_images
            .insert("tanklar".to_string(), vec![image("a"), image("b")]);
        api.batch = Some(BatchDownloadResult {
            success: true,
            downloaded: 1,
            skipped: 0,
            failed: 1,
            total: 2,
        });
        let mut session = session();
        let effects = session.select_category("tanklar");
        drive(&mut session, &api, effects).await;
        session.set_all_selected(true);
        assert!(session.selection().all_selected);

        let effects = session.download_selected();
        let notices = drive(&mut session, &api, effects).await;

        assert_eq!(notices[0].severity, Severity::Warning);
        assert_eq!(session.selection().count, 0);
        assert!(api.calls().contains(&"download_batch 2 tanklar".to_string()));
    }

    #[tokio::test]
    async fn test_batch_transport_failure_keeps_selection() {
        let mut api = FakeApi::default();
        api.category_images
            .insert("tanklar".to_string(), vec![image("a"), image("b")]);
        let mut session = session();
        let effects = session.select_category("tanklar");
        drive(&mut session, &api, effects).await;
        session.toggle("a");

        let effects = session.download_selected();
        let notices = drive(&mut session, &api, effects).await;
        assert_eq!(notices[0].severity, Severity::Error);
        assert_eq!(session.selection().count, 1);
    }

    #[tokio::test]
    async fn test_refresh_while_first_search_loads() {
        let mut session = session();
        let first = session.search("tank");
        assert!(matches!(first.jobs[0].fetch, Fetch::Search { .. }));

        let refreshed = session.refresh();
        match &refreshed.jobs[0].fetch {
            Fetch::Search { images, .. } => assert_eq!(images.query, "tank"),
            other => panic!("Expected image + video search, got {:?}", other),
        }

        let rewidth = session.set_min_width(1200);
        match &rewidth.jobs[0].fetch {
            Fetch::Search { images, .. } => assert_eq!(images.min_width, 1200),
            other => panic!("Expected image + video search, got {:?}", other),
        }
    }

    #[test]
    fn test_refresh_repeats_search_all() {
        let mut session = session();
        session.search_all("normandy");
        let refreshed = session.refresh();
        assert!(matches!(refreshed.jobs[0].fetch, Fetch::SearchAll { .. }));
        assert!(session.set_min_width(1920).jobs.is_empty());
    }

    #[tokio::test]
    async fn test_second_batch_waits_for_first() {
        let mut api = FakeApi::default();
        api.category_images
            .insert("tanklar".to_string(), vec![image("a"), image("b")]);
        let mut session = session();
        let effects = session.select_category("tanklar");
        drive(&mut session, &api, effects).await;
        session.toggle("a");

        let first = session.download_selected();
        assert_eq!(first.jobs.len(), 1);
        assert!(session.batch_in_flight());

        let second = session.download_selected();
        assert!(second.jobs.is_empty());
        assert_eq!(second.notices[0].severity, Severity::Warning);

        // Transport failure still releases the guard
        drive(&mut session, &api, first).await;
        assert!(!session.batch_in_flight());
        assert_eq!(session.download_selected().jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_batch_keeps_selection() {
        let mut api = FakeApi::default();
        api.category_images
            .insert("tanklar".to_string(), vec![image("a"), image("b")]);
        api.batch_error = Some(ApiError::Rejected("Disk full".to_string()));
        let mut session = session();
        let effects = session.select_category("tanklar");
        drive(&mut session, &api, effects).await;
        session.toggle("b");

        let effects = session.download_selected();
        let notices = drive(&mut session, &api, effects).await;
        assert_eq!(notices[0].severity, Severity::Error);
        assert!(notices[0].message.contains("Disk full"));
        assert_eq!(session.selection().count, 1);
        assert!(!api.calls().contains(&"stats".to_string()));
    }

    #[test]
    fn test_download_without_selection_warns() {
        let mut session = session();
        let effects = session.download_selected();
        assert!(effects.jobs.is_empty());
        assert_eq!(effects.notices[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_downloaded_view_maps_files() {
        let mut api = FakeApi::default();
        api.downloaded = vec![DownloadedFile {
            filename: "tiger.jpg".to_string(),
            web_url: "/downloads/tanklar/tiger.jpg".to_string(),
            file_size: 1536,
            category: None,
        }];
        let mut session = session();
        session.search("tank");
        let effects = session.load_downloaded();
        drive(&mut session, &api, effects).await;

        assert_eq!(session.view().query(), None);
        let card = cards(&session).remove(0);
        assert_eq!(card.id, "tiger.jpg");
        assert!(card.downloaded);
        assert_eq!(card.meta, vec!["1.5 KB".to_string()]);
    }

    #[tokio::test]
    async fn test_single_download_marks_entity() {
        let mut api = FakeApi::default();
        api.category_images
            .insert("gemiler".to_string(), vec![image("s1")]);
        let mut session = session();
        let effects = session.select_category("gemiler");
        drive(&mut session, &api, effects).await;

        let effects = session.download_one("s1", "gemiler");
        let notices = drive(&mut session, &api, effects).await;
        assert_eq!(notices[0].severity, Severity::Success);
        let entity = session.find_image("s1").unwrap().clone();
        assert!(!entity.downloaded);
        assert!(session.is_downloaded(&entity));
    }

    #[tokio::test]
    async fn test_category_videos() {
        let mut api = FakeApi::default();
        api.category_images.insert("tanklar".to_string(), vec![image("a")]);
        let mut session = session();
        let effects = session.select_category("tanklar");
        drive(&mut session, &api, effects).await;

        let effects = session.load_videos(VideoSource::Category("tanklar".to_string()));
        drive(&mut session, &api, effects).await;

        assert_eq!(session.view().view(), ViewKind::Videos);
        assert_eq!(session.view().category(), None);
        assert!(api.calls().contains(&"category_videos tanklar 20".to_string()));
        assert_eq!(
            session.rendered(),
            Rendered::Empty(EmptyState::new("No videos found", "🎬"))
        );
    }

    #[test]
    fn test_favorites_are_a_stub() {
        let mut session = session();
        let effects = session.load_favorites();
        assert!(effects.jobs.is_empty());
        assert_eq!(session.view().view(), ViewKind::Favorites);
        assert_eq!(
            session.rendered(),
            Rendered::Empty(EmptyState::new("Favorites are coming soon!", "⭐"))
        );
        assert_eq!(session.toggle_favorite().notices[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_min_width_reruns_search() {
        let api = tank_api();
        let mut session = session();
        let effects = session.search("tank");
        drive(&mut session, &api, effects).await;

        let effects = session.set_min_width(1920);
        drive(&mut session, &api, effects).await;
        assert!(api.calls().contains(&"search_images tank 1920".to_string()));
    }

    #[test]
    fn test_min_width_without_query_does_nothing() {
        let mut session = session();
        assert!(session.set_min_width(1200).jobs.is_empty());
        assert_eq!(session.view().min_width(), 1200);
    }

    #[tokio::test]
    async fn test_clear_search_returns_to_welcome() {
        let api = tank_api();
        let mut session = session();
        let effects = session.search("tank");
        drive(&mut session, &api, effects).await;

        let effects = session.clear_search();
        assert!(effects.jobs.is_empty());
        assert_eq!(session.view().query(), None);
        assert_eq!(session.page(), &PageTitle::welcome());
        assert!(matches!(session.rendered(), Rendered::Empty(_)));
    }

    #[test]
    fn test_empty_query_is_ignored() {
        let mut session = session();
        assert_eq!(session.search("   "), Effects::default());
        assert_eq!(session.view().query(), None);
    }

    #[tokio::test]
    async fn test_open_folder_reports_path() {
        let api = FakeApi::default();
        let mut session = session();
        let effects = session.open_downloads_folder();
        let notices = drive(&mut session, &api, effects).await;
        assert_eq!(notices[0].severity, Severity::Info);
        assert!(notices[0].message.contains("/srv/archive/downloads"));
    }

    #[tokio::test]
    async fn test_initial_load() {
        let mut api = FakeApi::default();
        api.categories = vec![Category {
            slug: "tanklar".to_string(),
            name: "Tanks".to_string(),
            ..Default::default()
        }];
        api.stats = Stats {
            success: true,
            total_downloaded: 12,
            total_size_mb: 3.5,
        };
        let mut session = session();
        let effects = session.load_initial();
        drive(&mut session, &api, effects).await;

        assert_eq!(session.categories().len(), 1);
        assert_eq!(session.stats().unwrap().total_downloaded, 12);
    }
}
