//! Core application state and Iced Application implementation
//!
//! The `Session` decides what happens; this module turns its jobs into
//! `Task`s, its notices into toasts, and its state into widgets.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use iced::keyboard::{self, Key};
use iced::widget::{button, checkbox, column, container, image, pick_list, row, stack, text, Space};
use iced::{event, Alignment, Element, Event, Length, Padding, Subscription, Task, Theme};

use crate::backend::{BackendClient, FALLBACK_CATEGORY};
use crate::commands::{Command, DEFAULT_VIDEO_QUERY};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::jobs::{execute, Fetched, Job, VideoSource};
use crate::native::open;
use crate::render::Rendered;
use crate::session::{Effects, Notice, Session, Severity};
use crate::state::{SearchTab, Ticket, ViewKind, MIN_WIDTH_CHOICES};
use crate::ui::detail::{self, CategoryChoice};
use crate::ui::grid::{self, Thumbnail};
use crate::ui::theme::{self, DarkTheme};
use crate::ui::toast::{self, Toast, TOAST_SECS};
use crate::ui::{search_bar, sidebar};

/// Minimum width filter entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinWidth(pub u32);

impl fmt::Display for MinWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "≥ {} px", self.0)
    }
}

#[derive(Debug, Clone)]
enum Overlay {
    Detail { id: String, category: Option<CategoryChoice> },
    Help,
}

// ============================================================================
// Application State
// ============================================================================

pub struct ArchiveApp {
    session: Session,
    api: Arc<BackendClient>,
    prompt: String,
    thumbnails: HashMap<String, Thumbnail>,
    overlay: Option<Overlay>,
    toasts: Vec<Toast>,
    next_toast: u64,
    /// Toasts whose dismissal timer has not been started
    unscheduled: Vec<u64>,
}

#[derive(Debug, Clone)]
pub enum Message {
    PromptChanged(String),
    PromptSubmit,
    ClearSearch,
    SwitchTab(SearchTab),
    MinWidthSelected(MinWidth),
    Refresh,
    SelectCategory(String),
    ShowDownloaded,
    ShowFavorites,
    ShowVideos(VideoSource),
    HistoryClicked(String),
    ClearHistory,
    ToggleSelect(String),
    SelectAll(bool),
    DownloadSelected,
    OpenDetail(String),
    DetailCategory(CategoryChoice),
    DownloadOne,
    ToggleFavorite,
    OpenFolder,
    OpenLink(String),
    CloseOverlay,
    Loaded(Option<Ticket>, Fetched),
    ThumbnailLoaded(String, Result<image::Handle, ApiError>),
    DismissToast(u64),
    SelectAllShortcut,
}

impl ArchiveApp {
    pub fn new(config: AppConfig) -> (Self, Task<Message>) {
        tracing::info!("Using archive backend at {}", config.api_base);
        let mut app = Self {
            session: Session::new(&config),
            api: Arc::new(BackendClient::new(&config.api_base)),
            prompt: String::new(),
            thumbnails: HashMap::new(),
            overlay: None,
            toasts: Vec::new(),
            next_toast: 0,
            unscheduled: Vec::new(),
        };
        let effects = app.session.load_initial();
        let task = app.run(effects);
        (app, task)
    }

    pub fn title(&self) -> String {
        let page = self.session.page();
        format!("WW2 Archive - {}", page.title)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        Task::batch([task, self.fetch_thumbnails()])
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        let effects = match message {
            Message::PromptChanged(prompt) => {
                self.prompt = prompt;
                Effects::default()
            }
            Message::PromptSubmit => self.submit(),
            Message::ClearSearch => {
                self.prompt.clear();
                self.session.clear_search()
            }
            Message::SwitchTab(tab) => self.session.switch_tab(tab),
            Message::MinWidthSelected(MinWidth(width)) => self.session.set_min_width(width),
            Message::Refresh => self.session.refresh(),
            Message::SelectCategory(slug) => {
                self.prompt.clear();
                self.session.select_category(&slug)
            }
            Message::ShowDownloaded => {
                self.prompt.clear();
                self.session.load_downloaded()
            }
            Message::ShowFavorites => self.session.load_favorites(),
            Message::ShowVideos(source) => self.session.load_videos(source),
            Message::HistoryClicked(query) => {
                self.prompt = query.clone();
                self.session.search(&query)
            }
            Message::ClearHistory => self.session.clear_history(),
            Message::ToggleSelect(id) => {
                self.session.toggle(&id);
                Effects::default()
            }
            Message::SelectAll(selected) => {
                self.session.set_all_selected(selected);
                Effects::default()
            }
            Message::SelectAllShortcut => {
                self.session.set_all_selected(true);
                Effects::default()
            }
            Message::DownloadSelected => self.session.download_selected(),
            Message::OpenDetail(id) => {
                let category = self.default_choice();
                self.overlay = Some(Overlay::Detail { id, category });
                Effects::default()
            }
            Message::DetailCategory(choice) => {
                if let Some(Overlay::Detail { category, .. }) = self.overlay.as_mut() {
                    *category = Some(choice);
                }
                Effects::default()
            }
            Message::DownloadOne => match self.overlay.clone() {
                Some(Overlay::Detail {
                    id,
                    category: Some(choice),
                }) => self.session.download_one(&id, &choice.slug),
                _ => Effects::default(),
            },
            Message::ToggleFavorite => self.session.toggle_favorite(),
            Message::OpenFolder => self.session.open_downloads_folder(),
            Message::OpenLink(url) => {
                if let Err(e) = open::open_url(&url) {
                    tracing::error!("{}", e);
                    self.push_toast(Notice::new(Severity::Error, "Could not open the link"));
                }
                Effects::default()
            }
            Message::CloseOverlay => {
                self.overlay = None;
                Effects::default()
            }
            Message::Loaded(ticket, fetched) => self.session.apply(ticket, fetched),
            Message::ThumbnailLoaded(url, result) => {
                let state = match result {
                    Ok(handle) => Thumbnail::Ready(handle),
                    Err(e) => {
                        tracing::debug!("Thumbnail {} failed: {}", url, e);
                        Thumbnail::Failed
                    }
                };
                // Pruned while loading: the card is gone
                if let Some(slot) = self.thumbnails.get_mut(&url) {
                    *slot = state;
                }
                Effects::default()
            }
            Message::DismissToast(id) => {
                self.toasts.retain(|t| t.id != id);
                Effects::default()
            }
        };
        self.run(effects)
    }

    /// Search box submit: slash commands or a plain search
    fn submit(&mut self) -> Effects {
        match Command::parse(&self.prompt) {
            Command::Search { query } if query.is_empty() => self.session.clear_search(),
            Command::Search { query } => self.session.search(&query),
            Command::SearchAll { query } => self.session.search_all(&query),
            Command::Videos { query } => {
                let query = query.unwrap_or_else(|| DEFAULT_VIDEO_QUERY.to_string());
                self.session.load_videos(VideoSource::Query(query))
            }
            Command::Category { slug } => {
                self.prompt.clear();
                self.session.select_category(&slug)
            }
            Command::Downloaded => {
                self.prompt.clear();
                self.session.load_downloaded()
            }
            Command::Favorites => {
                self.prompt.clear();
                self.session.load_favorites()
            }
            Command::History => {
                self.prompt.clear();
                self.session.load_history()
            }
            Command::Refresh => {
                self.prompt.clear();
                self.session.refresh()
            }
            Command::Help => {
                self.prompt.clear();
                self.overlay = Some(Overlay::Help);
                Effects::default()
            }
            Command::Invalid { message } => Effects {
                jobs: Vec::new(),
                notices: vec![Notice::new(Severity::Warning, message)],
            },
        }
    }

    /// Active category, else the fallback one
    fn default_choice(&self) -> Option<CategoryChoice> {
        let choices = CategoryChoice::all(self.session.categories());
        let wanted = self.session.view().category().unwrap_or(FALLBACK_CATEGORY);
        choices
            .iter()
            .find(|c| c.slug == wanted)
            .or_else(|| choices.iter().find(|c| c.slug == FALLBACK_CATEGORY))
            .cloned()
    }

    // ========================================================================
    // Effects
    // ========================================================================

    fn run(&mut self, effects: Effects) -> Task<Message> {
        for notice in effects.notices {
            self.push_toast(notice);
        }
        let mut tasks: Vec<Task<Message>> = effects.jobs.into_iter().map(|job| self.spawn(job)).collect();
        tasks.extend(self.toast_timers());
        Task::batch(tasks)
    }

    fn spawn(&self, job: Job) -> Task<Message> {
        let api = self.api.clone();
        let Job { ticket, fetch } = job;
        Task::perform(
            async move { execute(api.as_ref(), fetch).await },
            move |fetched| Message::Loaded(ticket, fetched),
        )
    }

    fn push_toast(&mut self, notice: Notice) {
        let id = self.next_toast;
        self.next_toast += 1;
        self.toasts.push(Toast { id, notice });
        self.unscheduled.push(id);
    }

    /// One timer per toast that has not been scheduled yet
    fn toast_timers(&mut self) -> Vec<Task<Message>> {
        self.unscheduled
            .drain(..)
            .map(|id| {
                Task::perform(
                    async move { tokio::time::sleep(Duration::from_secs(TOAST_SECS)).await },
                    move |_| Message::DismissToast(id),
                )
            })
            .collect()
    }

    /// Start loading thumbnails for cards that have none yet.
    ///
    /// The cache only holds the cards on screen; everything else is dropped.
    fn fetch_thumbnails(&mut self) -> Task<Message> {
        let urls: Vec<String> = match self.session.rendered() {
            Rendered::Cards(cards) => cards
                .into_iter()
                .map(|card| card.thumbnail)
                .filter(|url| !url.is_empty())
                .collect(),
            Rendered::Empty(_) => Vec::new(),
        };
        {
            let current: HashSet<&str> = urls.iter().map(String::as_str).collect();
            self.thumbnails.retain(|url, _| current.contains(url.as_str()));
        }

        let mut tasks = Vec::new();
        for url in urls {
            if self.thumbnails.contains_key(&url) {
                continue;
            }
            self.thumbnails.insert(url.clone(), Thumbnail::Loading);
            let api = self.api.clone();
            tasks.push(Task::perform(
                async move {
                    let result = api.fetch_bytes(&url).await.map(image::Handle::from_bytes);
                    (url, result)
                },
                |(url, result)| Message::ThumbnailLoaded(url, result),
            ));
        }
        Task::batch(tasks)
    }

    // ========================================================================
    // View
    // ========================================================================

    pub fn view(&self) -> Element<'_, Message> {
        let view = self.session.view();

        let sidebar = sidebar::view(sidebar::SidebarData {
            view: view.view(),
            active_category: view.category(),
            categories: self.session.categories(),
            history: self.session.history(),
            stats: self.session.stats(),
        });

        let min_width = view.min_width();
        let choices: Vec<MinWidth> = MIN_WIDTH_CHOICES.iter().copied().map(MinWidth).collect();
        let search = container(
            row![
                search_bar::view(&self.prompt, Message::PromptChanged, Message::PromptSubmit),
                button(text("✕").size(14))
                    .style(theme::nav_item(false))
                    .on_press(Message::ClearSearch),
                pick_list(choices, Some(MinWidth(min_width)), Message::MinWidthSelected).width(120),
                button(text("⟳").size(16))
                    .style(theme::nav_item(false))
                    .on_press(Message::Refresh),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        )
        .padding(Padding::from([4.0, 12.0]))
        .width(Length::Fill)
        .style(theme::panel);

        let page = self.session.page();
        let mut header = column![
            text(&page.title).size(24).color(DarkTheme::TEXT),
            text(&page.subtitle).size(13).color(DarkTheme::TEXT_MUTED),
        ]
        .spacing(4);
        if let (ViewKind::Category, Some(slug)) = (view.view(), view.category()) {
            header = header.push(
                button(text("🎬 Videos for this category").size(13))
                    .padding([6, 12])
                    .style(theme::nav_item(false))
                    .on_press(Message::ShowVideos(VideoSource::Category(slug.to_string()))),
            );
        }
        if let Some(split) = self.session.split().filter(|s| s.tabs_visible()) {
            let tab = |label: String, target: SearchTab| {
                button(text(label).size(14))
                    .padding([6, 14])
                    .style(theme::nav_item(split.active() == target))
                    .on_press(Message::SwitchTab(target))
            };
            header = header.push(
                row![
                    tab(format!("🖼️ Images ({})", split.image_count()), SearchTab::Images),
                    tab(format!("🎬 Videos ({})", split.video_count()), SearchTab::Videos),
                ]
                .spacing(8),
            );
        }

        let content = column![search, header, self.toolbar(), self.grid()]
            .spacing(16)
            .padding(16)
            .width(Length::Fill);

        let base: Element<'_, Message> = container(row![sidebar, content])
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::window)
            .into();

        let with_overlay = match &self.overlay {
            Some(Overlay::Detail { id, category }) => match self.session.find_image(id) {
                Some(entity) => detail::modal(
                    base,
                    detail::view(
                        entity,
                        entity
                            .thumbnail_url
                            .as_ref()
                            .filter(|t| !t.is_empty())
                            .or(Some(&entity.source_url))
                            .and_then(|url| self.thumbnails.get(url)),
                        CategoryChoice::all(self.session.categories()),
                        category.clone(),
                        self.session.is_downloaded(entity),
                    ),
                ),
                None => base,
            },
            Some(Overlay::Help) => detail::modal(base, detail::help(Command::help_text())),
            None => base,
        };

        stack![with_overlay, toast::view(&self.toasts)].into()
    }

    fn toolbar(&self) -> Element<'_, Message> {
        let summary = self.session.selection();
        let selectable = !self.session.view().displayed().selectable_ids().is_empty();

        let mut bar = row![].spacing(12).align_y(Alignment::Center);
        if selectable {
            bar = bar
                .push(checkbox("Select all", summary.all_selected).on_toggle(Message::SelectAll))
                .push(text(format!("{} selected", summary.count)).size(13).color(DarkTheme::TEXT_MUTED))
                .push(
                    button(text("⬇ Download selected").size(13))
                        .padding([6, 12])
                        .style(theme::primary_button)
                        .on_press_maybe(
                            (summary.batch_action_enabled && !self.session.batch_in_flight())
                                .then_some(Message::DownloadSelected),
                        ),
                );
        }
        bar = bar.push(Space::with_width(Length::Fill));
        if let Some(loading) = self.session.loading() {
            bar = bar.push(text(loading).size(13).color(DarkTheme::PRIMARY));
        }
        bar.into()
    }

    fn grid(&self) -> Element<'_, Message> {
        grid::view(self.session.rendered(), &self.thumbnails, |id| self.session.is_marked(id))
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| {
            if status == event::Status::Captured {
                return None;
            }
            match event {
                Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => match key.as_ref() {
                    Key::Named(keyboard::key::Named::Escape) => Some(Message::CloseOverlay),
                    Key::Character("a") if modifiers.command() => Some(Message::SelectAllShortcut),
                    _ => None,
                },
                _ => None,
            }
        })
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}
