//! Sidebar: collections, categories, recent searches and stats

use iced::widget::{button, column, container, row, scrollable, text, Column, Space};
use iced::{Alignment, Element, Length};

use super::theme::{self, DarkTheme};
use crate::app::Message;
use crate::backend::{Category, HistoryEntry, Stats};
use crate::commands::DEFAULT_VIDEO_QUERY;
use crate::jobs::VideoSource;
use crate::state::ViewKind;

pub struct SidebarData<'a> {
    pub view: ViewKind,
    pub active_category: Option<&'a str>,
    pub categories: &'a [Category],
    pub history: &'a [HistoryEntry],
    pub stats: Option<&'a Stats>,
}

fn section_title<'a>(label: &'a str) -> Element<'a, Message> {
    text(label).size(12).color(DarkTheme::TEXT_MUTED).into()
}

fn nav<'a>(label: String, active: bool, message: Message) -> Element<'a, Message> {
    button(text(label).size(14))
        .width(Length::Fill)
        .padding([6, 10])
        .style(theme::nav_item(active))
        .on_press(message)
        .into()
}

pub fn view<'a>(data: SidebarData<'a>) -> Element<'a, Message> {
    let collections = column![
        section_title("COLLECTIONS"),
        nav(
            "📥 Downloaded".to_string(),
            data.view == ViewKind::Downloaded,
            Message::ShowDownloaded
        ),
        nav(
            "⭐ Favorites".to_string(),
            data.view == ViewKind::Favorites,
            Message::ShowFavorites
        ),
        nav(
            "🎬 Videos".to_string(),
            data.view == ViewKind::Videos,
            Message::ShowVideos(VideoSource::Query(DEFAULT_VIDEO_QUERY.to_string()))
        ),
        nav("📂 Open folder".to_string(), false, Message::OpenFolder),
    ]
    .spacing(4);

    let categories = data.categories.iter().fold(
        Column::new().spacing(4).push(section_title("CATEGORIES")),
        |col, c| {
            let active = data.view == ViewKind::Category && data.active_category == Some(c.slug.as_str());
            let label = if c.image_count > 0 {
                format!("{} {} ({})", c.icon_or_default(), c.name, c.image_count)
            } else {
                format!("{} {}", c.icon_or_default(), c.name)
            };
            col.push(nav(label, active, Message::SelectCategory(c.slug.clone())))
        },
    );

    let mut history = Column::new().spacing(4).push(
        row![
            section_title("RECENT SEARCHES"),
            Space::with_width(Length::Fill),
            button(text("Clear").size(11))
                .padding([2, 6])
                .style(theme::nav_item(false))
                .on_press(Message::ClearHistory),
        ]
        .align_y(Alignment::Center),
    );
    if data.history.is_empty() {
        history = history.push(text("No searches yet").size(12).color(DarkTheme::TEXT_PLACEHOLDER));
    }
    for entry in data.history {
        history = history.push(nav(
            format!("🕐 {} ({})", entry.query, entry.results_count),
            false,
            Message::HistoryClicked(entry.query.clone()),
        ));
    }

    let stats = match data.stats {
        Some(stats) => format!(
            "{} images · {:.1} MB",
            stats.total_downloaded, stats.total_size_mb
        ),
        None => "Stats unavailable".to_string(),
    };

    container(
        column![
            text("WW2 Archive").size(20).color(DarkTheme::TEXT),
            scrollable(column![collections, categories, history].spacing(20)).height(Length::Fill),
            text(stats).size(12).color(DarkTheme::TEXT_MUTED),
        ]
        .spacing(16),
    )
    .padding(16)
    .width(260)
    .height(Length::Fill)
    .style(theme::panel)
    .into()
}
