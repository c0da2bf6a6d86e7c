//! Image detail modal and the help overlay

use std::fmt;

use iced::widget::{button, center, column, container, image, mouse_area, opaque, pick_list, row, text, Space};
use iced::{ContentFit, Element, Length};

use super::grid::Thumbnail;
use super::theme::{self, DarkTheme};
use crate::app::Message;
use crate::backend::{Category, Entity, FALLBACK_CATEGORY};
use crate::format::{classify_license, format_file_size, format_resolution_long};

const DEFAULT_SOURCE: &str = "Wikimedia Commons";

/// Category choice shown in the download picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChoice {
    pub slug: String,
    pub name: String,
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl CategoryChoice {
    /// The fallback category first, then the backend's in order
    pub fn all(categories: &[Category]) -> Vec<Self> {
        let fallback = Self {
            slug: FALLBACK_CATEGORY.to_string(),
            name: "📁 Other".to_string(),
        };
        std::iter::once(fallback)
            .chain(
                categories
                    .iter()
                    .filter(|c| c.slug != FALLBACK_CATEGORY)
                    .map(|c| Self {
                        slug: c.slug.clone(),
                        name: format!("{} {}", c.icon_or_default(), c.name),
                    }),
            )
            .collect()
    }
}

/// Dimmed backdrop that closes on click, with `content` centered on top
pub fn modal<'a>(base: Element<'a, Message>, content: Element<'a, Message>) -> Element<'a, Message> {
    iced::widget::stack![
        base,
        opaque(
            mouse_area(center(opaque(content)).style(theme::backdrop)).on_press(Message::CloseOverlay)
        )
    ]
    .into()
}

fn field<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    row![
        text(label).size(13).color(DarkTheme::TEXT_MUTED).width(110),
        text(value).size(13).color(DarkTheme::TEXT),
    ]
    .spacing(8)
    .into()
}

pub fn view<'a>(
    entity: &'a Entity,
    thumb: Option<&'a Thumbnail>,
    choices: Vec<CategoryChoice>,
    chosen: Option<CategoryChoice>,
    downloaded: bool,
) -> Element<'a, Message> {
    let title = if entity.title.trim().is_empty() {
        "Untitled"
    } else {
        entity.title.as_str()
    };
    let description = entity
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description");

    let preview: Element<'a, Message> = match thumb {
        Some(Thumbnail::Ready(handle)) => image(handle.clone())
            .width(Length::Fill)
            .height(320)
            .content_fit(ContentFit::Contain)
            .into(),
        _ => Space::with_height(0).into(),
    };

    let size = match format_file_size(entity.file_size.unwrap_or(0)) {
        s if s.is_empty() => "Unknown".to_string(),
        s => s,
    };
    let source = entity
        .source
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let license = classify_license(entity.license.as_deref());
    let license_text = match entity.license.as_deref() {
        Some(l) if !l.is_empty() => format!("{} ({})", license.label(), l),
        _ => license.label().to_string(),
    };

    let download_label = if downloaded { "✓ Downloaded" } else { "⬇ Download" };
    let download = button(text(download_label).size(14))
        .padding([8, 16])
        .style(theme::primary_button)
        .on_press_maybe((!downloaded && chosen.is_some()).then_some(Message::DownloadOne));

    let actions = row![
        pick_list(choices, chosen, Message::DetailCategory)
            .placeholder("Category")
            .width(220),
        download,
        button(text("♡").size(14))
            .padding([8, 12])
            .style(theme::nav_item(false))
            .on_press(Message::ToggleFavorite),
        Space::with_width(Length::Fill),
        button(text("Close").size(14))
            .padding([8, 12])
            .style(theme::nav_item(false))
            .on_press(Message::CloseOverlay),
    ]
    .spacing(8);

    container(
        column![
            preview,
            text(title).size(20).color(DarkTheme::TEXT),
            text(description).size(13).color(DarkTheme::TEXT_MUTED),
            field("Size", size),
            field(
                "Resolution",
                format_resolution_long(entity.width, entity.height)
            ),
            field("Source", source),
            field("License", license_text),
            actions,
        ]
        .spacing(10),
    )
    .padding(20)
    .width(720)
    .style(theme::panel)
    .into()
}

pub fn help<'a>(help_text: &'a str) -> Element<'a, Message> {
    container(
        column![
            text(help_text).size(14).color(DarkTheme::TEXT),
            button(text("Close").size(14))
                .style(theme::nav_item(false))
                .on_press(Message::CloseOverlay),
        ]
        .spacing(16),
    )
    .padding(20)
    .style(theme::panel)
    .into()
}
