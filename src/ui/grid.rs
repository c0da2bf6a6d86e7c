//! Card grid built from rendered descriptors

use std::collections::HashMap;

use iced::widget::{button, checkbox, column, container, image, mouse_area, row, scrollable, text, Space};
use iced::{Alignment, ContentFit, Element, Length};

use super::theme::{self, DarkTheme};
use crate::app::Message;
use crate::render::{CardAction, CardDescriptor, EmptyState, Rendered};

const COLUMNS: usize = 4;
const THUMB_HEIGHT: f32 = 160.0;

/// Thumbnail lifecycle per URL
#[derive(Debug, Clone)]
pub enum Thumbnail {
    Loading,
    Ready(image::Handle),
    Failed,
}

pub fn view<'a>(
    rendered: Rendered,
    thumbnails: &'a HashMap<String, Thumbnail>,
    marked: impl Fn(&str) -> bool,
) -> Element<'a, Message> {
    let cards = match rendered {
        Rendered::Cards(cards) => cards,
        Rendered::Empty(empty) => return empty_state(empty),
    };

    let rows: Vec<Element<'a, Message>> = cards
        .chunks(COLUMNS)
        .map(|chunk| {
            let mut items: Vec<Element<'a, Message>> = chunk
                .iter()
                .map(|c| {
                    let downloaded = c.downloaded || marked(&c.id);
                    card(c.clone(), thumbnails.get(&c.thumbnail), downloaded)
                })
                .collect();
            while items.len() < COLUMNS {
                items.push(Space::with_width(Length::FillPortion(1)).into());
            }
            row(items).spacing(12).into()
        })
        .collect();

    scrollable(column(rows).spacing(12).padding([0, 8]))
        .height(Length::Fill)
        .into()
}

fn empty_state<'a>(empty: EmptyState) -> Element<'a, Message> {
    container(
        column![
            text(empty.icon).size(48),
            text(empty.message).size(16).color(DarkTheme::TEXT_MUTED),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn thumbnail<'a>(state: Option<&'a Thumbnail>) -> Element<'a, Message> {
    match state {
        Some(Thumbnail::Ready(handle)) => image(handle.clone())
            .width(Length::Fill)
            .height(THUMB_HEIGHT)
            .content_fit(ContentFit::Cover)
            .into(),
        other => {
            let label = match other {
                Some(Thumbnail::Failed) => "⚠",
                _ => "…",
            };
            container(text(label).size(24).color(DarkTheme::TEXT_MUTED))
                .width(Length::Fill)
                .height(THUMB_HEIGHT)
                .center_x(Length::Fill)
                .center_y(THUMB_HEIGHT)
                .into()
        }
    }
}

fn card<'a>(card: CardDescriptor, thumb: Option<&'a Thumbnail>, downloaded: bool) -> Element<'a, Message> {
    let selected = card.selected();
    let mut header = row![].spacing(8).align_y(Alignment::Center);

    let body: Element<'a, Message> = match card.action {
        CardAction::Select { selected } => {
            let id = card.id.clone();
            header = header.push(checkbox("", selected).on_toggle(move |_| Message::ToggleSelect(id.clone())));
            mouse_area(thumbnail(thumb))
                .on_press(Message::OpenDetail(card.id.clone()))
                .into()
        }
        CardAction::Video {
            download_url,
            watch_url,
        } => column![
            thumbnail(thumb),
            row![
                button(text("⬇ Download").size(12))
                    .style(theme::primary_button)
                    .on_press(Message::OpenLink(download_url)),
                button(text("▶ Watch").size(12))
                    .style(theme::nav_item(false))
                    .on_press(Message::OpenLink(watch_url)),
            ]
            .spacing(8),
        ]
        .spacing(8)
        .into(),
    };

    header = header.push(text(card.title).size(14).color(DarkTheme::TEXT).width(Length::Fill));
    if downloaded {
        header = header.push(text("✓").size(14).color(DarkTheme::SUCCESS));
    }

    let meta = text(card.meta.join(" · ")).size(12).color(DarkTheme::TEXT_MUTED);

    container(column![body, header, meta].spacing(6))
        .padding(8)
        .width(Length::FillPortion(1))
        .style(theme::card(selected))
        .into()
}
