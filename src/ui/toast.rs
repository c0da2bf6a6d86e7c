//! Self-dismissing notifications in the bottom-right corner

use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Element, Length};

use super::theme::{self, DarkTheme};
use crate::app::Message;
use crate::session::{Notice, Severity};

/// How long a toast stays on screen
pub const TOAST_SECS: u64 = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✓",
        Severity::Info => "ℹ",
        Severity::Warning => "⚠",
        Severity::Error => "✕",
    }
}

pub fn view<'a>(toasts: &'a [Toast]) -> Element<'a, Message> {
    let items = toasts.iter().fold(Column::new().spacing(8), |col, toast| {
        col.push(
            container(
                row![
                    text(icon(toast.notice.severity))
                        .size(16)
                        .color(theme::severity_color(toast.notice.severity)),
                    text(&toast.notice.message).size(14).width(Length::Fill),
                    button(text("×").size(14).color(DarkTheme::TEXT_MUTED))
                        .style(theme::nav_item(false))
                        .on_press(Message::DismissToast(toast.id)),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            )
            .padding(12)
            .width(360)
            .style(theme::toast(toast.notice.severity)),
        )
    });

    container(column![items])
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
        .align_right(Length::Fill)
        .align_bottom(Length::Fill)
        .into()
}
