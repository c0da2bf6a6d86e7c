//! Search bar widget

use iced::widget::text_input;
use iced::{Background, Border, Color, Element, Padding};

use super::theme::DarkTheme;

/// Search bar component
pub fn view<'a, Message: Clone + 'a>(
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Message,
) -> Element<'a, Message> {
    text_input("Search WW2 images and videos, or type /help", value)
        .on_input(on_input)
        .on_submit(on_submit)
        .padding(Padding::new(12.0))
        .size(16)
        .style(|_theme, _status| text_input::Style {
            background: Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            icon: DarkTheme::TEXT_MUTED,
            placeholder: DarkTheme::TEXT_PLACEHOLDER,
            value: DarkTheme::TEXT,
            selection: DarkTheme::PRIMARY,
        })
        .into()
}
