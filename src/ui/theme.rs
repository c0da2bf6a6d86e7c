//! Theme colors and shared widget styles

use iced::widget::{button, container};
use iced::{Background, Border, Color, Theme};

use crate::session::Severity;

/// Dark theme colors
pub struct DarkTheme;

impl DarkTheme {
    pub const BACKGROUND: Color = Color::from_rgb(0.09, 0.09, 0.11);
    pub const SURFACE: Color = Color::from_rgb(0.12, 0.12, 0.14);
    pub const SURFACE_HIGHLIGHT: Color = Color::from_rgb(0.18, 0.18, 0.22);
    pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.28);
    pub const PRIMARY: Color = Color::from_rgb(0.4, 0.55, 1.0);
    pub const TEXT: Color = Color::from_rgb(0.95, 0.95, 0.95);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.55, 0.55, 0.6);
    pub const TEXT_PLACEHOLDER: Color = Color::from_rgb(0.4, 0.4, 0.45);
    pub const SELECTION: Color = Color::from_rgb(0.2, 0.25, 0.35);
    pub const SUCCESS: Color = Color::from_rgb(0.2, 0.65, 0.4);
    pub const WARNING: Color = Color::from_rgb(0.85, 0.6, 0.15);
    pub const ERROR: Color = Color::from_rgb(0.85, 0.3, 0.3);
    pub const BACKDROP: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.6);
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => DarkTheme::SUCCESS,
        Severity::Info => DarkTheme::PRIMARY,
        Severity::Warning => DarkTheme::WARNING,
        Severity::Error => DarkTheme::ERROR,
    }
}

pub fn window(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(DarkTheme::BACKGROUND)),
        ..Default::default()
    }
}

pub fn panel(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(DarkTheme::SURFACE)),
        border: Border {
            color: DarkTheme::BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    }
}

pub fn backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(DarkTheme::BACKDROP)),
        ..Default::default()
    }
}

/// Card frame; selected cards get the accent border
pub fn card(selected: bool) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(Background::Color(if selected {
            DarkTheme::SELECTION
        } else {
            DarkTheme::SURFACE
        })),
        border: Border {
            color: if selected { DarkTheme::PRIMARY } else { DarkTheme::BORDER },
            width: if selected { 2.0 } else { 1.0 },
            radius: 10.0.into(),
        },
        ..Default::default()
    }
}

pub fn toast(severity: Severity) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(Background::Color(DarkTheme::SURFACE_HIGHLIGHT)),
        text_color: Some(DarkTheme::TEXT),
        border: Border {
            color: severity_color(severity),
            width: 2.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

/// Flat sidebar/list entry, highlighted when active
pub fn nav_item(active: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let background = match (active, status) {
            (true, _) => DarkTheme::SELECTION,
            (false, button::Status::Hovered) => DarkTheme::SURFACE_HIGHLIGHT,
            _ => Color::TRANSPARENT,
        };
        button::Style {
            background: Some(Background::Color(background)),
            text_color: if active { DarkTheme::TEXT } else { DarkTheme::TEXT_MUTED },
            border: Border::default().rounded(8),
            ..Default::default()
        }
    }
}

pub fn primary_button(_theme: &Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Disabled => DarkTheme::SURFACE_HIGHLIGHT,
        button::Status::Hovered => Color::from_rgb(0.5, 0.65, 1.0),
        _ => DarkTheme::PRIMARY,
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: if status == button::Status::Disabled {
            DarkTheme::TEXT_MUTED
        } else {
            DarkTheme::TEXT
        },
        border: Border::default().rounded(8),
        ..Default::default()
    }
}
