//! Widgets for the archive window

pub mod detail;
pub mod grid;
pub mod search_bar;
pub mod sidebar;
pub mod theme;
pub mod toast;
