//! Client-side state: view, selection, search split and request sequencing

pub mod search;
pub mod selection;
pub mod sequence;
pub mod view;

pub use search::{SearchSplit, SearchTab};
pub use selection::{Selection, SelectionSummary};
pub use sequence::{Channel, Sequencer, Ticket};
pub use view::{Displayed, ViewKind, ViewState, DEFAULT_MIN_WIDTH, MIN_WIDTH_CHOICES};
