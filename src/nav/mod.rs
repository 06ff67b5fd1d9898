//! Anchor navigation tracking
//!
//! Pure state, no DOM access:
//! - `hash`: fragment values and URL parsing
//! - `history`: append/truncate history with a cursor
//! - `tracker`: lifecycle, visibility signal, programmatic-update filter

pub mod hash;
pub mod history;
pub mod tracker;

pub use hash::{Hash, extract_hash};
pub use history::{MIN_CAPACITY, NavigationLog};
pub use tracker::{HashNavigationTracker, Observation, VisibilityListener};
