//! Anchor Back - synthetic back navigation for in-page anchor links
//!
//! Core modules:
//! - `nav`: Navigation log and tracker (pure, testable natively)
//! - `settings`: Page-level configuration
//! - `web`: Browser adapter (wasm32 only)

pub mod nav;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use nav::{Hash, HashNavigationTracker, NavigationLog, Observation};
pub use settings::{LocationUpdate, ScrollMode, Settings};
