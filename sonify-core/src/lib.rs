//! Page-side state for the Sonify dashboard.
//!
//! Everything here runs without a browser: the DOM, local storage and Plotly
//! are reached through the [`PageHost`], [`PreferenceStore`] and
//! [`ChartBackend`] traits, which `sonify-shell` implements for wasm32.

pub mod charts;
pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod export;
pub mod format;
pub mod keys;
pub mod menu;
pub mod notify;
pub mod page;
pub mod theme;

#[cfg(test)]
pub(crate) mod fakes;

pub use charts::{ChartBackend, ChartHandle, ChartRegistry, ChartSource, ChartSpec, PlotConfig};
pub use config::PageConfig;
pub use effects::{HoverChange, HoverEffect};
pub use error::{PageError, Result};
pub use events::{Binding, EventKind, SubscriptionId, Target};
pub use export::{ExportBundle, ExportFile, ExportOutcome};
pub use format::{format_duration, format_number};
pub use keys::KeyChord;
pub use menu::{ClickHit, QuickAction, QUICK_ACTIONS};
pub use notify::{Severity, Toast, ToastTimeline};
pub use page::{Dispatch, PageController, PageEvent, PageExit, PageHost, PageTimer};
pub use theme::{MemoryStore, PreferenceStore, ThemePreference};
