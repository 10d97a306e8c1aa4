//! quill-tui library
//!
//! Exports the UI state machine, rendering and the service bridge so they
//! can be tested without a terminal.

pub mod app;
pub mod error;
pub mod services;
pub mod terminal;
pub mod ui;

// Re-export commonly used types
pub use app::{map_key, reduce, Action, AppState};
pub use error::{Result, TuiError};
