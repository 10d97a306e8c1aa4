//! Application module
//!
//! Contains the core UI architecture:
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State
//! - Keymap: key press -> action
//! - Effects: which backend calls a transition asks for
//!
//! Shared data (session, topics, posts, notifications) lives in the
//! `libquill` store; this module only holds what the terminal UI adds.

pub mod actions;
pub mod driver;
pub mod effects;
pub mod event;
pub mod keymap;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::Action;
pub use driver::handle;
pub use effects::{enter, follow_store, navigate, plan, Effect};
pub use keymap::map_key;
pub use reducer::reduce;
pub use state::{AppState, ComposerField, ComposerState, LoginField, LoginForm, UiConfig};
