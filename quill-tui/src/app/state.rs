//! UI state
//!
//! Everything the terminal front end tracks on top of the shared store
//! state: where the user is, what is selected, what is being typed. All
//! transitions happen through the reducer (see `reducer.rs`).

use libquill::{PostEditor, Route};

/// Root UI state
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,

    /// Current view
    pub route: Route,

    /// Previously visited views, most recent last
    pub history: Vec<Route>,

    /// Cursor in the main list of the current view
    pub selected: usize,

    /// Topic view: the side topic list has focus
    pub side_focus: bool,

    /// Cursor in the side topic list
    pub side_selected: usize,

    pub help_visible: bool,

    /// Error overlay
    pub error: Option<String>,

    pub editor: PostEditor,

    pub composer: ComposerState,

    pub login: LoginForm,

    pub config: UiConfig,
}

/// Which part of the composer receives typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerField {
    Title,
    Description,
    Paragraph(usize),
    ImageUrl,
    TopicSearch,
}

/// Composer bookkeeping the editor itself does not need
#[derive(Debug, Clone)]
pub struct ComposerState {
    pub field: ComposerField,

    /// Item being typed for a list paragraph
    pub pending_item: String,

    /// Cursor in the matching topic list (details step)
    pub topic_cursor: usize,

    /// Publish request in flight
    pub publishing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    /// Create an account instead of logging in
    pub register: bool,
    pub submitting: bool,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            route: Route::Home,
            history: Vec::new(),
            selected: 0,
            side_focus: false,
            side_selected: 0,
            help_visible: false,
            error: None,
            editor: PostEditor::new(),
            composer: ComposerState::default(),
            login: LoginForm::default(),
            config: UiConfig::default(),
        }
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self {
            field: ComposerField::Title,
            pending_item: String::new(),
            topic_cursor: 0,
            publishing: false,
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: LoginField::Username,
            register: false,
            submitting: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled =
            std::env::var("NO_COLOR").is_err() && std::env::var("QUILL_TUI_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("QUILL_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(250);

        Self {
            colors_enabled,
            tick_rate_ms,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `route` instead of the home view
    pub fn at(route: Route) -> Self {
        Self {
            route,
            ..Self::default()
        }
    }

    /// Blocks quitting while a write is in flight
    pub fn is_busy(&self) -> bool {
        self.composer.publishing || self.login.submitting
    }
}
