//! Actions for the UI reducer
//!
//! Key presses are translated into these by the keymap (see `keymap.rs`);
//! background tasks send them back over a channel when they finish. Store
//! actions travel wrapped in [`Action::Store`] and are applied to the shared
//! store instead of the UI state.

use chrono::{DateTime, Utc};
use libquill::{ParagraphKind, Route, Topic};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // === Timing ===
    /// Periodic tick carrying the current time
    Tick(DateTime<Utc>),

    /// Terminal resize
    Resize(u16, u16),

    // === Navigation ===
    /// Go to a view (already checked against the access rules)
    Navigate(Route),

    /// Return to the previous view
    Back,

    /// Fetch the current view's data again
    Refresh,

    Quit,

    ToggleHelp,

    HideHelp,

    // === Lists ===
    /// Move the cursor down in a list of `len` entries
    SelectNext { len: usize },

    SelectPrevious,

    /// Topic view: switch between the post list and the side topic list
    ToggleSidePane,

    /// Page in older posts (all-posts view)
    LoadMore,

    // === Post actions ===
    Like(u64),

    Delete(u64),

    Logout,

    // === Text input ===
    /// A typed character for the focused field
    Input(char),

    Backspace,

    /// Enter inside a multi-line field
    Newline,

    /// Move focus to the next form field
    NextField,

    PreviousField,

    // === Login ===
    /// Switch the form between logging in and creating an account
    ToggleRegister,

    SubmitLogin,

    LoginFinished { success: bool },

    // === Composer ===
    AddParagraph,

    /// Retype the focused paragraph
    SetParagraphKind(ParagraphKind),

    /// Commit the pending list item of the focused paragraph
    AddListItem,

    NextStep,

    PreviousStep,

    /// Select a topic, or clear it if it is already selected
    ToggleTopic(Topic),

    Publish,

    /// Publish outcome: the new post's id, or the reason it failed
    PublishFinished(Result<u64, String>),

    // === Errors ===
    ShowError(String),

    DismissError,

    // === Shared store ===
    Store(libquill::Action),
}

impl From<libquill::Action> for Action {
    fn from(action: libquill::Action) -> Self {
        Action::Store(action)
    }
}
