//! Errors surfaced by the TUI binary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuiError {
    #[error("{0}")]
    Service(#[from] libquill::QuillError),

    /// Terminal setup, drawing or input
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl TuiError {
    /// Same codes as the CLI for library errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            TuiError::Service(inner) => inner.exit_code(),
            TuiError::Terminal(_) | TuiError::Runtime(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TuiError>;
