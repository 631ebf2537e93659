//! Error types for image processing.
//!
//! Every failure is surfaced to the caller as a [`ProcessError`] variant named
//! after the step that failed. Nothing is retried or recovered internally.

use thiserror::Error;

/// Result type alias for processor operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Template used by [`ProcessError::format`] when none is given.
pub const DEFAULT_ERROR_TEMPLATE: &str = "<!-- %S% -->";

/// Placeholder replaced with the error message in a display template.
pub const MESSAGE_PLACEHOLDER: &str = "%S%";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsupported file format '{0}'")]
    UnsupportedFormat(String),
    #[error("Impossible to create image from {kind} file '{path}': {reason}")]
    Decode {
        kind: &'static str,
        path: String,
        reason: String,
    },
    #[error("Impossible to create new {width}x{height} image: {reason}")]
    CanvasAllocation {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("Impossible to resample image: {0}")]
    Resample(String),
    #[error("Can't fill the image: {0}")]
    Fill(String),
    #[error("Wrong color format: {0}")]
    InvalidColorFormat(String),
    #[error("Impossible to save image as {target}: {reason}")]
    Encode { target: String, reason: String },
    #[error("Unsupported output format '{0}'")]
    UnsupportedOutputFormat(String),
}

impl ProcessError {
    /// Render the message into a display template.
    ///
    /// Every `%S%` in `template` is replaced with the error message. An empty
    /// template falls back to [`DEFAULT_ERROR_TEMPLATE`], which wraps the
    /// message in an HTML comment so it can be inlined into generated markup.
    pub fn format(&self, template: &str) -> String {
        let template = if template.is_empty() {
            DEFAULT_ERROR_TEMPLATE
        } else {
            template
        };
        template.replace(MESSAGE_PLACEHOLDER, &self.to_string())
    }
}
