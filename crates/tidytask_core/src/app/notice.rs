//! User-facing feedback messages.

/// One transient message for the user.
///
/// Replaces the original blocking alert surface: handlers queue notices
/// and the UI drains them whenever it is ready to show feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Confirmation of a completed operation.
    Info(String),
    /// Validation failure or provider error, verbatim.
    Error(String),
}

impl Notice {
    /// Returns the message text regardless of severity.
    pub fn message(&self) -> &str {
        match self {
            Self::Info(text) | Self::Error(text) => text,
        }
    }

    /// Returns whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
