/// Result alias that carries the custom [`RhythmusError`] type.
pub type Result<T> = std::result::Result<T, RhythmusError>;

/// Common error type for the core crate.
///
/// Inside the scene graph most failures are recovered locally (logged and
/// skipped); this type mostly travels through the outer surfaces such as
/// configuration loading, scene descriptions and command argument access.
#[derive(Debug, thiserror::Error)]
pub enum RhythmusError {
    /// Free-form message for failures that have no dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a configuration or scene description.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// A command handler asked for a positional argument that was not given.
    #[error("command `{command}` is missing argument #{index}")]
    MissingArgument { command: String, index: usize },
    /// Argument text that does not start with a number.
    #[error("`{text}` is not a number")]
    InvalidNumber { text: String },
    /// A shared lock was poisoned by a panicking producer.
    #[error("{0} has been poisoned")]
    Poisoned(&'static str),
}

impl RhythmusError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for RhythmusError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for RhythmusError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
