use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmojizeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid emoticon alias {alias:?}: {reason}")]
    InvalidAlias { alias: String, reason: String },

    #[error("Failed to compile emoticon matcher: {0}")]
    Matcher(#[from] regex::Error),

    #[error("Shortcode expansion failed: {0}")]
    Expansion(String),

    #[error("Command recursion limit of {0} reached")]
    RecursionLimit(usize),
}

pub type EmojizeResult<T> = Result<T, EmojizeError>;
