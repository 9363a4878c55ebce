use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Notifier error type
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API rejected request: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Text markup the sink should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
    #[serde(rename = "HTML")]
    Html,
}

/// Rendering hints passed along with each message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageOptions {
    pub parse_mode: Option<ParseMode>,
    pub disable_link_preview: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            parse_mode: Some(ParseMode::Markdown),
            disable_link_preview: true,
        }
    }
}

/// Downstream messaging channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Check credentials and reachability, returning a display name for the sender
    async fn verify(&self) -> Result<String, NotifierError>;

    /// Deliver one message (single attempt)
    async fn send(&self, text: &str, options: &MessageOptions) -> Result<(), NotifierError>;
}
