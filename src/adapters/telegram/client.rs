//! Telegram Bot API Notifier
//!
//! Talks to the Bot API over plain HTTPS: `getMe` to verify the token and
//! `sendMessage` to post alerts to a channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::{MessageOptions, Notifier, NotifierError, ParseMode};

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
    pub channel_id: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            bot_token: bot_token.into(),
            channel_id: channel_id.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Every Bot API response is wrapped in this envelope
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<Option<T>, NotifierError> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(NotifierError::Api(
                self.description
                    .unwrap_or_else(|| "unknown Telegram error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    pub disable_web_page_preview: bool,
}

pub struct TelegramNotifier {
    config: TelegramConfig,
    http: Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifierError> {
        if config.bot_token.trim().is_empty() {
            return Err(NotifierError::Config("Telegram bot token is empty".into()));
        }
        if config.channel_id.trim().is_empty() {
            return Err(NotifierError::Config("Telegram channel id is empty".into()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn channel_id(&self) -> &str {
        &self.config.channel_id
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn verify(&self) -> Result<String, NotifierError> {
        let envelope: ApiEnvelope<BotUser> = self
            .http
            .get(self.method_url("getMe"))
            .send()
            .await?
            .json()
            .await?;

        let user = envelope
            .into_result()?
            .ok_or_else(|| NotifierError::Api("getMe returned no bot".into()))?;

        Ok(user
            .username
            .or(user.first_name)
            .unwrap_or_else(|| user.id.to_string()))
    }

    async fn send(&self, text: &str, options: &MessageOptions) -> Result<(), NotifierError> {
        let request = SendMessageRequest {
            chat_id: &self.config.channel_id,
            text,
            parse_mode: options.parse_mode,
            disable_web_page_preview: options.disable_link_preview,
        };

        // Telegram answers 4xx with a JSON envelope, so the status is not checked here
        let envelope: ApiEnvelope<serde_json::Value> = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        envelope.into_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_rejected() {
        let err = TelegramNotifier::new(TelegramConfig::new("", "@chan")).err().unwrap();
        assert!(matches!(err, NotifierError::Config(_)));

        let err = TelegramNotifier::new(TelegramConfig::new("123:abc", "  ")).err().unwrap();
        assert!(matches!(err, NotifierError::Config(_)));
    }

    #[test]
    fn test_method_url() {
        let notifier = TelegramNotifier::new(
            TelegramConfig::new("123:abc", "@chan").with_api_url("https://api.telegram.org/"),
        )
        .unwrap();
        assert_eq!(
            notifier.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(notifier.channel_id(), "@chan");
    }

    #[test]
    fn test_send_message_body() {
        let request = SendMessageRequest {
            chat_id: "@chan",
            text: "hello",
            parse_mode: Some(ParseMode::Markdown),
            disable_web_page_preview: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["chat_id"], "@chan");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["parse_mode"], "Markdown");
        assert_eq!(json["disable_web_page_preview"], true);

        let plain = SendMessageRequest { parse_mode: None, ..request };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("parse_mode").is_none());
    }

    #[test]
    fn test_envelope_error() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body).unwrap();
        match envelope.into_result() {
            Err(NotifierError::Api(msg)) => assert!(msg.contains("chat not found")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_envelope_get_me() {
        let body = r#"{"ok":true,"result":{"id":42,"is_bot":true,"first_name":"Monitor","username":"monitor_bot"}}"#;
        let envelope: ApiEnvelope<BotUser> = serde_json::from_str(body).unwrap();
        let user = envelope.into_result().unwrap().unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username.as_deref(), Some("monitor_bot"));
    }
}
