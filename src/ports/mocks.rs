//! Recording test doubles for the port traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::notifier::{MessageOptions, Notifier, NotifierError};
use super::token_source::{SourceError, TokenSource};
use crate::domain::{SourceTag, TokenRecord};

/// Scripted behaviour of a `MockTokenSource`
#[derive(Debug, Clone)]
pub enum MockResponse {
    Records(Vec<TokenRecord>),
    Fail(String),
    /// Sleep for the given duration before answering with no records
    Hang(Duration),
}

/// Token source returning a scripted response and counting calls
#[derive(Debug, Clone)]
pub struct MockTokenSource {
    tag: SourceTag,
    response: Arc<Mutex<MockResponse>>,
    calls: Arc<AtomicUsize>,
}

impl MockTokenSource {
    pub fn new(tag: SourceTag) -> Self {
        Self {
            tag,
            response: Arc::new(Mutex::new(MockResponse::Records(vec![]))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_records(self, records: Vec<TokenRecord>) -> Self {
        self.set_response(MockResponse::Records(records));
        self
    }

    pub fn failing(self, message: &str) -> Self {
        self.set_response(MockResponse::Fail(message.to_string()));
        self
    }

    pub fn hanging(self, duration: Duration) -> Self {
        self.set_response(MockResponse::Hang(duration));
        self
    }

    /// Replace the scripted response (clones share it)
    pub fn set_response(&self, response: MockResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for MockTokenSource {
    fn tag(&self) -> SourceTag {
        self.tag
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().unwrap().clone();
        match response {
            MockResponse::Records(records) => Ok(records),
            MockResponse::Fail(message) => Err(SourceError::Parse(message)),
            MockResponse::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(vec![])
            }
        }
    }
}

/// Notifier that records every delivered message
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, MessageOptions)>>>,
    fail_when_contains: Arc<Mutex<Option<String>>>,
    verify_fails: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any message whose text contains `needle`
    pub fn failing_on(self, needle: &str) -> Self {
        self.set_fail_on(needle);
        self
    }

    /// Same as `failing_on`, applied to every clone of this notifier
    pub fn set_fail_on(&self, needle: &str) {
        *self.fail_when_contains.lock().unwrap() = Some(needle.to_string());
    }

    pub fn with_failed_verify(mut self) -> Self {
        self.verify_fails = true;
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(text, _)| text.clone()).collect()
    }

    pub fn sent(&self) -> Vec<(String, MessageOptions)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn verify(&self) -> Result<String, NotifierError> {
        if self.verify_fails {
            return Err(NotifierError::Api("Unauthorized".to_string()));
        }
        Ok("recording_bot".to_string())
    }

    async fn send(&self, text: &str, options: &MessageOptions) -> Result<(), NotifierError> {
        if let Some(needle) = self.fail_when_contains.lock().unwrap().as_deref() {
            if text.contains(needle) {
                return Err(NotifierError::Api(format!("rejected message containing {}", needle)));
            }
        }
        self.sent.lock().unwrap().push((text.to_string(), *options));
        Ok(())
    }
}
