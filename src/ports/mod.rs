//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement:
//! - Token sources (launch feeds, metadata APIs, RPC scans)
//! - Notification sink (Telegram channel)

pub mod token_source;
pub mod notifier;
#[cfg(any(test, feature = "testkit"))]
pub mod mocks;

pub use token_source::{TokenSource, SourceError};
pub use notifier::{Notifier, NotifierError, MessageOptions, ParseMode};
