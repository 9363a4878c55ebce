//! Connectivity Diagnostics
//!
//! Backs `token-monitor check`: validates settings, verifies the Telegram
//! bot (optionally posting a test message), pings the RPC node and probes
//! each configured API source. Only settings, Telegram and RPC are required;
//! API source problems are warnings.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::solana::SolanaClient;
use crate::adapters::telegram::{TelegramConfig, TelegramNotifier};
use crate::config::Config;
use crate::ports::{MessageOptions, Notifier, TokenSource};

use super::aggregator::SourceAggregator;

pub const TEST_MESSAGE: &str = "🧪 Test message from Solana Token Monitor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Warn => "⚠️",
            CheckStatus::Fail => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticItem {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl DiagnosticItem {
    pub fn new(name: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagnosticReport {
    pub items: Vec<DiagnosticItem>,
}

impl DiagnosticReport {
    pub fn push(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    pub fn has_failures(&self) -> bool {
        self.items.iter().any(|i| i.status == CheckStatus::Fail)
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🔧 Solana Token Monitor configuration check")?;
        writeln!(f)?;
        for (i, item) in self.items.iter().enumerate() {
            writeln!(f, "{}. {} {}: {}", i + 1, item.status.icon(), item.name, item.detail)?;
        }
        writeln!(f)?;
        if self.has_failures() {
            write!(f, "❌ Required checks failed")
        } else {
            write!(f, "🎉 All required checks passed")
        }
    }
}

pub fn check_settings(config: &Config) -> DiagnosticItem {
    match config.validate() {
        Ok(()) => DiagnosticItem::new("Settings", CheckStatus::Pass, "all required settings present"),
        Err(e) => DiagnosticItem::new("Settings", CheckStatus::Fail, e.to_string()),
    }
}

/// `getMe`, then optionally a test message
pub async fn check_notifier(notifier: &dyn Notifier, send_test: bool) -> Vec<DiagnosticItem> {
    let bot = match notifier.verify().await {
        Ok(bot) => bot,
        Err(e) => {
            return vec![DiagnosticItem::new("Telegram bot", CheckStatus::Fail, e.to_string())];
        }
    };

    let mut items = vec![DiagnosticItem::new(
        "Telegram bot",
        CheckStatus::Pass,
        format!("connected as @{}", bot),
    )];

    if send_test {
        let options = MessageOptions {
            parse_mode: None,
            disable_link_preview: true,
        };
        items.push(match notifier.send(TEST_MESSAGE, &options).await {
            Ok(()) => DiagnosticItem::new("Telegram channel", CheckStatus::Pass, "test message sent"),
            Err(e) => DiagnosticItem::new("Telegram channel", CheckStatus::Fail, e.to_string()),
        });
    }

    items
}

pub async fn check_rpc(solana: &SolanaClient) -> DiagnosticItem {
    match solana.get_version().await {
        Ok(version) => DiagnosticItem::new(
            "Solana RPC",
            CheckStatus::Pass,
            format!("{} (solana-core {})", solana.rpc_url(), version),
        ),
        Err(e) => DiagnosticItem::new("Solana RPC", CheckStatus::Fail, e.to_string()),
    }
}

/// One fetch per source; failures are warnings since API sources are optional
pub async fn check_sources(sources: &[Arc<dyn TokenSource>], timeout: Duration) -> Vec<DiagnosticItem> {
    let mut items = Vec::with_capacity(sources.len());
    for source in sources {
        let name = format!("Source {}", source.tag());
        let item = match tokio::time::timeout(timeout, source.fetch_tokens()).await {
            Ok(Ok(records)) => {
                DiagnosticItem::new(name, CheckStatus::Pass, format!("{} tokens returned", records.len()))
            }
            Ok(Err(e)) => DiagnosticItem::new(name, CheckStatus::Warn, e.to_string()),
            Err(_) => DiagnosticItem::new(
                name,
                CheckStatus::Warn,
                format!("no answer within {}s", timeout.as_secs()),
            ),
        };
        items.push(item);
    }
    items
}

fn missing_key_items(config: &Config) -> Vec<DiagnosticItem> {
    let mut items = Vec::new();
    if config.sources.solana_tracker_key().is_none() {
        items.push(DiagnosticItem::new(
            "Source solana-tracker",
            CheckStatus::Warn,
            "SOLANA_TRACKER_API_KEY not set (optional)",
        ));
    }
    if config.sources.helius_key().is_none() {
        items.push(DiagnosticItem::new(
            "Source helius",
            CheckStatus::Warn,
            "HELIUS_API_KEY not set (optional)",
        ));
    }
    items
}

/// Full check against live endpoints
pub async fn run_diagnostics(config: &Config, send_test: bool) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();
    let timeout = config.request_timeout();

    let settings = check_settings(config);
    let settings_ok = settings.status == CheckStatus::Pass;
    report.push(settings);

    if settings_ok {
        let telegram = TelegramConfig::new(&config.telegram.bot_token, &config.telegram.channel_id)
            .with_api_url(config.telegram.api_url.clone())
            .with_timeout(timeout);
        match TelegramNotifier::new(telegram) {
            Ok(notifier) => {
                for item in check_notifier(&notifier, send_test).await {
                    report.push(item);
                }
            }
            Err(e) => report.push(DiagnosticItem::new("Telegram bot", CheckStatus::Fail, e.to_string())),
        }
    } else {
        report.push(DiagnosticItem::new(
            "Telegram bot",
            CheckStatus::Fail,
            "skipped, settings invalid",
        ));
    }

    let solana = SolanaClient::new(config.solana.rpc_url.clone(), timeout);
    report.push(check_rpc(&solana).await);

    match SourceAggregator::from_config(config) {
        Ok(aggregator) => {
            for item in check_sources(aggregator.sources(), timeout).await {
                report.push(item);
            }
        }
        Err(e) => report.push(DiagnosticItem::new("Sources", CheckStatus::Warn, e.to_string())),
    }
    for item in missing_key_items(config) {
        report.push(item);
    }

    report
}
