//! Discovery Pipeline Integration Tests
//!
//! Drive the full seed → cycle → notify flow through the public API:
//! 1. Aggregation over several sources with failures and fallback
//! 2. Novelty filtering and Known-Set growth across cycles
//! 3. Qualification and Telegram-style delivery
//!
//! All tests are deterministic (no real network calls) and use mock sources.

use std::sync::Arc;
use std::time::Duration;

use token_monitor::adapters::solana_tracker::{decode_entries, parse_tracker_entry};
use token_monitor::application::{
    CycleOutcome, CycleReport, MonitorSettings, SourceAggregator, TokenMonitor,
};
use token_monitor::domain::{SourceTag, Thresholds, TokenRecord, MS_PER_MINUTE};
use token_monitor::ports::mocks::{MockResponse, MockTokenSource, RecordingNotifier};
use token_monitor::ports::{ParseMode, TokenSource};

const NOW: i64 = 1_700_000_000_000;

// ============================================================================
// Test Fixtures
// ============================================================================

fn thresholds() -> Thresholds {
    Thresholds {
        max_age_minutes: 5,
        min_liquidity_usd: 1_000.0,
        min_market_cap_usd: 10_000.0,
    }
}

/// Candidate that passes every rule at NOW
fn qualifying(mint: &str) -> TokenRecord {
    TokenRecord::new(mint, NOW - 2 * MS_PER_MINUTE, SourceTag::SolanaTracker)
        .with_name(format!("{} Token", mint))
        .with_symbol(mint)
        .with_market(5_000.0, 50_000.0, 0.000_5)
}

struct Harness {
    monitor: Arc<TokenMonitor>,
    primary: MockTokenSource,
    secondary: MockTokenSource,
    baseline: MockTokenSource,
    notifier: RecordingNotifier,
}

impl Harness {
    fn new() -> Self {
        Self::with_sources(true)
    }

    fn with_sources(api_sources: bool) -> Self {
        let primary = MockTokenSource::new(SourceTag::SolanaTracker);
        let secondary = MockTokenSource::new(SourceTag::Helius);
        let baseline = MockTokenSource::new(SourceTag::RpcScan);
        let notifier = RecordingNotifier::new();

        let sources: Vec<Arc<dyn TokenSource>> = if api_sources {
            vec![Arc::new(primary.clone()), Arc::new(secondary.clone())]
        } else {
            vec![]
        };
        let aggregator =
            SourceAggregator::new(sources, Arc::new(baseline.clone()), Duration::from_millis(300));

        let monitor = Arc::new(TokenMonitor::new(
            aggregator,
            Arc::new(notifier.clone()),
            thresholds(),
            MonitorSettings {
                interval: Duration::from_secs(60),
                announce_startup: false,
            },
        ));

        Self {
            monitor,
            primary,
            secondary,
            baseline,
            notifier,
        }
    }

    async fn cycle(&self) -> CycleReport {
        match self.monitor.run_cycle_with(|| NOW).await {
            CycleOutcome::Completed(report) => report,
            CycleOutcome::Skipped => panic!("cycle unexpectedly skipped"),
        }
    }
}

// ============================================================================
// Dedup and freshness
// ============================================================================

#[tokio::test]
async fn test_token_announced_exactly_once() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(vec![qualifying("X")]));

    let first = h.cycle().await;
    assert_eq!(first.delivered, 1);

    let second = h.cycle().await;
    assert_eq!(second.candidates, 1);
    assert_eq!(second.novel, 0);
    assert_eq!(second.delivered, 0);

    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("`X`"));
    assert_eq!(h.monitor.notifications_sent(), 1);
}

#[tokio::test]
async fn test_cross_source_duplicate_first_seen_wins() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(vec![qualifying("X")]));
    h.secondary.set_response(MockResponse::Records(vec![
        qualifying("X").with_name("Other Name"),
    ]));

    let report = h.cycle().await;
    assert_eq!(report.candidates, 2);
    assert_eq!(report.novel, 1);
    assert_eq!(report.delivered, 1);
    assert!(h.notifier.messages()[0].contains("*X Token*"));
}

#[tokio::test]
async fn test_stale_token_marked_known_and_never_announced() {
    let h = Harness::new();
    let stale = TokenRecord::new("OLD", NOW - 10 * MS_PER_MINUTE, SourceTag::SolanaTracker)
        .with_market(1_000_000.0, 5_000_000.0, 1.0);
    h.primary.set_response(MockResponse::Records(vec![stale.clone()]));

    let report = h.cycle().await;
    assert_eq!(report.novel, 0);
    assert_eq!(h.monitor.known_count().await, 1);

    // Even if a later payload claims it is fresh, it is already known
    let refreshed = TokenRecord { created_time_ms: NOW, ..stale };
    h.primary.set_response(MockResponse::Records(vec![refreshed]));
    assert_eq!(h.cycle().await.delivered, 0);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_seeding_suppresses_existing_tokens() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(vec![qualifying("A"), qualifying("B")]));

    assert_eq!(h.monitor.start().await.unwrap(), 2);
    assert!(h.notifier.messages().is_empty());

    h.primary.set_response(MockResponse::Records(vec![
        qualifying("A"),
        qualifying("B"),
        qualifying("C"),
    ]));
    let report = h.cycle().await;
    assert_eq!(report.novel, 1);
    assert_eq!(report.delivered, 1);
    assert!(h.notifier.messages()[0].contains("`C`"));
}

// ============================================================================
// Qualification
// ============================================================================

#[tokio::test]
async fn test_risky_token_not_announced() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(vec![qualifying("R").with_risky(true)]));

    let report = h.cycle().await;
    assert_eq!(report.novel, 1);
    assert_eq!(report.qualified, 0);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_below_thresholds_consumed_without_alert() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(vec![
        qualifying("THIN").with_market(999.0, 50_000.0, 0.1),
        qualifying("SMALL").with_market(5_000.0, 9_999.0, 0.1),
        qualifying("OK"),
    ]));

    let report = h.cycle().await;
    assert_eq!(report.novel, 3);
    assert_eq!(report.qualified, 1);
    assert_eq!(h.notifier.messages().len(), 1);
    assert!(h.notifier.messages()[0].contains("`OK`"));

    // Novel-but-unqualified tokens are not reconsidered once their numbers improve
    h.primary.set_response(MockResponse::Records(vec![qualifying("THIN")]));
    assert_eq!(h.cycle().await.delivered, 0);
}

// ============================================================================
// Source failures
// ============================================================================

#[tokio::test]
async fn test_partial_source_failure() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Fail("502 Bad Gateway".into()));
    h.secondary.set_response(MockResponse::Records(vec![
        qualifying("T1").with_holders(10),
        qualifying("T2"),
    ]));

    let report = h.cycle().await;
    assert_eq!(report.candidates, 2);
    assert_eq!(report.delivered, 2);
    assert_eq!(h.baseline.call_count(), 0);
}

#[tokio::test]
async fn test_hung_source_does_not_block_cycle() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Hang(Duration::from_secs(60)));
    h.secondary.set_response(MockResponse::Records(vec![qualifying("T1")]));

    let report = tokio::time::timeout(Duration::from_secs(5), h.cycle())
        .await
        .expect("cycle bounded by per-source timeout");
    assert_eq!(report.delivered, 1);
}

#[tokio::test]
async fn test_baseline_used_when_no_sources_enabled() {
    let h = Harness::with_sources(false);
    h.baseline.set_response(MockResponse::Records(vec![
        TokenRecord::new("SCAN1", NOW, SourceTag::RpcScan).with_symbol("UNK"),
    ]));

    let report = h.cycle().await;
    assert_eq!(h.baseline.call_count(), 1);
    assert_eq!(report.candidates, 1);
    // RPC scan records carry no market data
    assert_eq!(report.qualified, 0);
}

#[tokio::test]
async fn test_baseline_used_when_all_sources_fail() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Fail("down".into()));
    h.secondary.set_response(MockResponse::Fail("down".into()));
    h.baseline.set_response(MockResponse::Fail("rpc down".into()));

    let report = h.cycle().await;
    assert_eq!(h.baseline.call_count(), 1);
    assert_eq!(report, CycleReport::default());
}

// ============================================================================
// Delivery
// ============================================================================

#[tokio::test]
async fn test_delivery_failure_continues_with_next_token() {
    let h = Harness::new();
    h.notifier.set_fail_on("`FAIL`");
    h.primary.set_response(MockResponse::Records(vec![qualifying("FAIL"), qualifying("PASS")]));

    let report = h.cycle().await;
    assert_eq!(report.qualified, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 1);
    assert!(h.notifier.messages()[0].contains("`PASS`"));
}

#[tokio::test]
async fn test_alerts_use_markdown_without_preview() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(vec![qualifying("M")]));
    h.cycle().await;

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.parse_mode, Some(ParseMode::Markdown));
    assert!(sent[0].1.disable_link_preview);
}

#[tokio::test]
async fn test_concurrent_trigger_is_skipped() {
    let h = Harness::new();
    h.primary.set_response(MockResponse::Hang(Duration::from_millis(200)));

    let running = {
        let monitor = Arc::clone(&h.monitor);
        tokio::spawn(async move { monitor.run_cycle_with(|| NOW).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.monitor.run_cycle_with(|| NOW).await, CycleOutcome::Skipped);
    assert!(matches!(running.await.unwrap(), CycleOutcome::Completed(_)));
}

// ============================================================================
// Solana Tracker payload through the pipeline
// ============================================================================

#[tokio::test]
async fn test_tracker_payload_end_to_end() {
    let payload = format!(
        r#"[
          {{
            "token": {{"mint": "FrogMint", "name": "Frog", "symbol": "FROG", "decimals": 6,
                       "creation": {{"created_time": {created}}}}},
            "pools": [{{"liquidity": {{"usd": 5000}}, "marketCap": {{"usd": 50000}}, "price": {{"usd": 0.00005}}}}],
            "holders": 120,
            "risk": {{"rugged": false, "score": null, "snipers": {{"count": 0}}, "insiders": {{"count": 0}}}}
          }},
          {{ "token": {{"mint": "BrokenMint", "decimals": -1}} }},
          {{
            "token": {{"mint": "SnipedMint", "symbol": "SNP", "creation": {{"created_time": {created}}}}},
            "pools": [{{"liquidity": {{"usd": 5000}}, "marketCap": {{"usd": 50000}}}}],
            "risk": {{"snipers": {{"count": 3}}}}
          }},
          {{ "token": {{"name": "no mint"}} }}
        ]"#,
        created = (NOW - 60_000) / 1000
    );
    let entries = decode_entries(serde_json::from_str(&payload).unwrap());
    assert_eq!(entries.len(), 3);
    let records: Vec<TokenRecord> = entries
        .into_iter()
        .filter_map(|e| parse_tracker_entry(e, NOW))
        .collect();
    assert_eq!(records.len(), 2);

    let h = Harness::new();
    h.primary.set_response(MockResponse::Records(records));

    let report = h.cycle().await;
    assert_eq!(report.novel, 2);
    assert_eq!(report.qualified, 1);

    let message = &h.notifier.messages()[0];
    assert!(message.contains("*Frog* (FROG)"));
    assert!(message.contains("$50.00K"));
    assert!(message.contains("*Holders:* 120"));
    assert!(message.contains("*Age:* 1 minutes"));
    assert!(message.ends_with("#Solana #NewToken #FROG"));
}
