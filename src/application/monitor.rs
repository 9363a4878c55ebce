//! Token Monitor
//!
//! Owns the discovery pipeline: seeds the Known-Set once at startup, then
//! on every tick runs aggregate → filter → qualify → notify. At most one
//! cycle is in flight; a tick that finds one running is dropped.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::aggregator::SourceAggregator;
use super::formatter::{format_startup_message, format_token_alert};
use crate::domain::token::now_ms;
use crate::domain::{NoveltyFilter, QualificationEngine, Thresholds};
use crate::ports::{MessageOptions, Notifier, NotifierError};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Notifier verification failed: {0}")]
    NotifierUnavailable(#[source] NotifierError),

    #[error("Monitor already started")]
    AlreadyStarted,
}

/// Counts for one completed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Records returned by aggregation (duplicates included)
    pub candidates: usize,
    /// Not previously known and fresh enough
    pub novel: usize,
    pub qualified: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// Another cycle (or seeding) was still in flight
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub announce_startup: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            announce_startup: true,
        }
    }
}

/// Releases the in-flight flag when the cycle ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TokenMonitor {
    aggregator: SourceAggregator,
    filter: Mutex<NoveltyFilter>,
    engine: QualificationEngine,
    notifier: Arc<dyn Notifier>,
    settings: MonitorSettings,
    message_options: MessageOptions,
    in_flight: AtomicBool,
    seeded: AtomicBool,
    cycles: AtomicU64,
    notifications: AtomicU64,
}

impl TokenMonitor {
    pub fn new(
        aggregator: SourceAggregator,
        notifier: Arc<dyn Notifier>,
        thresholds: Thresholds,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            aggregator,
            filter: Mutex::new(NoveltyFilter::new(thresholds.max_age_minutes)),
            engine: QualificationEngine::new(thresholds),
            notifier,
            settings,
            message_options: MessageOptions::default(),
            in_flight: AtomicBool::new(false),
            seeded: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
            notifications: AtomicU64::new(0),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.engine.thresholds()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn notifications_sent(&self) -> u64 {
        self.notifications.load(Ordering::Relaxed)
    }

    pub async fn known_count(&self) -> usize {
        self.filter.lock().await.known().len()
    }

    /// Verify the notifier, seed the Known-Set and optionally announce.
    /// Returns the number of mints seeded.
    pub async fn start(&self) -> Result<usize, MonitorError> {
        let bot = self
            .notifier
            .verify()
            .await
            .map_err(MonitorError::NotifierUnavailable)?;
        info!("Notifier verified as @{}", bot);

        let seeded = self.seed().await?;

        if self.settings.announce_startup {
            let message = format_startup_message(
                self.engine.thresholds(),
                self.settings.interval.as_secs() / 60,
                &self.aggregator.enabled_sources(),
            );
            if let Err(e) = self.notifier.send(&message, &self.message_options).await {
                warn!("Startup announcement failed: {}", e);
            }
        }

        Ok(seeded)
    }

    /// Mark every currently observable mint as known without notifying
    pub async fn seed(&self) -> Result<usize, MonitorError> {
        if self.seeded.swap(true, Ordering::AcqRel) {
            return Err(MonitorError::AlreadyStarted);
        }
        // Cycles cannot start until seeding releases the flag
        let _guard = loop {
            match InFlight::acquire(&self.in_flight) {
                Some(guard) => break guard,
                None => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        };

        let candidates = self.aggregator.collect().await;
        let added = self.filter.lock().await.seed(&candidates);
        info!("Seeded {} known tokens from {} candidates", added, candidates.len());
        Ok(added)
    }

    /// Run one cycle against the wall clock
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.run_cycle_with(now_ms).await
    }

    /// Run one cycle; `clock` supplies unix milliseconds and is read after
    /// aggregation (for filtering) and again per token (for qualification)
    pub async fn run_cycle_with<C>(&self, clock: C) -> CycleOutcome
    where
        C: Fn() -> i64,
    {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return CycleOutcome::Skipped;
        };

        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let mut report = CycleReport::default();

        let candidates = self.aggregator.collect().await;
        report.candidates = candidates.len();

        let (novel, stats) = self.filter.lock().await.filter(candidates, clock());
        report.novel = novel.len();
        debug!(
            "Cycle #{} filter: {} accepted, {} known, {} stale",
            cycle, stats.accepted, stats.already_known, stats.stale
        );

        for token in &novel {
            let now = clock();
            if let Err(reason) = self.engine.evaluate(token, now) {
                debug!("{} not announced: {}", token.mint, reason);
                continue;
            }
            report.qualified += 1;

            let message = format_token_alert(token, now);
            match self.notifier.send(&message, &self.message_options).await {
                Ok(()) => {
                    report.delivered += 1;
                    self.notifications.fetch_add(1, Ordering::Relaxed);
                    info!(
                        "Announced {} ({}) from {}",
                        token.symbol.as_deref().unwrap_or("?"),
                        token.mint,
                        token.source
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!("Failed to announce {}: {}", token.mint, e);
                }
            }
        }

        info!(
            "Cycle #{}: {} candidates, {} new, {} qualified, {} sent, {} failed (total sent {})",
            cycle,
            report.candidates,
            report.novel,
            report.qualified,
            report.delivered,
            report.failed,
            self.notifications_sent()
        );

        CycleOutcome::Completed(report)
    }

    /// Tick every `settings.interval` (first tick one interval from now) until
    /// `shutdown` resolves. Each tick runs its cycle on its own task.
    pub async fn run<F>(self: Arc<Self>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let interval = self.settings.interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!("Monitoring started - checking every {}s", interval.as_secs());

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    let monitor = Arc::clone(&self);
                    tokio::spawn(async move {
                        if monitor.run_cycle().await == CycleOutcome::Skipped {
                            warn!("Previous cycle still running, skipping this tick");
                        }
                    });
                }
            }
        }

        info!(
            "Monitor stopped after {} cycles, {} notifications",
            self.cycles_completed(),
            self.notifications_sent()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SourceTag, TokenRecord, MS_PER_MINUTE};
    use crate::ports::mocks::{MockTokenSource, RecordingNotifier};
    use crate::ports::TokenSource;

    const NOW: i64 = 1_700_000_000_000;

    fn fresh(mint: &str) -> TokenRecord {
        TokenRecord::new(mint, NOW - 2 * MS_PER_MINUTE, SourceTag::SolanaTracker)
            .with_symbol(mint)
            .with_market(5_000.0, 50_000.0, 0.001)
    }

    fn monitor_with(
        source: MockTokenSource,
        notifier: RecordingNotifier,
        announce_startup: bool,
    ) -> TokenMonitor {
        let aggregator = SourceAggregator::new(
            vec![Arc::new(source) as Arc<dyn TokenSource>],
            Arc::new(MockTokenSource::new(SourceTag::RpcScan)),
            Duration::from_millis(500),
        );
        TokenMonitor::new(
            aggregator,
            Arc::new(notifier),
            Thresholds::default(),
            MonitorSettings {
                interval: Duration::from_secs(60),
                announce_startup,
            },
        )
    }

    #[tokio::test]
    async fn test_cycle_announces_once() {
        let source = MockTokenSource::new(SourceTag::SolanaTracker).with_records(vec![fresh("X")]);
        let notifier = RecordingNotifier::new();
        let monitor = monitor_with(source, notifier.clone(), false);

        let first = monitor.run_cycle_with(|| NOW).await;
        assert_eq!(
            first,
            CycleOutcome::Completed(CycleReport {
                candidates: 1,
                novel: 1,
                qualified: 1,
                delivered: 1,
                failed: 0
            })
        );

        let second = monitor.run_cycle_with(|| NOW).await;
        match second {
            CycleOutcome::Completed(report) => {
                assert_eq!(report.candidates, 1);
                assert_eq!(report.novel, 0);
                assert_eq!(report.delivered, 0);
            }
            CycleOutcome::Skipped => panic!("cycle skipped"),
        }

        assert_eq!(notifier.messages().len(), 1);
        assert!(notifier.messages()[0].contains("`X`"));
        assert_eq!(monitor.cycles_completed(), 2);
        assert_eq!(monitor.notifications_sent(), 1);
    }

    #[tokio::test]
    async fn test_start_seeds_and_announces() {
        let source = MockTokenSource::new(SourceTag::SolanaTracker).with_records(vec![fresh("OLD")]);
        let notifier = RecordingNotifier::new();
        let monitor = monitor_with(source, notifier.clone(), true);

        assert_eq!(monitor.start().await.unwrap(), 1);
        assert_eq!(monitor.known_count().await, 1);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("now active"));

        monitor.run_cycle_with(|| NOW).await;
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_start_fails_without_notifier() {
        let monitor = monitor_with(
            MockTokenSource::new(SourceTag::SolanaTracker),
            RecordingNotifier::new().with_failed_verify(),
            true,
        );
        assert!(matches!(monitor.start().await, Err(MonitorError::NotifierUnavailable(_))));
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let monitor = monitor_with(
            MockTokenSource::new(SourceTag::SolanaTracker),
            RecordingNotifier::new(),
            false,
        );
        monitor.seed().await.unwrap();
        assert!(matches!(monitor.seed().await, Err(MonitorError::AlreadyStarted)));
    }

    #[tokio::test]
    async fn test_overlapping_cycle_is_skipped() {
        let source = MockTokenSource::new(SourceTag::SolanaTracker).hanging(Duration::from_millis(300));
        let monitor = Arc::new(monitor_with(source, RecordingNotifier::new(), false));

        let running = {
            let monitor = Arc::clone(&monitor);
            tokio::spawn(async move { monitor.run_cycle_with(|| NOW).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(monitor.run_cycle_with(|| NOW).await, CycleOutcome::Skipped);
        assert!(matches!(running.await.unwrap(), CycleOutcome::Completed(_)));

        // Flag released after completion
        assert!(matches!(monitor.run_cycle_with(|| NOW).await, CycleOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_cycle() {
        let source = MockTokenSource::new(SourceTag::SolanaTracker)
            .with_records(vec![fresh("BAD"), fresh("GOOD")]);
        let notifier = RecordingNotifier::new().failing_on("`BAD`");
        let monitor = monitor_with(source, notifier.clone(), false);

        match monitor.run_cycle_with(|| NOW).await {
            CycleOutcome::Completed(report) => {
                assert_eq!(report.qualified, 2);
                assert_eq!(report.delivered, 1);
                assert_eq!(report.failed, 1);
            }
            CycleOutcome::Skipped => panic!("cycle skipped"),
        }

        assert_eq!(notifier.messages().len(), 1);
        assert!(notifier.messages()[0].contains("`GOOD`"));

        // No retry on later cycles
        monitor.run_cycle_with(|| NOW).await;
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let source = MockTokenSource::new(SourceTag::SolanaTracker);
        let monitor = Arc::new(monitor_with(source.clone(), RecordingNotifier::new(), false));

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(Arc::clone(&monitor).run(async {
            rx.await.ok();
        }));

        // First tick lands one interval after start
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.call_count(), 0);
        tokio::time::sleep(Duration::from_secs(31)).await;

        tx.send(()).unwrap();
        handle.await.unwrap();
        assert!(source.call_count() >= 1);
    }
}
