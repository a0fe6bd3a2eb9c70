//! Polling loop background task
//!
//! Fetches the latest reading and the history on a fixed interval, runs
//! both payloads through the shared pipeline and publishes one
//! [`DashboardSnapshot`] per tick on a watch channel.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use serde_json::Value;
use shared::{
    build_history_view, build_live_view, DashboardSnapshot, FallbackView, HistoryState,
    LiveState,
};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::SensorSource;

/// Settings for the polling loop
#[derive(Debug, Clone)]
pub struct PollerSettings {
    /// Delay between tick starts (default: 2 seconds)
    pub interval: Duration,
    /// Trailing readings kept for the charts
    pub window_size: usize,
    /// Offset of the chart's `HH:MM` labels and of the server's `dd/mm/yyyy` timestamps
    pub offset: FixedOffset,
}

impl PollerSettings {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self {
            interval: config.polling_interval(),
            window_size: config.chart.window_size,
            offset: config.display_offset()?,
        })
    }
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            window_size: shared::DEFAULT_WINDOW_SIZE,
            offset: Utc.fix(),
        }
    }
}

/// Polling loop; owns the source and the writer side of the snapshot channel
pub struct Poller<S> {
    source: S,
    settings: PollerSettings,
    ticks: u64,
    publisher: watch::Sender<DashboardSnapshot>,
}

impl<S: SensorSource> Poller<S> {
    /// Create a poller and the receiver readers subscribe through
    pub fn new(source: S, settings: PollerSettings) -> (Self, watch::Receiver<DashboardSnapshot>) {
        let (publisher, receiver) = watch::channel(DashboardSnapshot::initial());
        let poller = Self {
            source,
            settings,
            ticks: 0,
            publisher,
        };
        (poller, receiver)
    }

    /// Run one poll and publish its snapshot
    ///
    /// Never fails: a failed leg is logged and replaced by its fallback state.
    pub async fn tick(&mut self) -> DashboardSnapshot {
        let (latest, history) =
            tokio::join!(self.source.fetch_latest(), self.source.fetch_history());

        self.ticks += 1;
        let snapshot = DashboardSnapshot {
            tick: self.ticks,
            updated_at: Some(Utc::now()),
            live: self.live_state(latest),
            history: self.history_state(history),
        };

        tracing::debug!(
            "Tick {} published (live: {}, history ready: {})",
            snapshot.tick,
            snapshot.live.is_live(),
            snapshot.history.view().is_some()
        );

        self.publisher.send_replace(snapshot.clone());
        snapshot
    }

    fn live_state(&self, latest: AppResult<Value>) -> LiveState {
        let view = latest.and_then(|payload| {
            build_live_view(&payload, self.settings.offset).map_err(AppError::from)
        });
        match view {
            Ok(view) => LiveState::Live(view),
            Err(e) => {
                tracing::warn!("Latest reading unavailable ({}): {}", e.code(), e);
                LiveState::NoSignal(FallbackView::no_signal(e.code()))
            }
        }
    }

    fn history_state(&self, history: AppResult<Value>) -> HistoryState {
        let view = history.and_then(|payload| {
            build_history_view(&payload, self.settings.window_size, self.settings.offset)
                .map_err(AppError::from)
        });
        match view {
            Ok(view) => HistoryState::Ready(view),
            Err(e) => {
                tracing::warn!("History unavailable ({}): {}", e.code(), e);
                HistoryState::unavailable(e.code())
            }
        }
    }

    /// Run the polling loop until `shutdown` fires
    ///
    /// The first tick runs immediately. Ticks missed while a slow fetch is in
    /// flight are skipped, so polls never overlap. A poll still in flight at
    /// shutdown is dropped without publishing.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        tracing::info!(
            "Poller started (interval: {}ms, window: {})",
            self.settings.interval.as_millis(),
            self.settings.window_size
        );

        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.tick() => {}
            }
        }

        tracing::info!("Poller stopped after {} tick(s)", self.ticks);
    }

    /// Spawn the loop on the runtime and return its stop handle
    pub fn spawn(self) -> PollerHandle {
        let (stop, shutdown) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown));
        PollerHandle { stop, task }
    }
}

/// Stop handle of a spawned poller
pub struct PollerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the loop, cancelling any poll in flight; no tick starts after this returns
    pub async fn stop(self) {
        // The loop may already have exited, in which case there is no receiver
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Poller task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::Mood;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Source replaying a fixed latest payload; fails the first `failures` calls
    #[derive(Clone)]
    struct FakeSource {
        latest: Value,
        history: Value,
        failures: usize,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(latest: Value, history: Value) -> Self {
            Self {
                latest,
                history,
                failures: 0,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl SensorSource for FakeSource {
        async fn fetch_latest(&self) -> AppResult<Value> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(AppError::Network("connection refused".to_string()));
            }
            Ok(self.latest.clone())
        }

        async fn fetch_history(&self) -> AppResult<Value> {
            Ok(self.history.clone())
        }
    }

    /// Source whose upstream accepts the request and never answers
    struct StalledSource {
        started: Arc<Notify>,
    }

    impl SensorSource for StalledSource {
        async fn fetch_latest(&self) -> AppResult<Value> {
            self.started.notify_one();
            std::future::pending().await
        }

        async fn fetch_history(&self) -> AppResult<Value> {
            std::future::pending().await
        }
    }

    fn latest() -> Value {
        json!({
            "temperature": 30.0,
            "humidity": 40.0,
            "timestamp": "2024-07-01T14:00:00Z",
            "prev_temp": 29.5,
            "prev_hum": 40.0
        })
    }

    fn history() -> Value {
        json!({"data": [
            {"dt": "2024-07-01T13:58:00Z", "temp": 29.0, "hum": 42.0},
            {"dt": "2024-07-01T14:00:00Z", "temp": 30.0, "hum": 40.0}
        ]})
    }

    #[tokio::test]
    async fn test_tick_publishes_snapshot() {
        let (mut poller, receiver) =
            Poller::new(FakeSource::new(latest(), history()), PollerSettings::default());

        let snapshot = poller.tick().await;
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.live.mood().mood, Mood::SunnyDry);
        assert_eq!(snapshot.history.view().unwrap().readings.len(), 2);
        assert_eq!(*receiver.borrow(), snapshot);
    }

    #[tokio::test]
    async fn test_failed_live_leg_falls_back() {
        let mut source = FakeSource::new(latest(), history());
        source.failures = 1;
        let (mut poller, _receiver) = Poller::new(source, PollerSettings::default());

        let first = poller.tick().await;
        match &first.live {
            LiveState::NoSignal(fallback) => {
                assert_eq!(fallback.caption, "Pas de signal...");
                assert_eq!(fallback.reason, "NETWORK_ERROR");
                assert!(!fallback.mood.particles.is_active());
            }
            other => panic!("expected fallback, got {:?}", other),
        }
        // History leg is independent
        assert!(first.history.view().is_some());

        let second = poller.tick().await;
        assert!(second.live.is_live());
        assert_eq!(second.tick, 2);
    }

    #[tokio::test]
    async fn test_bad_history_shape_is_unavailable() {
        let source = FakeSource::new(latest(), json!({"data": "x"}));
        let (mut poller, _receiver) = Poller::new(source, PollerSettings::default());

        let snapshot = poller.tick().await;
        assert!(snapshot.live.is_live());
        assert_eq!(
            snapshot.history,
            HistoryState::unavailable("FORMAT_ERROR")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_ticks_and_stops() {
        let source = FakeSource::new(latest(), history());
        let calls = source.calls.clone();
        let (poller, mut receiver) = Poller::new(source, PollerSettings::default());
        let handle = poller.spawn();

        // First tick is immediate
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().tick, 1);

        tokio::time::advance(Duration::from_millis(2000)).await;
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().tick, 2);

        handle.stop().await;
        let polled = calls.load(Ordering::SeqCst);
        tokio::time::advance(Duration::from_millis(10_000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), polled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_recovers_on_next_interval() {
        let mut source = FakeSource::new(latest(), history());
        source.failures = 1;
        let (poller, mut receiver) = Poller::new(source, PollerSettings::default());
        let handle = poller.spawn();

        receiver.changed().await.unwrap();
        {
            let first = receiver.borrow_and_update();
            assert_eq!(first.tick, 1);
            assert!(!first.live.is_live());
        }

        tokio::time::advance(Duration::from_millis(2000)).await;
        receiver.changed().await.unwrap();
        {
            let second = receiver.borrow_and_update();
            assert_eq!(second.tick, 2);
            assert!(second.live.is_live());
        }

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_stalled_tick() {
        let started = Arc::new(Notify::new());
        let source = StalledSource {
            started: started.clone(),
        };
        let (poller, receiver) = Poller::new(source, PollerSettings::default());
        let handle = poller.spawn();

        started.notified().await;
        let stopped = tokio::time::timeout(Duration::from_secs(3), handle.stop()).await;
        assert!(stopped.is_ok(), "stop() waited on a poll that never completes");
        assert_eq!(receiver.borrow().tick, 0);
    }
}
