//! Periodic polling tasks.
//!
//! A poller fires immediately, then once per interval, until it is shut down.
//! Every tick gets a sequence number and its fetch runs in its own task, so a
//! slow response never delays the next tick. With [`OverlapPolicy::Allow`]
//! ticks may overlap and complete out of order; with [`OverlapPolicy::Skip`]
//! a tick is dropped while the previous fetch is still in flight.
//!
//! Results are delivered over an unbounded channel to the single task that
//! owns the console state.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use fakernet_api::{ApiResult, ConsoleApi};
use fakernet_types::{RosterRow, SystemMetricsSnapshot};
use fakernet_util::{ConsoleConfig, OverlapPolicy};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Result of one poll tick.
#[derive(Debug)]
pub struct PollTick<T> {
    /// Starts at 1 and increases by one per tick, skipped ticks included.
    pub seq: u64,
    pub result: ApiResult<T>,
}

/// Ticks of both console pollers, multiplexed onto one channel.
#[derive(Debug)]
pub enum PollEvent {
    Metrics(PollTick<SystemMetricsSnapshot>),
    Roster(PollTick<Vec<RosterRow>>),
}

/// Timing of one poller.
#[derive(Debug, Clone, Copy)]
pub struct PollSchedule {
    pub name: &'static str,
    pub interval: Duration,
    pub overlap: OverlapPolicy,
}

/// Cancellation handle of a running poller.
#[derive(Debug)]
pub struct PollerHandle {
    name: &'static str,
    cancellation_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop ticking, cancel in-flight fetches and wait for the loop to exit.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.cancel();
        self.join().await
    }

    fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    async fn join(self) -> Result<(), JoinError> {
        self.handle.await?;
        debug!(poller = self.name, "poller stopped");
        Ok(())
    }
}

/// Spawn a poller that calls `fetch` on every tick and sends
/// `wrap(PollTick { .. })` to `sender`.
///
/// The poller also stops on its own once the receiving side is dropped.
pub fn spawn_poller<T, E, F, Fut>(schedule: PollSchedule, fetch: F, sender: UnboundedSender<E>, wrap: fn(PollTick<T>) -> E) -> PollerHandle
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    let cancellation_token = CancellationToken::new();
    let loop_token = cancellation_token.clone();
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(schedule.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let in_flight = Arc::new(AtomicBool::new(false));
        let mut seq = 0u64;
        loop {
            tokio::select! {
                _ = loop_token.cancelled() => break,
                _ = ticker.tick() => {
                    if sender.is_closed() {
                        break;
                    }
                    seq += 1;
                    if schedule.overlap == OverlapPolicy::Skip && in_flight.load(Ordering::Acquire) {
                        debug!(poller = schedule.name, seq, "previous tick still in flight; skipping");
                        continue;
                    }
                    trace!(poller = schedule.name, seq, "tick");
                    in_flight.store(true, Ordering::Release);
                    let request = fetch();
                    let sender = sender.clone();
                    let in_flight = Arc::clone(&in_flight);
                    let token = loop_token.child_token();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => {}
                            result = request => {
                                in_flight.store(false, Ordering::Release);
                                let _ = sender.send(wrap(PollTick { seq, result }));
                            }
                        }
                    });
                }
            }
        }
    });
    PollerHandle {
        name: schedule.name,
        cancellation_token,
        handle,
    }
}

/// The metrics and roster pollers of one console session.
#[derive(Debug)]
pub struct ConsolePollers {
    metrics: PollerHandle,
    roster: PollerHandle,
}

impl ConsolePollers {
    /// Start both pollers with the intervals and overlap policy of `config`.
    pub fn start(api: Arc<dyn ConsoleApi>, config: &ConsoleConfig, sender: UnboundedSender<PollEvent>) -> Self {
        let metrics_api = Arc::clone(&api);
        let metrics = spawn_poller(
            PollSchedule {
                name: "metrics",
                interval: config.metrics_interval(),
                overlap: config.overlap_policy,
            },
            move || {
                let api = Arc::clone(&metrics_api);
                async move { api.fetch_system_data().await }
            },
            sender.clone(),
            PollEvent::Metrics,
        );
        let roster = spawn_poller(
            PollSchedule {
                name: "roster",
                interval: config.roster_interval(),
                overlap: config.overlap_policy,
            },
            move || {
                let api = Arc::clone(&api);
                async move { api.fetch_roster().await }
            },
            sender,
            PollEvent::Roster,
        );
        Self { metrics, roster }
    }

    /// Stop both pollers. Both are cancelled before either is joined.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.metrics.cancel();
        self.roster.cancel();
        let metrics = self.metrics.join().await;
        let roster = self.roster.join().await;
        metrics.and(roster)
    }
}
