//! Tick source for Seatclock.
//!
//! The clock state machine doesn't own time; it is told "one second
//! passed" by a [`TickSource`]. This crate provides the port and two
//! implementations:
//!
//! - [`TickScheduler`]: a tokio-time interval (one second by default)
//!   with overrun handling and start/stop.
//! - [`ManualTicker`]: ticks fired by hand through a
//!   [`ManualTickTrigger`], for tests and for hosts that already have
//!   their own timer.
//!
//! # Single live timer
//!
//! `start` is idempotent: calling it on a running source does not arm a
//! second timer, so a seat can never be charged twice for one second.
//! `stop` takes effect immediately: [`TickSource::next_tick`] pends
//! forever until the next `start`.
//!
//! # Integration
//!
//! The source sits inside the session actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         _ = ticker.next_tick() => {
//!             machine.tick();
//!         }
//!     }
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

mod manual;

pub use manual::{ManualTickTrigger, ManualTicker};

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Something that delivers discrete tick events while started.
pub trait TickSource: Send + 'static {
    /// Arms the timer. No-op if already running.
    fn start(&mut self);

    /// Disarms the timer. No tick is delivered after this returns.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Resolves on the next tick. Pends forever while stopped.
    ///
    /// Must be cancel-safe: dropping the future before it resolves
    /// loses nothing, the next call waits for the same tick.
    fn next_tick(&mut self) -> impl Future<Output = TickInfo> + Send;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the runtime wakes the scheduler late.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPolicy {
    /// Drop the missed ticks and restart the cadence from now.
    Skip,
    /// Deliver missed ticks back to back, up to `max_catchup` of them.
    /// Further behind than that, behave like `Skip`.
    CatchUp {
        /// Cap on ticks delivered immediately after a stall.
        max_catchup: u32,
    },
    /// Keep the original cadence; the late tick counts as one.
    Drop,
}

impl Default for TickPolicy {
    /// Clocks should not silently lose seconds after a short stall.
    fn default() -> Self {
        Self::CatchUp { max_catchup: 5 }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks. Default: one second.
    pub interval: Duration,
    /// Overrun handling policy.
    pub policy: TickPolicy,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            policy: TickPolicy::default(),
        }
    }
}

impl TickConfig {
    /// Shortest interval accepted.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    /// Config for a specific interval with the default policy.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Raises the interval to [`Self::MIN_INTERVAL`] if it is shorter.
    ///
    /// Called automatically by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_us = self.interval.as_micros() as u64,
                "tick interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info and metrics
// ---------------------------------------------------------------------------

/// Information about a delivered tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// The fixed interval the tick stands for.
    pub dt: Duration,
    /// `true` if the tick fired noticeably late.
    pub overrun: bool,
    /// Ticks dropped because of the overrun (0 in normal operation).
    pub ticks_skipped: u64,
}

/// Running counters for a scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickMetrics {
    pub total_ticks: u64,
    pub total_overruns: u64,
    pub total_skipped: u64,
    /// Number of times the scheduler went from stopped to running.
    pub starts: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Tokio-time interval tick source.
///
/// Created stopped. The first tick after [`start`](Self::start) fires
/// one full interval later, so restarting a paused clock never charges a
/// partial second.
#[derive(Debug)]
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// Deadline of the next tick. `Some` exactly while running.
    next_tick: Option<Instant>,
    metrics: TickMetrics,
}

impl TickScheduler {
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            interval_ms = config.interval.as_millis() as u64,
            policy = ?config.policy,
            "tick scheduler created"
        );
        Self {
            config,
            tick_count: 0,
            next_tick: None,
            metrics: TickMetrics::default(),
        }
    }

    /// A one-second scheduler with the default policy.
    pub fn every_second() -> Self {
        Self::new(TickConfig::default())
    }

    pub fn start(&mut self) {
        if self.next_tick.is_some() {
            trace!(tick = self.tick_count, "start ignored, already running");
            return;
        }
        self.next_tick = Some(Instant::now() + self.config.interval);
        self.metrics.starts += 1;
        debug!(tick = self.tick_count, "tick scheduler started");
    }

    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(tick = self.tick_count, "tick scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Waits until the next tick is due.
    ///
    /// While stopped this future never resolves; inside `select!` the
    /// other branches keep being served.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            return std::future::pending().await;
        };
        let interval = self.config.interval;

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        // More than 10% of an interval late counts as an overrun.
        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval / 10;
        let behind = u64::try_from(late_by.as_nanos() / interval.as_nanos()).unwrap_or(u64::MAX);
        let mut ticks_skipped = 0u64;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun && behind > 0 {
                    ticks_skipped = behind;
                    warn!(
                        tick = self.tick_count,
                        skipped = ticks_skipped,
                        late_ms = late_by.as_millis() as u64,
                        "tick overrun, skipping ahead"
                    );
                }
                now + interval
            }
            TickPolicy::CatchUp { max_catchup } => {
                if behind > u64::from(max_catchup) {
                    ticks_skipped = behind;
                    warn!(
                        tick = self.tick_count,
                        behind,
                        max_catchup,
                        "tick overrun beyond catch-up cap, skipping ahead"
                    );
                    now + interval
                } else {
                    if behind > 0 {
                        debug!(tick = self.tick_count, behind, "catching up missed ticks");
                    }
                    next + interval
                }
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_millis() as u64,
                        "tick overrun, keeping original cadence"
                    );
                }
                next + interval
            }
        });

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += ticks_skipped;
        self.metrics.total_ticks += 1;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: interval,
            overrun,
            ticks_skipped,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn policy(&self) -> TickPolicy {
        self.config.policy
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::every_second()
    }
}

impl TickSource for TickScheduler {
    fn start(&mut self) {
        TickScheduler::start(self);
    }

    fn stop(&mut self) {
        TickScheduler::stop(self);
    }

    fn is_running(&self) -> bool {
        TickScheduler::is_running(self)
    }

    fn next_tick(&mut self) -> impl Future<Output = TickInfo> + Send {
        self.wait_for_tick()
    }
}
