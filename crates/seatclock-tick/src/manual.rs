//! Hand-driven tick source.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::trace;

use crate::{TickInfo, TickSource};

/// A [`TickSource`] whose ticks come from a [`ManualTickTrigger`].
///
/// Ticks fired while stopped are thrown away on the next `start`, so a
/// stopped clock never sees a tick that was meant for a different run.
#[derive(Debug)]
pub struct ManualTicker {
    receiver: mpsc::UnboundedReceiver<()>,
    running: bool,
    tick_count: u64,
}

/// Fires ticks into a [`ManualTicker`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ManualTickTrigger {
    sender: mpsc::UnboundedSender<()>,
}

impl ManualTicker {
    /// Creates a stopped ticker and the trigger that drives it.
    pub fn new() -> (Self, ManualTickTrigger) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let ticker = Self {
            receiver,
            running: false,
            tick_count: 0,
        };
        (ticker, ManualTickTrigger { sender })
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl ManualTickTrigger {
    /// Fires one tick. Returns `false` once the ticker is gone.
    pub fn fire(&self) -> bool {
        self.sender.send(()).is_ok()
    }

    /// Fires `count` ticks. Returns `false` once the ticker is gone.
    pub fn fire_many(&self, count: usize) -> bool {
        (0..count).all(|_| self.fire())
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self) {
        if self.running {
            return;
        }
        let mut discarded = 0usize;
        while self.receiver.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            trace!(discarded, "dropped ticks fired while stopped");
        }
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    async fn next_tick(&mut self) -> TickInfo {
        if !self.running {
            return std::future::pending().await;
        }
        match self.receiver.recv().await {
            Some(()) => {
                self.tick_count += 1;
                TickInfo {
                    tick: self.tick_count,
                    dt: Duration::from_secs(1),
                    overrun: false,
                    ticks_skipped: 0,
                }
            }
            // Every trigger dropped: no more ticks will ever come.
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fired_tick_is_delivered_while_running() {
        let (mut ticker, trigger) = ManualTicker::new();
        ticker.start();
        assert!(trigger.fire());
        let info = ticker.next_tick().await;
        assert_eq!(info.tick, 1);
        assert_eq!(ticker.tick_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_ticker_pends() {
        let (mut ticker, trigger) = ManualTicker::new();
        trigger.fire();
        let result =
            tokio::time::timeout(Duration::from_secs(5), ticker.next_tick()).await;
        assert!(result.is_err(), "stopped ticker should pend");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_fired_while_stopped_are_discarded() {
        let (mut ticker, trigger) = ManualTicker::new();
        trigger.fire_many(3);
        ticker.start();
        let result =
            tokio::time::timeout(Duration::from_secs(5), ticker.next_tick()).await;
        assert!(result.is_err(), "stale ticks should have been dropped");

        trigger.fire();
        assert_eq!(ticker.next_tick().await.tick, 1);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (mut ticker, trigger) = ManualTicker::new();
        ticker.start();
        trigger.fire();
        // A second start must not swallow the pending tick.
        ticker.start();
        assert!(ticker.is_running());
        assert_eq!(ticker.next_tick().await.tick, 1);
    }

    #[test]
    fn test_fire_after_ticker_dropped() {
        let (ticker, trigger) = ManualTicker::new();
        drop(ticker);
        assert!(!trigger.fire());
        assert!(!trigger.fire_many(2));
    }
}
