//! Integration tests for the interval tick scheduler.
//!
//! Uses tokio's paused clock so `sleep_until` resolves as soon as the
//! runtime is idle and the tests run without real delay.

use std::time::Duration;

use seatclock_tick::{TickConfig, TickPolicy, TickScheduler, TickSource};

// =========================================================================
// Helpers
// =========================================================================

fn running(config: TickConfig) -> TickScheduler {
    let mut s = TickScheduler::new(config);
    s.start();
    s
}

/// Paused-clock timings land on whole milliseconds; allow one of slack.
fn assert_elapsed(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(1);
    assert!(
        actual + slack >= expected && actual <= expected + slack,
        "elapsed {actual:?}, expected {expected:?}"
    );
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_default_config_is_one_second() {
    let cfg = TickConfig::default();
    assert_eq!(cfg.interval, Duration::from_secs(1));
    assert_eq!(cfg.policy, TickPolicy::CatchUp { max_catchup: 5 });
}

#[test]
fn test_interval_below_minimum_is_clamped() {
    let cfg = TickConfig::with_interval(Duration::ZERO).validated();
    assert_eq!(cfg.interval, TickConfig::MIN_INTERVAL);
}

// =========================================================================
// Creation and start/stop
// =========================================================================

#[test]
fn test_scheduler_starts_stopped() {
    let s = TickScheduler::every_second();
    assert!(!s.is_running());
    assert_eq!(s.tick_count(), 0);
    assert_eq!(s.interval(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_stopped_scheduler_never_fires() {
    let mut s = TickScheduler::every_second();
    let result = tokio::time::timeout(Duration::from_secs(10), s.wait_for_tick()).await;
    assert!(result.is_err(), "stopped scheduler should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_start_is_idempotent() {
    let mut s = running(TickConfig::default());
    tokio::time::advance(Duration::from_millis(600)).await;
    // A second start must not re-arm the deadline or add a second timer.
    s.start();
    assert_eq!(s.metrics().starts, 1);

    let before = tokio::time::Instant::now();
    s.wait_for_tick().await;
    assert_elapsed(before.elapsed(), Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_pending_tick() {
    let mut s = running(TickConfig::default());
    tokio::time::advance(Duration::from_millis(900)).await;
    s.stop();
    assert!(!s.is_running());

    let result = tokio::time::timeout(Duration::from_secs(5), s.wait_for_tick()).await;
    assert!(result.is_err(), "no tick may arrive after stop");
    assert_eq!(s.tick_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_waits_a_full_interval() {
    let mut s = running(TickConfig::default());
    s.wait_for_tick().await;
    s.stop();
    tokio::time::advance(Duration::from_millis(700)).await;
    s.start();

    let before = tokio::time::Instant::now();
    let info = s.wait_for_tick().await;
    assert_elapsed(before.elapsed(), Duration::from_secs(1));
    assert_eq!(info.tick, 2);
    assert_eq!(s.metrics().starts, 2);
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_ticks_increment_monotonically() {
    let mut s = running(TickConfig::default());
    for expected in 1..=5 {
        let info = s.wait_for_tick().await;
        assert_eq!(info.tick, expected);
        assert_eq!(info.dt, Duration::from_secs(1));
        assert!(!info.overrun);
    }
    assert_eq!(s.metrics().total_ticks, 5);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_wait_loses_nothing() {
    let mut s = running(TickConfig::default());
    // Abandon the wait halfway through, as a select! branch would.
    let result = tokio::time::timeout(Duration::from_millis(500), s.wait_for_tick()).await;
    assert!(result.is_err());

    let before = tokio::time::Instant::now();
    let info = s.wait_for_tick().await;
    assert_eq!(info.tick, 1);
    assert_elapsed(before.elapsed(), Duration::from_millis(500));
}

// =========================================================================
// Overrun policies
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_catch_up_delivers_missed_ticks() {
    let mut s = running(TickConfig::default());
    // Stall for 3.5 intervals before polling.
    tokio::time::advance(Duration::from_millis(3_500)).await;

    let first = s.wait_for_tick().await;
    assert!(first.overrun);
    assert_eq!(first.ticks_skipped, 0);

    // The missed ticks are due already and fire without waiting.
    let before = tokio::time::Instant::now();
    s.wait_for_tick().await;
    s.wait_for_tick().await;
    assert_elapsed(before.elapsed(), Duration::ZERO);
    assert_eq!(s.tick_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_catch_up_cap_falls_back_to_skip() {
    let mut s = running(TickConfig {
        policy: TickPolicy::CatchUp { max_catchup: 2 },
        ..TickConfig::default()
    });
    tokio::time::advance(Duration::from_millis(5_200)).await;

    let info = s.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 4);
    assert_eq!(s.metrics().total_skipped, 4);

    let before = tokio::time::Instant::now();
    s.wait_for_tick().await;
    assert_elapsed(before.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_skip_policy_restarts_cadence() {
    let mut s = running(TickConfig {
        policy: TickPolicy::Skip,
        ..TickConfig::default()
    });
    tokio::time::advance(Duration::from_millis(2_500)).await;

    let info = s.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 1);
    assert_eq!(s.metrics().total_overruns, 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_policy_keeps_cadence() {
    let mut s = running(TickConfig {
        policy: TickPolicy::Drop,
        ..TickConfig::default()
    });
    tokio::time::advance(Duration::from_millis(1_500)).await;

    let info = s.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 0);

    // Next deadline stays on the original 2s mark.
    let before = tokio::time::Instant::now();
    s.wait_for_tick().await;
    assert_elapsed(before.elapsed(), Duration::from_millis(500));
}

// =========================================================================
// Port usage
// =========================================================================

async fn drive<T: TickSource>(source: &mut T, ticks: u64) -> u64 {
    source.start();
    let mut last = 0;
    for _ in 0..ticks {
        last = source.next_tick().await.tick;
    }
    source.stop();
    last
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_through_port() {
    let mut s = TickScheduler::every_second();
    assert_eq!(drive(&mut s, 3).await, 3);
    assert!(!TickSource::is_running(&s));
}

#[tokio::test(start_paused = true)]
async fn test_select_loop_pattern() {
    let mut s = running(TickConfig::default());
    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(10);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(3_200)).await;
        tx.send("pause").await.ok();
    });

    let mut ticks_fired = 0u64;
    loop {
        tokio::select! {
            Some(cmd) = rx.recv() => {
                assert_eq!(cmd, "pause");
                s.stop();
                break;
            }
            info = s.wait_for_tick() => {
                ticks_fired += 1;
                assert_eq!(info.tick, ticks_fired);
            }
        }
    }

    assert_eq!(ticks_fired, 3);
    assert!(!s.is_running());
}
