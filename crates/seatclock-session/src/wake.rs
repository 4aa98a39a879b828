/// Keeps the display awake while the clock runs.
///
/// The session acquires it when the clock starts and releases it when
/// the clock stops, so implementations only see alternating calls.
/// Failures stay inside the implementation; a table clock that dims is
/// an annoyance, not an error.
pub trait WakeLock: Send + 'static {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// A [`WakeLock`] for hosts without a display to keep on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWakeLock;

impl WakeLock for NoWakeLock {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}
