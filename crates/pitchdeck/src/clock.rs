#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source. Readings are durations since an arbitrary,
/// fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A deadline on a [`Clock`] that, while pending, blocks whatever it guards.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebounceLock {
    until: Option<Duration>,
}

impl DebounceLock {
    pub fn engage(&mut self, now: Duration, window: Duration) {
        self.until = Some(now + window);
    }

    /// Whether the lock still holds at `now`. An expired deadline is cleared.
    pub fn is_engaged(&mut self, now: Duration) -> bool {
        match self.until {
            Some(until) if now < until => true,
            Some(_) => {
                self.until = None;
                false
            }
            None => false,
        }
    }

    /// Time left before the lock releases, zero when free.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.until
            .map(|until| until.saturating_sub(now))
            .unwrap_or_default()
    }

    pub fn cancel(&mut self) {
        self.until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(other.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_lock_expires_at_deadline() {
        let mut lock = DebounceLock::default();
        lock.engage(Duration::ZERO, Duration::from_millis(1000));
        assert!(lock.is_engaged(Duration::from_millis(999)));
        assert_eq!(
            lock.remaining(Duration::from_millis(400)),
            Duration::from_millis(600)
        );
        assert!(!lock.is_engaged(Duration::from_millis(1000)));
        assert_eq!(lock.remaining(Duration::from_millis(1000)), Duration::ZERO);
    }

    #[test]
    fn test_cancel_releases() {
        let mut lock = DebounceLock::default();
        lock.engage(Duration::ZERO, Duration::from_secs(5));
        lock.cancel();
        assert!(!lock.is_engaged(Duration::ZERO));
    }
}
