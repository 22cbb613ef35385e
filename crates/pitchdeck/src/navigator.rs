use std::time::Duration;

use crate::clock::{Clock, DebounceLock};

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(1000);

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { from: usize, to: usize },
    /// A previous move is still settling.
    Blocked,
    /// The clamped target is the slide already shown.
    Unchanged,
}

impl NavOutcome {
    pub fn moved(self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Owns the current slide index. Every accepted move engages a debounce lock
/// for `window`; requests made while it holds are dropped.
#[derive(Debug)]
pub struct SlideNavigator<C: Clock> {
    clock: C,
    slide_count: usize,
    current: usize,
    window: Duration,
    lock: DebounceLock,
}

impl<C: Clock> SlideNavigator<C> {
    /// `slide_count` must be at least one; decks are validated before they
    /// reach the navigator.
    pub fn new(clock: C, slide_count: usize, window: Duration) -> Self {
        Self {
            clock,
            slide_count: slide_count.max(1),
            current: 0,
            window,
            lock: DebounceLock::default(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn last_index(&self) -> usize {
        self.slide_count - 1
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.last_index()
    }

    /// True while a move is settling.
    pub fn is_transitioning(&mut self) -> bool {
        let now = self.clock.now();
        self.lock.is_engaged(now)
    }

    /// Fraction of the settle window that has elapsed, 1.0 when idle.
    pub fn settle_progress(&self) -> f32 {
        if self.window.is_zero() {
            return 1.0;
        }
        let remaining = self.lock.remaining(self.clock.now());
        1.0 - remaining.as_secs_f32() / self.window.as_secs_f32()
    }

    pub fn go_to(&mut self, target: isize) -> NavOutcome {
        let now = self.clock.now();
        if self.lock.is_engaged(now) {
            log::trace!("navigation to {target} blocked, transition in progress");
            return NavOutcome::Blocked;
        }
        let to = target.clamp(0, self.last_index() as isize) as usize;
        if to == self.current {
            return NavOutcome::Unchanged;
        }
        let from = self.current;
        self.current = to;
        self.lock.engage(now, self.window);
        log::debug!("slide {from} -> {to}");
        NavOutcome::Moved { from, to }
    }

    pub fn next(&mut self) -> NavOutcome {
        self.go_to(self.current as isize + 1)
    }

    pub fn previous(&mut self) -> NavOutcome {
        self.go_to(self.current as isize - 1)
    }

    /// Place the navigator on `index` (clamped) without engaging the lock.
    /// Used for the start slide.
    pub fn start_at(&mut self, index: usize) {
        self.current = index.min(self.last_index());
    }

    /// Adopt a new slide count (deck reload). The current index is clamped
    /// and the lock is left alone.
    pub fn set_slide_count(&mut self, slide_count: usize) {
        self.slide_count = slide_count.max(1);
        self.current = self.current.min(self.last_index());
    }

    /// Release a pending lock. Called on teardown.
    pub fn cancel(&mut self) {
        self.lock.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn navigator(count: usize) -> (SlideNavigator<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (
            SlideNavigator::new(clock.clone(), count, DEFAULT_TRANSITION),
            clock,
        )
    }

    #[test]
    fn test_go_to_clamps() {
        let (mut nav, clock) = navigator(15);
        assert_eq!(nav.go_to(20), NavOutcome::Moved { from: 0, to: 14 });
        assert_eq!(nav.current_index(), 14);
        clock.advance(DEFAULT_TRANSITION);
        nav.go_to(-3);
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let (mut nav, clock) = navigator(3);
        assert!(!nav.can_go_previous());
        assert_eq!(nav.previous(), NavOutcome::Unchanged);
        assert_eq!(nav.current_index(), 0);

        nav.go_to(2);
        clock.advance(DEFAULT_TRANSITION);
        assert!(!nav.can_go_next());
        assert_eq!(nav.next(), NavOutcome::Unchanged);
        assert_eq!(nav.current_index(), 2);
    }

    #[test]
    fn test_unchanged_does_not_lock() {
        let (mut nav, _clock) = navigator(5);
        assert_eq!(nav.go_to(0), NavOutcome::Unchanged);
        assert!(!nav.is_transitioning());
        assert!(nav.next().moved());
    }

    #[test]
    fn test_debounce_window() {
        let (mut nav, clock) = navigator(10);
        assert!(nav.go_to(3).moved());

        clock.advance(Duration::from_millis(999));
        assert_eq!(nav.go_to(7), NavOutcome::Blocked);
        assert_eq!(nav.current_index(), 3);

        clock.advance(Duration::from_millis(1));
        assert_eq!(nav.go_to(7), NavOutcome::Moved { from: 3, to: 7 });
    }

    #[test]
    fn test_cancel_releases_lock() {
        let (mut nav, _clock) = navigator(4);
        nav.next();
        assert!(nav.is_transitioning());
        nav.cancel();
        assert!(!nav.is_transitioning());
        assert_eq!(nav.next(), NavOutcome::Moved { from: 1, to: 2 });
    }

    #[test]
    fn test_settle_progress() {
        let (mut nav, clock) = navigator(4);
        assert_eq!(nav.settle_progress(), 1.0);
        nav.next();
        clock.advance(Duration::from_millis(250));
        assert!((nav.settle_progress() - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_start_at_does_not_lock() {
        let (mut nav, _clock) = navigator(5);
        nav.start_at(9);
        assert_eq!(nav.current_index(), 4);
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn test_shrinking_deck_clamps_index() {
        let (mut nav, _clock) = navigator(10);
        nav.go_to(9);
        nav.set_slide_count(4);
        assert_eq!(nav.current_index(), 3);
        assert_eq!(nav.slide_count(), 4);
    }
}
