use std::time::{Duration, Instant};

/// Quadratic ease-in-out over `t` in [0, 1].
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Enter animation that restarts whenever its key changes. Used for the
/// slide fade-in (keyed by slide index) and the point detail (keyed by
/// slide and point).
#[derive(Debug, Clone)]
pub struct EnterAnimation<K: PartialEq + Copy> {
    key: Option<K>,
    /// `None` until the key first changes.
    start: Option<Instant>,
    duration: Duration,
}

impl<K: PartialEq + Copy> EnterAnimation<K> {
    pub fn new(duration: Duration) -> Self {
        Self {
            key: None,
            start: None,
            duration,
        }
    }

    /// Eased progress for `key`. The first key seen starts fully shown.
    pub fn progress(&mut self, key: K) -> f32 {
        self.progress_at(key, Instant::now())
    }

    fn progress_at(&mut self, key: K, now: Instant) -> f32 {
        match self.key {
            None => self.key = Some(key),
            Some(current) if current != key => {
                self.key = Some(key);
                self.start = Some(now);
            }
            Some(_) => {}
        }
        match self.start {
            Some(start) if !self.duration.is_zero() => {
                let elapsed = now.saturating_duration_since(start);
                ease_in_out(elapsed.as_secs_f32() / self.duration.as_secs_f32())
            }
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(3.0), 1.0);
    }

    #[test]
    fn test_first_key_is_fully_shown() {
        let mut anim = EnterAnimation::new(Duration::from_millis(400));
        assert_eq!(anim.progress_at(0usize, Instant::now()), 1.0);
    }

    #[test]
    fn test_key_change_restarts() {
        let mut anim = EnterAnimation::new(Duration::from_millis(400));
        let t0 = Instant::now();
        anim.progress_at(0usize, t0);
        assert_eq!(anim.progress_at(1, t0), 0.0);
        let halfway = anim.progress_at(1, t0 + Duration::from_millis(200));
        assert!((halfway - 0.5).abs() < 1e-4);
        assert_eq!(anim.progress_at(1, t0 + Duration::from_millis(400)), 1.0);
    }
}
