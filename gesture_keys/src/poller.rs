//! Fixed-interval sampling of the gesture state.

use std::time::{Duration, Instant};

use crate::decision::{decide, Decision};
use crate::state::GestureState;

/// Holds the baseline and the start of the current window.
///
/// Feed it every frame; it answers once the window has run its course.
/// There is no catch-up: a long frame simply makes that window longer.
#[derive(Clone, Debug)]
pub struct GesturePoller {
    interval:     Duration,
    window_start: Instant,
    previous:     GestureState,
    windows:      u64,
}

impl GesturePoller {
    pub fn new(interval: Duration, start: Instant) -> Self {
        GesturePoller {
            interval,
            window_start: start,
            previous: GestureState::default(),
            windows: 0,
        }
    }

    /// Sample `current` at `now`.
    ///
    /// Returns `None` mid-window.  Once `now - window_start >= interval`
    /// the table is evaluated against the baseline, the baseline becomes
    /// `current` whether or not anything fired, and a new window opens at
    /// `now`.
    pub fn sample(&mut self, now: Instant, current: GestureState) -> Option<Decision> {
        if now.saturating_duration_since(self.window_start) < self.interval {
            return None;
        }
        let decision = decide(&self.previous, &current);
        log::debug!(
            "window {} closed: {} -> {} {:?}",
            self.windows, self.previous, current, decision.actions()
        );
        self.previous = current;
        self.window_start = now;
        self.windows += 1;
        Some(decision)
    }

    pub fn baseline(&self) -> GestureState { self.previous }

    pub fn interval(&self) -> Duration { self.interval }

    /// Windows completed so far.
    pub fn windows(&self) -> u64 { self.windows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::GestureAction;

    const SEC: Duration = Duration::from_secs(1);

    fn thumbs_up() -> GestureState {
        GestureState { left_thumb_up: true, right_thumb_up: true, ..GestureState::default() }
    }

    #[test]
    fn nothing_happens_mid_window() {
        let t0 = Instant::now();
        let mut p = GesturePoller::new(SEC, t0);
        for ms in [0, 10, 500, 999] {
            assert!(p.sample(t0 + Duration::from_millis(ms), thumbs_up()).is_none());
        }
        assert_eq!(p.baseline(), GestureState::default());
        assert_eq!(p.windows(), 0);
    }

    #[test]
    fn baseline_updates_once_per_window() {
        let t0 = Instant::now();
        let mut p = GesturePoller::new(SEC, t0);

        assert!(p.sample(t0 + SEC, thumbs_up()).is_some());
        assert_eq!(p.baseline(), thumbs_up());
        assert_eq!(p.windows(), 1);

        // mid-window samples with a different state leave the baseline alone
        for ms in [1100, 1500, 1999] {
            assert!(p.sample(t0 + Duration::from_millis(ms), GestureState::default()).is_none());
            assert_eq!(p.baseline(), thumbs_up());
        }

        let d = p.sample(t0 + 2 * SEC, GestureState::default()).unwrap();
        assert_eq!(d.primary, Some(GestureAction::Rotate));
        assert_eq!(p.baseline(), GestureState::default());
        assert_eq!(p.windows(), 2);
    }

    #[test]
    fn baseline_overwritten_even_without_action() {
        let t0 = Instant::now();
        let mut p = GesturePoller::new(SEC, t0);
        let open = GestureState { left_index_open: true, ..GestureState::default() };
        let d = p.sample(t0 + SEC, open).unwrap();
        assert!(d.is_empty());
        assert_eq!(p.baseline(), open);
    }

    #[test]
    fn only_the_window_end_state_counts() {
        // thumbs drop mid-window and come back before it closes: no event
        let t0 = Instant::now();
        let mut p = GesturePoller::new(SEC, t0);
        p.sample(t0 + SEC, thumbs_up());
        p.sample(t0 + Duration::from_millis(1400), GestureState::default());
        let d = p.sample(t0 + 2 * SEC, thumbs_up()).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn late_frame_does_not_catch_up() {
        let t0 = Instant::now();
        let mut p = GesturePoller::new(SEC, t0);
        assert!(p.sample(t0 + 5 * SEC, thumbs_up()).is_some());
        assert_eq!(p.windows(), 1);
        // the next window is measured from the late sample
        assert!(p.sample(t0 + Duration::from_millis(5900), GestureState::default()).is_none());
        assert!(p.sample(t0 + 6 * SEC, GestureState::default()).is_some());
    }
}
