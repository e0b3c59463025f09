//! # gesture_keys
//!
//! Turns two hands' finger states into at most a couple of key presses per
//! polling window.
//!
//! ## Decision table
//!
//! Evaluated once per window (default 1 s) against the state sampled at the
//! end of the previous window.  Only the first matching row of group one
//! fires; the hard-drop row is checked on its own.
//!
//! | Group | Previous window | This window | Action | Default key |
//! |---|---|---|---|---|
//! | 1 | both thumbs up | both thumbs down | [`GestureAction::Rotate`] | `Up` |
//! | 1 | left thumb up | left thumb down | [`GestureAction::MoveLeft`] | `Left` |
//! | 1 | right thumb up | right thumb down | [`GestureAction::MoveRight`] | `Right` |
//! | 1 | an index open | that index closed | [`GestureAction::SoftDrop`] | `Down` |
//! | 2 | all four true | all four false | [`GestureAction::HardDrop`] | `Space` |
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use gesture_keys::{GesturePoller, GestureState, KeyBindings, RecordingSink, dispatch};
//!
//! let t0 = Instant::now();
//! let mut poller = GesturePoller::new(Duration::from_secs(1), t0);
//! let mut sink = RecordingSink::default();
//!
//! let up   = GestureState { left_thumb_up: true, right_thumb_up: true, ..GestureState::default() };
//! let down = GestureState::default();
//!
//! poller.sample(t0 + Duration::from_secs(1), up);                // baseline = up
//! let d = poller.sample(t0 + Duration::from_secs(2), down).unwrap();
//! dispatch(&d, &KeyBindings::default(), &mut sink).unwrap();
//! assert_eq!(sink.pressed.len(), 1);
//! ```

pub mod decision;
pub mod keys;
pub mod poller;
pub mod state;

pub use decision::{decide, Decision, GestureAction};
pub use keys::{dispatch, KeyBindings, KeyCode, KeySink, LogSink, RecordingSink};
pub use poller::GesturePoller;
pub use state::GestureState;
