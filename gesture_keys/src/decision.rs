//! The transition table: previous window's state vs this window's.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::GestureState;

/// The five logical game actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureAction {
    Rotate,
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
}

impl GestureAction {
    pub fn all() -> [GestureAction; 5] {
        use GestureAction::*;
        [Rotate, MoveLeft, MoveRight, SoftDrop, HardDrop]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureAction::Rotate    => "rotate",
            GestureAction::MoveLeft  => "move-left",
            GestureAction::MoveRight => "move-right",
            GestureAction::SoftDrop  => "soft-drop",
            GestureAction::HardDrop  => "hard-drop",
        }
    }
}

impl fmt::Display for GestureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one window: at most one group-one action plus, independently,
/// a hard drop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    pub primary:   Option<GestureAction>,
    pub hard_drop: bool,
}

impl Decision {
    /// Actions in the order their keys are sent.
    pub fn actions(&self) -> Vec<GestureAction> {
        let mut out = Vec::with_capacity(2);
        out.extend(self.primary);
        if self.hard_drop {
            out.push(GestureAction::HardDrop);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && !self.hard_drop
    }
}

/// Apply the decision table.
pub fn decide(prev: &GestureState, cur: &GestureState) -> Decision {
    let fell = |was: bool, now: bool| was && !now;

    let primary = if prev.left_thumb_up && prev.right_thumb_up
        && !cur.left_thumb_up && !cur.right_thumb_up
    {
        Some(GestureAction::Rotate)
    } else if fell(prev.left_thumb_up, cur.left_thumb_up) {
        Some(GestureAction::MoveLeft)
    } else if fell(prev.right_thumb_up, cur.right_thumb_up) {
        Some(GestureAction::MoveRight)
    } else if fell(prev.left_index_open, cur.left_index_open)
        || fell(prev.right_index_open, cur.right_index_open)
    {
        Some(GestureAction::SoftDrop)
    } else {
        None
    };

    Decision {
        primary,
        hard_drop: prev.all_true() && cur.all_false(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(lt: bool, rt: bool, li: bool, ri: bool) -> GestureState {
        GestureState {
            left_thumb_up:    lt,
            right_thumb_up:   rt,
            left_index_open:  li,
            right_index_open: ri,
        }
    }

    #[test]
    fn both_thumbs_falling_is_rotate_only() {
        for (li, ri) in [(false, false), (true, true), (true, false)] {
            let d = decide(&st(true, true, li, ri), &st(false, false, li, ri));
            assert_eq!(d.primary, Some(GestureAction::Rotate));
            assert!(!d.hard_drop);
        }
    }

    #[test]
    fn rotate_beats_soft_drop() {
        let d = decide(&st(true, true, true, false), &st(false, false, false, false));
        assert_eq!(d.actions(), vec![GestureAction::Rotate]);
    }

    #[test]
    fn single_thumbs() {
        assert_eq!(
            decide(&st(true, false, false, false), &st(false, false, false, false)).primary,
            Some(GestureAction::MoveLeft)
        );
        assert_eq!(
            decide(&st(false, true, false, false), &st(false, false, false, false)).primary,
            Some(GestureAction::MoveRight)
        );
        // other thumb still up: only the fallen one counts
        assert_eq!(
            decide(&st(true, true, false, false), &st(true, false, false, false)).primary,
            Some(GestureAction::MoveRight)
        );
    }

    #[test]
    fn left_thumb_outranks_index() {
        let d = decide(&st(true, false, true, false), &st(false, false, false, false));
        assert_eq!(d.primary, Some(GestureAction::MoveLeft));
    }

    #[test]
    fn either_index_closing_is_soft_drop() {
        assert_eq!(
            decide(&st(false, false, true, false), &st(false, false, false, false)).primary,
            Some(GestureAction::SoftDrop)
        );
        assert_eq!(
            decide(&st(false, false, false, true), &st(false, false, false, false)).primary,
            Some(GestureAction::SoftDrop)
        );
        // opening is not an event
        assert!(decide(&st(false, false, false, false), &st(false, false, true, true)).is_empty());
    }

    #[test]
    fn all_four_falling_adds_hard_drop() {
        let d = decide(&GestureState::all(true), &GestureState::all(false));
        assert_eq!(d.primary, Some(GestureAction::Rotate));
        assert!(d.hard_drop);
        assert_eq!(d.actions(), vec![GestureAction::Rotate, GestureAction::HardDrop]);
    }

    #[test]
    fn hard_drop_needs_every_finger() {
        let d = decide(&st(true, true, true, false), &GestureState::all(false));
        assert!(!d.hard_drop);
        let d = decide(&GestureState::all(true), &st(false, false, false, true));
        assert!(!d.hard_drop);
    }

    #[test]
    fn steady_state_does_nothing() {
        for s in [GestureState::all(true), GestureState::all(false), st(true, false, true, false)] {
            assert!(decide(&s, &s).is_empty());
        }
    }
}
