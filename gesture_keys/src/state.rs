//! The four booleans the decision table reads.

use std::fmt;

use hand_landmarks::fingers::{index_open, thumb_up};
use hand_landmarks::Landmark;

/// Finger states of the two hands.  Hand 0 in the detector's list is
/// "left" and hand 1 is "right"; nothing tracks identity across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GestureState {
    pub left_thumb_up:    bool,
    pub right_thumb_up:   bool,
    pub left_index_open:  bool,
    pub right_index_open: bool,
}

impl GestureState {
    /// Derive the state from both hands' pixel landmarks.  An empty list
    /// (hand not detected) contributes `false` for both of its fingers.
    pub fn from_hands(left: &[Landmark], right: &[Landmark]) -> Self {
        GestureState {
            left_thumb_up:    thumb_up(left),
            right_thumb_up:   thumb_up(right),
            left_index_open:  index_open(left),
            right_index_open: index_open(right),
        }
    }

    pub fn all(value: bool) -> Self {
        GestureState {
            left_thumb_up:    value,
            right_thumb_up:   value,
            left_index_open:  value,
            right_index_open: value,
        }
    }

    fn as_array(&self) -> [bool; 4] {
        [self.left_thumb_up, self.right_thumb_up, self.left_index_open, self.right_index_open]
    }

    pub fn all_true(&self)  -> bool { self.as_array().iter().all(|&b| b) }
    pub fn all_false(&self) -> bool { self.as_array().iter().all(|&b| !b) }
}

impl fmt::Display for GestureState {
    /// Compact `thumbs L/R index L/R` summary, `1` = up/open.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = |v: bool| if v { '1' } else { '0' };
        write!(
            f,
            "thumb {}{} index {}{}",
            b(self.left_thumb_up),
            b(self.right_thumb_up),
            b(self.left_index_open),
            b(self.right_index_open),
        )
    }
}
