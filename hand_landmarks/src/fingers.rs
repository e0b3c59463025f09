//! Finger-state predicates over a pixel landmark list.
//!
//! These are the camera's view of the hand: smaller `y` is higher on
//! screen, and the thumb rule assumes an unmirrored image of a hand held
//! palm-out.  Every function returns `false` for a list that lacks the
//! points it needs, which is what an absent hand looks like.

use crate::landmark::{by_id, Landmark, TIP_IDS};

/// Index fingertip above the joint two ids back (PIP).
pub fn index_open(lms: &[Landmark]) -> bool {
    finger_extended(lms, 1)
}

/// Thumb tip to the right of the joint before it (IP).
pub fn thumb_up(lms: &[Landmark]) -> bool {
    let tip = TIP_IDS[0];
    match (by_id(lms, tip), by_id(lms, tip - 1)) {
        (Some(t), Some(j)) => t.x > j.x,
        _ => false,
    }
}

/// Open/closed for all five fingers, thumb first.
pub fn fingers_up(lms: &[Landmark]) -> [bool; 5] {
    let mut up = [false; 5];
    up[0] = thumb_up(lms);
    for (finger, slot) in up.iter_mut().enumerate().skip(1) {
        *slot = finger_extended(lms, finger);
    }
    up
}

pub fn count_fingers(lms: &[Landmark]) -> usize {
    fingers_up(lms).iter().filter(|&&f| f).count()
}

fn finger_extended(lms: &[Landmark], finger: usize) -> bool {
    let tip = TIP_IDS[finger];
    match (by_id(lms, tip), by_id(lms, tip - 2)) {
        (Some(t), Some(j)) => t.y < j.y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 21 points on a horizontal line, then patch the ones under test.
    fn hand(patch: &[(usize, i32, i32)]) -> Vec<Landmark> {
        let mut lms: Vec<Landmark> = (0..21).map(|id| Landmark::new(id, 100, 100)).collect();
        for &(id, x, y) in patch {
            lms[id] = Landmark::new(id, x, y);
        }
        lms
    }

    #[test]
    fn empty_list_is_closed_and_down() {
        assert!(!index_open(&[]));
        assert!(!thumb_up(&[]));
        assert_eq!(fingers_up(&[]), [false; 5]);
    }

    #[test]
    fn index_open_requires_strictly_smaller_y() {
        assert!(index_open(&hand(&[(8, 100, 40), (6, 100, 80)])));
        assert!(!index_open(&hand(&[(8, 100, 80), (6, 100, 80)])));
        assert!(!index_open(&hand(&[(8, 100, 90), (6, 100, 80)])));
    }

    #[test]
    fn index_open_ignores_other_joints() {
        // DIP (7) above the tip does not matter, only PIP (6) does
        assert!(index_open(&hand(&[(8, 100, 50), (7, 100, 10), (6, 100, 60)])));
    }

    #[test]
    fn thumb_up_requires_strictly_greater_x() {
        assert!(thumb_up(&hand(&[(4, 150, 100), (3, 120, 100)])));
        assert!(!thumb_up(&hand(&[(4, 120, 100), (3, 120, 100)])));
        assert!(!thumb_up(&hand(&[(4, 90, 100), (3, 120, 100)])));
    }

    #[test]
    fn partial_list_is_false() {
        let only_tip = vec![Landmark::new(8, 0, 0)];
        assert!(!index_open(&only_tip));
    }

    #[test]
    fn fingers_up_counts_each_finger() {
        let lms = hand(&[
            (4, 130, 100), (3, 110, 100),   // thumb out
            (8, 100, 20),  (6, 100, 60),    // index up
            (12, 100, 90), (10, 100, 60),   // middle down
            (16, 100, 30), (14, 100, 60),   // ring up
        ]);
        assert_eq!(fingers_up(&lms), [true, true, false, true, false]);
        assert_eq!(count_fingers(&lms), 3);
    }
}
