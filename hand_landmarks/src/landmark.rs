//! Landmark ids, the fingertip table and the hand skeleton.

use serde::{Deserialize, Serialize};

/// Points per detected hand.
pub const NUM_LANDMARKS: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Fingertip ids, thumb first.
pub const TIP_IDS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Skeleton edges drawn between landmarks.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// Detector output: `x`/`y` normalized to the image, `z` relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        NormalizedLandmark { x, y, z: 0.0 }
    }

    /// Pixel position in a `width × height` image, truncated toward zero.
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        ((self.x * width as f32) as i32, (self.y * height as f32) as i32)
    }
}

/// One landmark in pixel coordinates, tagged with its anatomical id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Landmark {
    pub id: usize,
    pub x:  i32,
    pub y:  i32,
}

impl Landmark {
    pub fn new(id: usize, x: i32, y: i32) -> Self {
        Landmark { id, x, y }
    }
}

/// Look up a landmark by id in a pixel list.
///
/// Lists produced by the tracker are ordered by id, so the fast path is a
/// direct index; anything else falls back to a scan.
pub fn by_id(lms: &[Landmark], id: usize) -> Option<&Landmark> {
    match lms.get(id) {
        Some(lm) if lm.id == id => Some(lm),
        _ => lms.iter().find(|lm| lm.id == id),
    }
}
