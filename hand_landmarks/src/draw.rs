//! Overlay drawing straight into a [`Frame`].

use crate::frame::Frame;
use crate::landmark::HAND_CONNECTIONS;

pub const POINT_COLOR:      (u8, u8, u8) = (255, 48, 48);
pub const CONNECTION_COLOR: (u8, u8, u8) = (224, 224, 224);
pub const MARK_COLOR:       (u8, u8, u8) = (255, 0, 255);

const POINT_RADIUS: i32 = 3;
const LINE_THICKNESS: i32 = 2;

/// Draw the hand skeleton: connections first, points on top.
pub fn draw_hand(frame: &mut Frame, points: &[(i32, i32)]) {
    for (a, b) in HAND_CONNECTIONS {
        if let (Some(&pa), Some(&pb)) = (points.get(a), points.get(b)) {
            draw_line(frame, pa, pb, LINE_THICKNESS, CONNECTION_COLOR);
        }
    }
    for &p in points {
        fill_circle(frame, p, POINT_RADIUS, POINT_COLOR);
    }
}

/// Bresenham line, thickened with a square brush.
pub fn draw_line(frame: &mut Frame, from: (i32, i32), to: (i32, i32), thickness: i32, rgb: (u8, u8, u8)) {
    let (mut x, mut y) = from;
    let dx =  (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let half = thickness.max(1) / 2;

    loop {
        for oy in -half..=half {
            for ox in -half..=half {
                frame.put_rgb(x + ox, y + oy, rgb);
            }
        }
        if x == to.0 && y == to.1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x += sx; }
        if e2 <= dx { err += dx; y += sy; }
    }
}

pub fn fill_circle(frame: &mut Frame, center: (i32, i32), radius: i32, rgb: (u8, u8, u8)) {
    let (cx, cy) = center;
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                frame.put_rgb(cx + dx, cy + dy, rgb);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_covers_both_endpoints() {
        let mut f = Frame::blank(10, 10);
        draw_line(&mut f, (1, 1), (8, 5), 1, (9, 9, 9));
        assert_eq!(f.rgb_at(1, 1), Some((9, 9, 9)));
        assert_eq!(f.rgb_at(8, 5), Some((9, 9, 9)));
        assert_eq!(f.rgb_at(8, 1), Some((0, 0, 0)));
    }

    #[test]
    fn circle_clips_at_edges() {
        let mut f = Frame::blank(4, 4);
        fill_circle(&mut f, (0, 0), 2, (1, 2, 3));
        assert_eq!(f.rgb_at(0, 0), Some((1, 2, 3)));
        assert_eq!(f.rgb_at(3, 3), Some((0, 0, 0)));
    }

    #[test]
    fn draw_hand_tolerates_short_lists() {
        let mut f = Frame::blank(20, 20);
        draw_hand(&mut f, &[(5, 5), (10, 10)]);
        assert_eq!(f.rgb_at(5, 5), Some(POINT_COLOR));
    }
}
