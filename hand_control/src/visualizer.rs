//! Software-rendered preview window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │                                      │
//! │  camera frame + hand overlay         │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │  status bar (fps, fingers, actions)  │
//! └──────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use hand_landmarks::Frame;

use crate::detect::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WINDOW_TITLE: &str = "Hand Tracking";
pub const STATUS_LINES: usize = 4;
const GLYPH_SCALE:  usize = 2;
const LINE_H:       usize = 5 * GLYPH_SCALE + 4;
const STATUS_H:     usize = STATUS_LINES * LINE_H + 6;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const STATUS_BG:    u32   = 0xFF0F3460;
const TEXT_COLOR:   u32   = 0xFFEEEEEE;
const LEGEND_COLOR: u32   = 0xFF888888;

// ════════════════════════════════════════════════════════════════════════════
// Canvas: the pixel buffer, kept apart from the window for testing
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    width:   usize,
    height:  usize,
    buf:     Vec<u32>,
    scratch: Vec<u32>,
}

impl Canvas {
    /// A canvas for `frame_w × frame_h` frames plus the status bar.
    pub fn new(frame_w: usize, frame_h: usize) -> Self {
        let height = frame_h + STATUS_H;
        Canvas { width: frame_w, height, buf: vec![BG_COLOR; frame_w * height], scratch: Vec::new() }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn buffer(&self) -> &[u32] { &self.buf }

    fn status_y(&self) -> usize { self.height - STATUS_H }

    /// Draw the frame and status lines.  The last line is drawn dimmed, as
    /// a key legend.
    pub fn paint(&mut self, frame: &Frame, status: &[String]) {
        self.buf.fill(BG_COLOR);
        self.blit_frame(frame);

        // ── Status bar ────────────────────────────────────────────────────
        let sy = self.status_y();
        self.fill_rect(0, sy, self.width, STATUS_H, STATUS_BG);
        let shown = status.len().min(STATUS_LINES);
        for (i, line) in status.iter().take(shown).enumerate() {
            let color = if i + 1 == shown && shown > 1 { LEGEND_COLOR } else { TEXT_COLOR };
            self.draw_label(line, 8, sy + 4 + i * LINE_H, color);
        }
    }

    fn blit_frame(&mut self, frame: &Frame) {
        let mut argb = std::mem::take(&mut self.scratch);
        frame.to_argb(&mut argb);
        let fw = frame.width as usize;
        let rows = (frame.height as usize).min(self.status_y());
        let cols = fw.min(self.width);
        for row in 0..rows {
            let src = &argb[row * fw..row * fw + cols];
            let dst = &mut self.buf[row * self.width..row * self.width + cols];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = 0xFF00_0000 | s;
            }
        }
        self.scratch = argb;
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// 3×5 bitmap font, scaled up by `GLYPH_SCALE`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let advance = 4 * GLYPH_SCALE;
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.width { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for dy in 0..GLYPH_SCALE {
                        for dx in 0..GLYPH_SCALE {
                            self.set_pixel(
                                cx + col * GLYPH_SCALE + dx,
                                y + row * GLYPH_SCALE + dy,
                                color,
                            );
                        }
                    }
                }
            }
            cx += advance;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    /// Open a window sized for `frame_w × frame_h` frames.  `sim_tx`
    /// receives the simulated-hand keys when present.
    pub fn new(frame_w: u32, frame_h: u32, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let canvas = Canvas::new(frame_w as usize, frame_h as usize);
        let mut window = Window::new(
            WINDOW_TITLE,
            canvas.width(), canvas.height(),
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("failed to open window: {}", e))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window, canvas, sim_tx })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard input.  Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Escape) || one_shot(Key::Q) {
            return false;
        }

        if let Some(tx) = &self.sim_tx {
            for (key, sim) in [
                (Key::A, SimKey::LeftThumb),
                (Key::S, SimKey::LeftIndex),
                (Key::K, SimKey::RightIndex),
                (Key::L, SimKey::RightThumb),
                (Key::H, SimKey::Hands),
                (Key::F, SimKey::All),
            ] {
                if one_shot(key) {
                    let _ = tx.send(SimInput::Toggle(sim));
                }
            }
        }
        true
    }

    /// Render one frame with its status lines.
    pub fn render(&mut self, frame: &Frame, status: &[String]) -> Result<()> {
        self.canvas.paint(frame, status);
        self.window
            .update_with_buffer(self.canvas.buffer(), self.canvas.width(), self.canvas.height())
            .map_err(|e| anyhow!("window update failed: {}", e))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
