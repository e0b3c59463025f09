//! # hand_control
//!
//! Webcam hand-gesture controller.  Frames come from a camera, a video
//! file or a synthetic source; an external detector finds up to two hands;
//! their finger states drive key presses for a falling-block game.
//!
//! ## Modes
//!
//! | Mode | What it does |
//! |---|---|
//! | `track` | detect hands, draw the skeleton, show it |
//! | `fingers` | `track` + the four finger booleans in the status bar |
//! | `play` | `fingers` + one decision per second, sent as key presses |
//!
//! ## Gesture → Key mapping (play mode)
//!
//! Hand 0 from the detector is "left", hand 1 is "right".
//!
//! | Gesture (previous second → this second) | Action | Key |
//! |---|---|---|
//! | Both thumbs up → both down | Rotate | `Up` |
//! | Left thumb up → down | Move left | `Left` |
//! | Right thumb up → down | Move right | `Right` |
//! | Either index open → closed | Soft drop | `Down` |
//! | All four up/open → all down/closed | Hard drop | `Space` |
//!
//! ## Feature flags
//!
//! * (default): simulated hands, synthetic frames, key presses logged only.
//! * `keyboard`: real key presses via `enigo`.
//! * `v4l2`: camera capture by device index (Linux).
//! * `ffmpeg`: video files.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `A` | Toggle left thumb |
//! | `S` | Toggle left index |
//! | `K` | Toggle right index |
//! | `L` | Toggle right thumb |
//! | `H` | Show / hide both hands |
//! | `F` | All four up, or all four down |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod config;
pub mod detect;
pub mod keyboard;
pub mod source;
pub mod visualizer;
