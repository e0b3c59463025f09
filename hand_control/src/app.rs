//! The run loops.
//!
//! [`Controller`] owns everything between a captured frame and the keys it
//! produces; [`run`] feeds it from a [`FrameSource`](crate::source::FrameSource)
//! and shows the result in the [`Visualizer`].

use std::fmt;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;

use gesture_keys::{dispatch, GestureAction, GesturePoller, GestureState, KeyBindings, KeySink, LogSink};
use hand_landmarks::fingers::count_fingers;
use hand_landmarks::{Frame, HandTracker};

use crate::config::AppConfig;
use crate::detect::{open_detector, SimInput};
use crate::keyboard::open_key_sink;
use crate::source::open_source;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Draw detected hands.
    Track,
    /// Also show the four finger states.
    Fingers,
    /// Also turn finger transitions into key presses.
    #[default]
    Play,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Track   => "track",
            Mode::Fingers => "fingers",
            Mode::Play    => "play",
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FpsCounter
// ════════════════════════════════════════════════════════════════════════════

/// Instantaneous frame rate from the gap between consecutive frames.
#[derive(Clone, Debug, Default)]
pub struct FpsCounter {
    last: Option<Instant>,
    fps:  f32,
}

impl FpsCounter {
    pub fn tick(&mut self, now: Instant) -> f32 {
        if let Some(last) = self.last {
            let dt = now.saturating_duration_since(last);
            self.fps = if dt.is_zero() { 0.0 } else { 1.0 / dt.as_secs_f32() };
        }
        self.last = Some(now);
        self.fps
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Controller
// ════════════════════════════════════════════════════════════════════════════

/// What one iteration produced.
#[derive(Clone, Debug)]
pub struct StepOutput {
    /// The input frame, annotated when drawing is on.
    pub frame:   Frame,
    pub fps:     f32,
    pub hands:   usize,
    /// Finger booleans; `None` in `track` mode.
    pub state:   Option<GestureState>,
    /// Extended fingers on hand 0 and hand 1.
    pub fingers: [usize; 2],
    /// Actions sent this iteration, group one first.
    pub actions: Vec<GestureAction>,
}

pub struct Controller {
    mode:         Mode,
    tracker:      HandTracker,
    poller:       GesturePoller,
    bindings:     KeyBindings,
    sink:         Box<dyn KeySink>,
    draw:         bool,
    fps:          FpsCounter,
    last_actions: Vec<GestureAction>,
}

impl Controller {
    /// `start` opens the first gesture window.
    pub fn new(
        mode: Mode,
        tracker: HandTracker,
        sink: Box<dyn KeySink>,
        bindings: KeyBindings,
        interval: Duration,
        draw: bool,
        start: Instant,
    ) -> Self {
        Controller {
            mode,
            tracker,
            poller: GesturePoller::new(interval, start),
            bindings,
            sink,
            draw,
            fps: FpsCounter::default(),
            last_actions: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn poller(&self) -> &GesturePoller { &self.poller }

    /// Most recent non-empty set of actions.
    pub fn last_actions(&self) -> &[GestureAction] { &self.last_actions }

    /// One iteration at time `now`: detect, derive finger states and, in
    /// `play` mode, sample the poller and press the resulting keys.
    pub fn step(&mut self, now: Instant, frame: &Frame) -> Result<StepOutput> {
        let fps = self.fps.tick(now);
        let mut out = self.tracker.find_hands(frame, self.draw)?;
        let hands = self.tracker.hand_count();

        if self.mode == Mode::Track {
            return Ok(StepOutput { frame: out, fps, hands, state: None, fingers: [0, 0], actions: Vec::new() });
        }

        let left = self.tracker.find_position(0, &mut out, false);
        let right = self.tracker.find_position(1, &mut out, false);
        let state = GestureState::from_hands(&left, &right);
        let fingers = [count_fingers(&left), count_fingers(&right)];

        let mut actions = Vec::new();
        if self.mode == Mode::Play {
            if let Some(decision) = self.poller.sample(now, state) {
                actions = dispatch(&decision, &self.bindings, self.sink.as_mut())?;
                if !actions.is_empty() {
                    self.last_actions = actions.clone();
                }
            }
        }

        Ok(StepOutput { frame: out, fps, hands, state: Some(state), fingers, actions })
    }

    /// Status bar text for `out`; the last line is the key legend.
    pub fn status_lines(&self, out: &StepOutput, sim: bool) -> Vec<String> {
        let mut lines = vec![format!("{}  fps {:.0}  hands {}", self.mode, out.fps, out.hands)];
        if let Some(state) = out.state {
            lines.push(format!("{}  fingers {}|{}", state, out.fingers[0], out.fingers[1]));
        }
        if self.mode == Mode::Play {
            let last = if self.last_actions.is_empty() {
                "none".to_string()
            } else {
                self.last_actions.iter().map(|a| a.name()).collect::<Vec<_>>().join("+")
            };
            lines.push(format!("window {}  last > {}", self.poller.windows(), last));
        }
        lines.push(if sim {
            "A/S left thumb/index  K/L right index/thumb  H hands  F all  Q quit".to_string()
        } else {
            "Q quit".to_string()
        });
        lines
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the application until the source ends or the user quits.
///
/// The window is opened on the first frame, sized to it.  Capture failure
/// and source exhaustion end the loop cleanly; detector and key-delivery
/// errors are returned.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Sim input channel (window → simulated detector) ──────────────────
    let sim = cfg.detector.is_sim();
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut sim_tx = sim.then_some(sim_tx);

    let detector = open_detector(&cfg.detector, &cfg.detector_config, Some(sim_rx))?;
    let tracker = HandTracker::new(detector, cfg.detector_config.clone());
    let mut source = open_source(&cfg.source)?;
    log::info!("reading frames from {}", source.describe());

    let sink: Box<dyn KeySink> = match cfg.mode {
        Mode::Play => open_key_sink(cfg.dry_run),
        Mode::Track | Mode::Fingers => Box::new(LogSink),
    };
    let mut controller = Controller::new(
        cfg.mode,
        tracker,
        sink,
        cfg.keys.clone(),
        cfg.interval,
        cfg.draw,
        Instant::now(),
    );

    let mut window: Option<Visualizer> = None;

    // ── Main loop ─────────────────────────────────────────────────────────
    loop {
        if let Some(vis) = window.as_mut() {
            if !vis.poll_input() {
                log::info!("quit requested");
                break;
            }
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("source exhausted: {}", source.describe());
                break;
            }
            Err(e) => {
                log::error!("frame capture failed: {:#}", e);
                break;
            }
        };

        let out = controller.step(Instant::now(), &frame)?;
        if let Some(state) = out.state {
            log::trace!("{}", state);
        }

        let status = controller.status_lines(&out, sim);
        if window.is_none() {
            window = Some(Visualizer::new(out.frame.width, out.frame.height, sim_tx.take())?);
        }
        if let Some(vis) = window.as_mut() {
            vis.render(&out.frame, &status)?;
        }
    }

    log::info!("stopped after {} gesture windows", controller.poller().windows());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gesture_keys::KeyCode;
    use hand_landmarks::DetectorConfig;

    use super::*;
    use crate::detect::{SimDetector, SimKey};

    /// Sink whose presses the test can still read after the controller
    /// takes ownership.
    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<KeyCode>>>);

    impl KeySink for SharedSink {
        fn press(&mut self, key: KeyCode) -> Result<()> {
            self.0.borrow_mut().push(key);
            Ok(())
        }
    }

    fn controller(mode: Mode, start: Instant) -> (mpsc::Sender<SimInput>, SharedSink, Controller) {
        let (tx, rx) = mpsc::channel();
        let tracker = HandTracker::new(Box::new(SimDetector::new(rx)), DetectorConfig::default());
        let sink = SharedSink::default();
        let c = Controller::new(
            mode,
            tracker,
            Box::new(sink.clone()),
            KeyBindings::default(),
            Duration::from_secs(1),
            true,
            start,
        );
        (tx, sink, c)
    }

    fn secs(start: Instant, s: f32) -> Instant { start + Duration::from_secs_f32(s) }

    #[test]
    fn track_mode_has_no_finger_state() {
        let t0 = Instant::now();
        let (_tx, _sink, mut c) = controller(Mode::Track, t0);
        let out = c.step(t0, &Frame::blank(320, 240)).unwrap();
        assert_eq!(out.hands, 2);
        assert!(out.state.is_none());
        assert_ne!(out.frame, Frame::blank(320, 240));
    }

    #[test]
    fn fingers_mode_never_presses_keys() {
        let t0 = Instant::now();
        let (tx, sink, mut c) = controller(Mode::Fingers, t0);
        c.step(t0, &Frame::blank(320, 240)).unwrap();
        tx.send(SimInput::Toggle(SimKey::All)).unwrap();
        let out = c.step(secs(t0, 2.0), &Frame::blank(320, 240)).unwrap();
        assert_eq!(out.state, Some(GestureState::default()));
        assert!(out.actions.is_empty());
        assert!(sink.0.borrow().is_empty());
    }

    #[test]
    fn play_mode_rotates_once_per_window() {
        let t0 = Instant::now();
        let (tx, sink, mut c) = controller(Mode::Play, t0);
        let frame = Frame::blank(320, 240);

        // first window: everything up becomes the baseline
        c.step(secs(t0, 1.0), &frame).unwrap();
        tx.send(SimInput::Toggle(SimKey::LeftThumb)).unwrap();
        tx.send(SimInput::Toggle(SimKey::RightThumb)).unwrap();

        // mid-window: no decision
        let out = c.step(secs(t0, 1.5), &frame).unwrap();
        assert!(out.actions.is_empty());

        let out = c.step(secs(t0, 2.0), &frame).unwrap();
        assert_eq!(out.actions, vec![GestureAction::Rotate]);
        assert_eq!(*sink.0.borrow(), vec![KeyCode::Up]);
        assert_eq!(c.last_actions(), &[GestureAction::Rotate]);
        assert_eq!(c.poller().windows(), 2);
    }

    #[test]
    fn all_down_sends_group_one_then_hard_drop() {
        let t0 = Instant::now();
        let (tx, sink, mut c) = controller(Mode::Play, t0);
        let frame = Frame::blank(320, 240);
        c.step(secs(t0, 1.0), &frame).unwrap();
        tx.send(SimInput::Toggle(SimKey::All)).unwrap();
        let out = c.step(secs(t0, 2.0), &frame).unwrap();
        assert_eq!(out.actions, vec![GestureAction::Rotate, GestureAction::HardDrop]);
        assert_eq!(*sink.0.borrow(), vec![KeyCode::Up, KeyCode::Space]);
    }

    #[test]
    fn status_lines_end_with_legend() {
        let t0 = Instant::now();
        let (_tx, _sink, mut c) = controller(Mode::Play, t0);
        let out = c.step(t0, &Frame::blank(320, 240)).unwrap();
        let lines = c.status_lines(&out, true);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("play"));
        assert!(lines[1].contains("thumb 11 index 11"));
        assert!(lines[2].contains("last > none"));
        assert!(lines[3].contains("Q quit"));
    }

    #[test]
    fn fps_counts_from_frame_gap() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::default();
        assert_eq!(fps.tick(t0), 0.0);
        let f = fps.tick(t0 + Duration::from_millis(40));
        assert!((f - 25.0).abs() < 0.1);
    }
}
