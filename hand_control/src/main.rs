//! hand_control: command-line entry point.

use std::path::PathBuf;

use clap::Parser;

use hand_control::app::{run, Mode};
use hand_control::config::{AppConfig, Overrides};
use hand_control::detect::DetectorKind;
use hand_control::source::VideoSource;

#[derive(Debug, Parser)]
#[command(name = "hand_control", version, about = "Webcam hand-gesture controller")]
struct Cli {
    /// What to run
    #[arg(value_enum)]
    mode: Option<Mode>,

    /// Frame source: `stub`, `stub://WxH`, a camera index or a video file
    #[arg(long)]
    source: Option<VideoSource>,

    /// Hand detector: `sim`, `replay:PATH` or `bridge:CMD`
    #[arg(long)]
    detector: Option<DetectorKind>,

    #[arg(long)]
    max_hands: Option<usize>,

    #[arg(long)]
    detection_confidence: Option<f32>,

    #[arg(long)]
    tracking_confidence: Option<f32>,

    /// Detect every frame from scratch
    #[arg(long)]
    static_image_mode: bool,

    /// Gesture window length in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Log key presses instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Do not draw landmarks on the preview
    #[arg(long)]
    no_draw: bool,

    /// TOML configuration file
    #[arg(long, env = "HAND_CONTROL_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            mode:                 self.mode,
            source:               self.source.clone(),
            detector:             self.detector.clone(),
            max_hands:            self.max_hands,
            detection_confidence: self.detection_confidence,
            tracking_confidence:  self.tracking_confidence,
            static_image_mode:    self.static_image_mode,
            interval_ms:          self.interval_ms,
            dry_run:              self.dry_run,
            no_draw:              self.no_draw,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let cfg = match AppConfig::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             hand_control — Hand Gesture Controller           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Mode:     {}", cfg.mode);
    println!("  Source:   {}", cfg.source);
    println!("  Detector: {}", cfg.detector);
    if cfg.mode == Mode::Play {
        #[cfg(feature = "keyboard")]
        let keys = if cfg.dry_run { "logged (dry run)" } else { "sent to the focused window" };
        #[cfg(not(feature = "keyboard"))]
        let keys = "logged (build with --features keyboard to send them)";
        println!("  Keys:     {}", keys);
    }
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
