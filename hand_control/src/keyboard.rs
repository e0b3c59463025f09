//! Key delivery to the focused window.

use gesture_keys::{KeySink, LogSink};

// ── enigo backend ─────────────────────────────────────────────────────────

#[cfg(feature = "keyboard")]
mod real {
    use anyhow::{anyhow, Result};
    use enigo::{Direction, Enigo, Key, Keyboard, Settings};

    use gesture_keys::{KeyCode, KeySink};

    /// Clicks keys through the OS input layer.
    pub struct EnigoSink {
        enigo: Enigo,
    }

    impl EnigoSink {
        pub fn new() -> Result<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| anyhow!("keyboard init failed: {:?}", e))?;
            Ok(EnigoSink { enigo })
        }
    }

    pub(crate) fn to_enigo(key: KeyCode) -> Key {
        match key {
            KeyCode::Up      => Key::UpArrow,
            KeyCode::Down    => Key::DownArrow,
            KeyCode::Left    => Key::LeftArrow,
            KeyCode::Right   => Key::RightArrow,
            KeyCode::Space   => Key::Space,
            KeyCode::Enter   => Key::Return,
            KeyCode::Char(c) => Key::Unicode(c),
        }
    }

    impl KeySink for EnigoSink {
        fn press(&mut self, key: KeyCode) -> Result<()> {
            self.enigo
                .key(to_enigo(key), Direction::Click)
                .map_err(|e| anyhow!("failed to press {}: {:?}", key, e))
        }
    }
}

#[cfg(feature = "keyboard")]
pub use real::EnigoSink;

// ════════════════════════════════════════════════════════════════════════════
// open_key_sink: real keys when possible, log otherwise
// ════════════════════════════════════════════════════════════════════════════

/// Pick the key sink.  Falls back to [`LogSink`] with a warning when real
/// key presses are unavailable.
pub fn open_key_sink(dry_run: bool) -> Box<dyn KeySink> {
    if dry_run {
        log::info!("dry run: key presses are logged, not sent");
        return Box::new(LogSink);
    }

    #[cfg(feature = "keyboard")]
    {
        match EnigoSink::new() {
            Ok(sink) => {
                log::info!("sending key presses to the focused window");
                return Box::new(sink);
            }
            Err(e) => log::warn!("{:#}; key presses will only be logged", e),
        }
    }

    #[cfg(not(feature = "keyboard"))]
    log::warn!("built without the `keyboard` feature; key presses will only be logged");

    Box::new(LogSink)
}
