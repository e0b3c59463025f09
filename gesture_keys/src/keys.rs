//! Key bindings and the sink that delivers them.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::decision::{Decision, GestureAction};

// ════════════════════════════════════════════════════════════════════════════
// KeyCode
// ════════════════════════════════════════════════════════════════════════════

/// A logical key, independent of any input backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Char(char),
}

impl FromStr for KeyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Ok(match lower.as_str() {
            "up"    => KeyCode::Up,
            "down"  => KeyCode::Down,
            "left"  => KeyCode::Left,
            "right" => KeyCode::Right,
            "space" => KeyCode::Space,
            "enter" | "return" => KeyCode::Enter,
            _ => {
                let mut chars = s.trim().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(anyhow!("unknown key '{}'", s)),
                }
            }
        })
    }
}

impl TryFrom<String> for KeyCode {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<KeyCode> for String {
    fn from(k: KeyCode) -> String { k.to_string() }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Up      => f.write_str("up"),
            KeyCode::Down    => f.write_str("down"),
            KeyCode::Left    => f.write_str("left"),
            KeyCode::Right   => f.write_str("right"),
            KeyCode::Space   => f.write_str("space"),
            KeyCode::Enter   => f.write_str("enter"),
            KeyCode::Char(c) => write!(f, "{}", c),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyBindings
// ════════════════════════════════════════════════════════════════════════════

/// Which key each action presses.  Defaults suit most Tetris clones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub rotate:     KeyCode,
    pub move_left:  KeyCode,
    pub move_right: KeyCode,
    pub soft_drop:  KeyCode,
    pub hard_drop:  KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            rotate:     KeyCode::Up,
            move_left:  KeyCode::Left,
            move_right: KeyCode::Right,
            soft_drop:  KeyCode::Down,
            hard_drop:  KeyCode::Space,
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, action: GestureAction) -> KeyCode {
        match action {
            GestureAction::Rotate    => self.rotate,
            GestureAction::MoveLeft  => self.move_left,
            GestureAction::MoveRight => self.move_right,
            GestureAction::SoftDrop  => self.soft_drop,
            GestureAction::HardDrop  => self.hard_drop,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeySink: where presses go
// ════════════════════════════════════════════════════════════════════════════

/// Delivers one key press (down + up) to whatever has input focus.
pub trait KeySink {
    fn press(&mut self, key: KeyCode) -> Result<()>;
}

/// Keeps every press in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub pressed: Vec<KeyCode>,
}

impl KeySink for RecordingSink {
    fn press(&mut self, key: KeyCode) -> Result<()> {
        self.pressed.push(key);
        Ok(())
    }
}

/// Dry run: logs the key instead of sending it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl KeySink for LogSink {
    fn press(&mut self, key: KeyCode) -> Result<()> {
        log::info!("key press (dry run): {}", key);
        Ok(())
    }
}

/// Press the keys for every action in `decision`, group one first.
/// Returns the actions sent.
pub fn dispatch(
    decision: &Decision,
    bindings: &KeyBindings,
    sink: &mut dyn KeySink,
) -> Result<Vec<GestureAction>> {
    let actions = decision.actions();
    for &action in &actions {
        let key = bindings.key_for(action);
        log::info!("{} -> {}", action, key);
        sink.press(key)?;
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_and_char_keys() {
        assert_eq!("Up".parse::<KeyCode>().unwrap(), KeyCode::Up);
        assert_eq!(" space ".parse::<KeyCode>().unwrap(), KeyCode::Space);
        assert_eq!("x".parse::<KeyCode>().unwrap(), KeyCode::Char('x'));
        assert!("pagedown".parse::<KeyCode>().is_err());
        assert!("".parse::<KeyCode>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for k in [KeyCode::Up, KeyCode::Enter, KeyCode::Char('w')] {
            assert_eq!(k.to_string().parse::<KeyCode>().unwrap(), k);
        }
    }

    #[test]
    fn default_bindings_cover_every_action() {
        let b = KeyBindings::default();
        let keys: std::collections::HashSet<_> =
            GestureAction::all().iter().map(|&a| b.key_for(a)).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(b.key_for(GestureAction::HardDrop), KeyCode::Space);
    }

    #[test]
    fn bindings_from_partial_toml() {
        let b: KeyBindings = toml::from_str("rotate = \"w\"\nhard_drop = \"enter\"").unwrap();
        assert_eq!(b.rotate, KeyCode::Char('w'));
        assert_eq!(b.hard_drop, KeyCode::Enter);
        assert_eq!(b.move_left, KeyCode::Left);
    }

    #[test]
    fn dispatch_sends_group_one_before_hard_drop() {
        let d = Decision { primary: Some(GestureAction::MoveRight), hard_drop: true };
        let mut sink = RecordingSink::default();
        let sent = dispatch(&d, &KeyBindings::default(), &mut sink).unwrap();
        assert_eq!(sent, vec![GestureAction::MoveRight, GestureAction::HardDrop]);
        assert_eq!(sink.pressed, vec![KeyCode::Right, KeyCode::Space]);
    }

    #[test]
    fn dispatch_stops_on_sink_error() {
        struct Broken;
        impl KeySink for Broken {
            fn press(&mut self, _key: KeyCode) -> Result<()> { Err(anyhow!("no display")) }
        }
        let d = Decision { primary: Some(GestureAction::Rotate), hard_drop: true };
        assert!(dispatch(&d, &KeyBindings::default(), &mut Broken).is_err());
    }
}
