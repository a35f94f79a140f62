use crate::runtime::command::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("hotkey string is empty")]
    Empty,
    #[error("hotkey '{0}' has no key, only modifiers")]
    MissingKey(String),
    #[error("hotkey '{hotkey}' has more than one key ('{extra}')")]
    ExtraKey { hotkey: String, extra: String },
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }

    pub fn to_event(self) -> KeyEvent {
        KeyEvent::new(self.code, self.modifiers)
    }

    /// Parses strings such as `ctrl+k`, `cmd+k`, `shift+tab` or `down`.
    ///
    /// `cmd`, `super`, `meta` and `win` all name the platform command key.
    pub fn parse(text: &str) -> Result<Self, HotkeyParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut code = None;
        for token in text.split('+').map(str::trim) {
            let lower = token.to_lowercase();
            match lower.as_str() {
                "" => continue,
                "ctrl" | "control" => modifiers = modifiers | KeyModifiers::CONTROL,
                "alt" | "opt" | "option" => modifiers = modifiers | KeyModifiers::ALT,
                "shift" => modifiers = modifiers | KeyModifiers::SHIFT,
                "cmd" | "command" | "super" | "meta" | "win" => {
                    modifiers = modifiers | KeyModifiers::SUPER
                }
                _ => {
                    if code.is_some() {
                        return Err(HotkeyParseError::ExtraKey {
                            hotkey: text.to_string(),
                            extra: token.to_string(),
                        });
                    }
                    code = Some(parse_key_code(&lower)?);
                }
            }
        }

        let code = code.ok_or_else(|| HotkeyParseError::MissingKey(text.to_string()))?;
        let modifiers = if code == KeyCode::BackTab {
            modifiers | KeyModifiers::SHIFT
        } else {
            modifiers
        };
        Ok(Self { code, modifiers })
    }
}

fn parse_key_code(token: &str) -> Result<KeyCode, HotkeyParseError> {
    let code = match token {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return Err(HotkeyParseError::UnknownKey(token.to_string())),
            }
        }
    };
    Ok(code)
}

#[derive(Debug, Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    /// Default bindings with `Ctrl+K` and `Cmd+K` as the open hotkeys.
    pub fn new() -> Self {
        Self::with_hotkeys(&[
            KeyBinding::ctrl(KeyCode::Char('k')),
            KeyBinding::new(KeyCode::Char('k'), KeyModifiers::SUPER),
        ])
    }

    pub fn with_hotkeys(hotkeys: &[KeyBinding]) -> Self {
        let mut manager = Self::default();
        manager.install_defaults();
        for hotkey in hotkeys {
            manager.bind(*hotkey, Command::Open);
        }
        manager
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: &KeyBinding) {
        self.bindings.remove(key);
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }

    /// Bound command, or the key itself for the text input.
    pub fn command_for(&self, event: KeyEvent) -> Command {
        self.resolve(event).unwrap_or(Command::InputKey(event))
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(KeyBinding::key(KeyCode::Esc), Command::Dismiss);
        self.bind(KeyBinding::ctrl(KeyCode::Char('u')), Command::Clear);
        self.bind(KeyBinding::key(KeyCode::Down), Command::FocusNext);
        self.bind(KeyBinding::key(KeyCode::Up), Command::FocusPrev);
        self.bind(KeyBinding::key(KeyCode::Tab), Command::FocusNext);
        self.bind(
            KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Command::FocusPrev,
        );
        self.bind(KeyBinding::key(KeyCode::Enter), Command::Activate);
    }
}

#[cfg(test)]
mod tests {
    use super::{HotkeyParseError, KeyBinding, KeyBindings};
    use crate::runtime::command::Command;
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn parses_modifier_chords() {
        assert_eq!(
            KeyBinding::parse("ctrl+k"),
            Ok(KeyBinding::ctrl(KeyCode::Char('k')))
        );
        assert_eq!(
            KeyBinding::parse(" Cmd + K "),
            Ok(KeyBinding::new(KeyCode::Char('k'), KeyModifiers::SUPER))
        );
        assert_eq!(
            KeyBinding::parse("ctrl+alt+space"),
            Ok(KeyBinding::new(
                KeyCode::Char(' '),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            ))
        );
        assert_eq!(
            KeyBinding::parse("backtab"),
            Ok(KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT))
        );
    }

    #[test]
    fn parses_named_keys() {
        assert_eq!(KeyBinding::parse("down"), Ok(KeyBinding::key(KeyCode::Down)));
        assert_eq!(KeyBinding::parse("Escape"), Ok(KeyBinding::key(KeyCode::Esc)));
    }

    #[test]
    fn rejects_malformed_hotkeys() {
        assert_eq!(KeyBinding::parse("  "), Err(HotkeyParseError::Empty));
        assert!(matches!(
            KeyBinding::parse("ctrl+"),
            Err(HotkeyParseError::MissingKey(_))
        ));
        assert!(matches!(
            KeyBinding::parse("ctrl+k+j"),
            Err(HotkeyParseError::ExtraKey { .. })
        ));
        assert!(matches!(
            KeyBinding::parse("hyper+f13"),
            Err(HotkeyParseError::UnknownKey(_))
        ));
    }

    #[test]
    fn default_bindings_cover_widget_keys() {
        let bindings = KeyBindings::new();
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        let cmd_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER);
        assert_eq!(bindings.resolve(ctrl_k), Some(Command::Open));
        assert_eq!(bindings.resolve(cmd_k), Some(Command::Open));
        assert_eq!(
            bindings.resolve(KeyEvent::plain(KeyCode::Esc)),
            Some(Command::Dismiss)
        );
        assert_eq!(
            bindings.resolve(KeyEvent::plain(KeyCode::Down)),
            Some(Command::FocusNext)
        );
        assert_eq!(
            bindings.resolve(KeyEvent::plain(KeyCode::Up)),
            Some(Command::FocusPrev)
        );
    }

    #[test]
    fn unbound_keys_fall_through_to_input() {
        let bindings = KeyBindings::new();
        let key = KeyEvent::plain(KeyCode::Char('k'));
        assert_eq!(bindings.command_for(key), Command::InputKey(key));
    }

    #[test]
    fn custom_hotkeys_replace_defaults() {
        let mut bindings = KeyBindings::with_hotkeys(&[KeyBinding::parse("alt+s").expect("parse")]);
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(bindings.resolve(ctrl_k), None);
        let alt_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT);
        assert_eq!(bindings.resolve(alt_s), Some(Command::Open));

        bindings.unbind(&KeyBinding::from_event(alt_s));
        assert_eq!(bindings.resolve(alt_s), None);
    }
}
