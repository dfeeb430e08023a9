use crate::config::Config;
use crate::error::Result;
use crate::events::{Hotkey, KeyCode, KeyState, TilerCommand};
use smallvec::SmallVec;

use super::modifier_state::ModifierState;

/// Что делать с событием клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDecision {
    pub command: Option<TilerCommand>,
    /// Событие не пробрасывается дальше (только при захвате устройства)
    pub swallow: bool,
}

impl KeyDecision {
    fn pass() -> Self {
        Self { command: None, swallow: false }
    }
}

/// Сопоставление событий клавиатуры с горячими клавишами open/close.
///
/// Срабатывает только на нажатие, автоповтор команду не повторяет. Повтор и
/// отпускание сработавшей клавиши помечаются к поглощению, чтобы приложение
/// не получило непарное событие.
pub struct HotkeyMatcher {
    open: Hotkey,
    close: Hotkey,
    modifier_state: ModifierState,
    swallowed: SmallVec<[u16; 4]>,
}

impl HotkeyMatcher {
    pub fn new(open: Hotkey, close: Hotkey) -> Self {
        Self {
            open,
            close,
            modifier_state: ModifierState::new(),
            swallowed: SmallVec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.open_hotkey()?, config.close_hotkey()?))
    }

    pub fn on_key(&mut self, code: u16, state: KeyState) -> KeyDecision {
        let pressed = state != KeyState::Released;
        if self.modifier_state.update_key(evdev::KeyCode::new(code), pressed) {
            return KeyDecision::pass();
        }

        match state {
            KeyState::Pressed => {
                let modifiers = self.modifier_state.to_modifiers();
                let key = KeyCode::new(code);

                let command = if self.open.matches(key, &modifiers) {
                    Some(TilerCommand::Open)
                } else if self.close.matches(key, &modifiers) {
                    Some(TilerCommand::Close)
                } else {
                    None
                };

                if command.is_none() {
                    return KeyDecision::pass();
                }
                if !self.swallowed.contains(&code) {
                    self.swallowed.push(code);
                }
                KeyDecision { command, swallow: true }
            }
            KeyState::Repeat => KeyDecision {
                command: None,
                swallow: self.swallowed.contains(&code),
            },
            KeyState::Released => match self.swallowed.iter().position(|&c| c == code) {
                Some(index) => {
                    self.swallowed.swap_remove(index);
                    KeyDecision { command: None, swallow: true }
                }
                None => KeyDecision::pass(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: u16 = 29;
    const ALT: u16 = 56;
    const SHIFT: u16 = 42;
    const RIGHT_CTRL: u16 = 97;
    const X: u16 = 45;
    const C: u16 = 46;

    fn matcher() -> HotkeyMatcher {
        HotkeyMatcher::new("ctrl+alt+x".parse().unwrap(), "ctrl+alt+c".parse().unwrap())
    }

    fn press_chord(matcher: &mut HotkeyMatcher, keys: &[u16]) -> KeyDecision {
        let (last, modifiers) = keys.split_last().unwrap();
        for &code in modifiers {
            assert_eq!(matcher.on_key(code, KeyState::Pressed), KeyDecision::pass());
        }
        matcher.on_key(*last, KeyState::Pressed)
    }

    #[test]
    fn test_open_and_close_chords() {
        let mut m = matcher();
        let decision = press_chord(&mut m, &[CTRL, ALT, X]);
        assert_eq!(decision, KeyDecision { command: Some(TilerCommand::Open), swallow: true });

        assert!(m.on_key(X, KeyState::Released).swallow);
        assert_eq!(m.on_key(C, KeyState::Pressed).command, Some(TilerCommand::Close));
    }

    #[test]
    fn test_extra_modifier_does_not_match() {
        let mut m = matcher();
        let decision = press_chord(&mut m, &[CTRL, ALT, SHIFT, X]);
        assert_eq!(decision, KeyDecision::pass());
    }

    #[test]
    fn test_plain_key_passes_through() {
        let mut m = matcher();
        assert_eq!(m.on_key(X, KeyState::Pressed), KeyDecision::pass());
        assert_eq!(m.on_key(X, KeyState::Released), KeyDecision::pass());
    }

    #[test]
    fn test_autorepeat_is_swallowed_without_new_command() {
        let mut m = matcher();
        press_chord(&mut m, &[CTRL, ALT, X]);

        assert_eq!(m.on_key(X, KeyState::Repeat), KeyDecision { command: None, swallow: true });
        assert_eq!(m.on_key(X, KeyState::Repeat).command, None);
    }

    #[test]
    fn test_chord_fires_while_other_ctrl_still_held() {
        let mut m = matcher();
        m.on_key(CTRL, KeyState::Pressed);
        m.on_key(RIGHT_CTRL, KeyState::Pressed);
        m.on_key(ALT, KeyState::Pressed);
        m.on_key(RIGHT_CTRL, KeyState::Released);

        assert_eq!(m.on_key(X, KeyState::Pressed).command, Some(TilerCommand::Open));
    }

    #[test]
    fn test_release_after_modifiers_dropped_is_still_swallowed() {
        let mut m = matcher();
        press_chord(&mut m, &[CTRL, ALT, X]);

        m.on_key(CTRL, KeyState::Released);
        m.on_key(ALT, KeyState::Released);

        assert!(m.on_key(X, KeyState::Released).swallow);
        // следующее обычное нажатие уже не поглощается
        assert!(!m.on_key(X, KeyState::Pressed).swallow);
    }
}
