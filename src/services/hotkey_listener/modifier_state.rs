use crate::events::Modifiers;
use evdev::KeyCode;

/// Нажатые модификаторы, левые и правые отдельно
#[derive(Debug, Default)]
pub struct ModifierState {
    left_ctrl: bool,
    right_ctrl: bool,
    left_alt: bool,
    right_alt: bool,
    left_shift: bool,
    right_shift: bool,
    left_super: bool,
    right_super: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.left_ctrl || self.right_ctrl,
            alt: self.left_alt || self.right_alt,
            shift: self.left_shift || self.right_shift,
            super_key: self.left_super || self.right_super,
        }
    }

    /// Обновить состояние; `true` если клавиша является модификатором
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::KEY_LEFTCTRL => &mut self.left_ctrl,
            KeyCode::KEY_RIGHTCTRL => &mut self.right_ctrl,
            KeyCode::KEY_LEFTALT => &mut self.left_alt,
            KeyCode::KEY_RIGHTALT => &mut self.right_alt,
            KeyCode::KEY_LEFTSHIFT => &mut self.left_shift,
            KeyCode::KEY_RIGHTSHIFT => &mut self.right_shift,
            KeyCode::KEY_LEFTMETA => &mut self.left_super,
            KeyCode::KEY_RIGHTMETA => &mut self.right_super,
            _ => return false,
        };
        *flag = pressed;
        true
    }
}
