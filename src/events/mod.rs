pub mod hotkey;
pub mod window;

pub use hotkey::{Hotkey, KeyCode, KeyState, Modifiers};
pub use window::{ProcessHandle, WindowInfo};

use std::fmt;

/// Команда от горячих клавиш для диспетчера тайлинга
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilerCommand {
    /// Запустить приложение и вписать его окно в раскладку
    Open,
    /// Закрыть окно под курсором и перераспределить остальные
    Close,
}

impl fmt::Display for TilerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilerCommand::Open => f.write_str("open"),
            TilerCommand::Close => f.write_str("close"),
        }
    }
}

/// События для виртуальной клавиатуры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualKeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
}

impl VirtualKeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState) -> Self {
        Self { key_code, state }
    }
}
