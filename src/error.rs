use crate::geometry::WindowId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilerError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Не удалось запустить процесс: {0}")]
    SpawnFailed(String),

    #[error("Активное окно не появилось: {0}")]
    NoActiveWindow(String),

    #[error("Окно {0:#x} больше не существует")]
    WindowGone(WindowId),

    #[error("Под курсором ({x}, {y}) нет отслеживаемого окна")]
    NoWindowAtPointer { x: i32, y: i32 },

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl TilerError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(TilerError::DeviceNotFound(msg.into()))
    }

    /// Ошибки, после которых раскладку можно продолжать для остальных окон
    pub fn is_window_gone(&self) -> bool {
        matches!(self, TilerError::WindowGone(_))
    }
}

pub type Result<T> = std::result::Result<T, TilerError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! tiler_error {
    (spawn_failed, $($arg:tt)*) => {
        $crate::error::TilerError::SpawnFailed(format!($($arg)*))
    };
    (no_active_window, $($arg:tt)*) => {
        $crate::error::TilerError::NoActiveWindow(format!($($arg)*))
    };
    (device_not_found, $($arg:tt)*) => {
        $crate::error::TilerError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::TilerError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::TilerError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::TilerError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_macro_builds_variants() {
        let err = tiler_error!(spawn_failed, "{} не найден", "xterm");
        assert!(matches!(err, TilerError::SpawnFailed(ref msg) if msg == "xterm не найден"));

        let err = tiler_error!(internal, "код {}", 42);
        assert_eq!(err.to_string(), "Внутренняя ошибка: код 42");
    }

    #[test]
    fn test_window_gone_is_recoverable() {
        assert!(TilerError::WindowGone(0x3a00007).is_window_gone());
        assert!(!TilerError::NoWindowAtPointer { x: 1, y: 2 }.is_window_gone());
        assert_eq!(
            TilerError::WindowGone(0x3a00007).to_string(),
            "Окно 0x3a00007 больше не существует"
        );
    }
}
