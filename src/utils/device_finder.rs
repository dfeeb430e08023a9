use crate::error::{TilerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Минимальный набор клавиш, по которому устройство считается клавиатурой
const REQUIRED_KEYS: [evdev::KeyCode; 4] = [
    evdev::KeyCode::KEY_A,
    evdev::KeyCode::KEY_SPACE,
    evdev::KeyCode::KEY_ENTER,
    evdev::KeyCode::KEY_LEFTCTRL,
];

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру: явный путь из конфигурации или автопоиск при `auto`
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                TilerError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Автопоиск клавиатурного устройства...");

        if let Some(device) = Self::find_by_id()? {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Some(device) = Self::find_by_event_devices()? {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        TilerError::device_not_found(
            "Не удалось найти клавиатуру. Укажите input.device_path или добавьте пользователя в группу 'input'",
        )
    }

    /// Ссылки `/dev/input/by-id/*-event-kbd` самые надёжные
    fn find_by_id() -> Result<Option<PathBuf>> {
        let by_id_dir = Path::new("/dev/input/by-id");
        if !by_id_dir.exists() {
            debug!("Директория {:?} не существует", by_id_dir);
            return Ok(None);
        }

        let mut candidates: Vec<(PathBuf, u8)> = Self::list_dir(by_id_dir)?
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let priority = keyboard_name_priority(&name)?;
                Some((path, priority))
            })
            .filter(|(path, _)| Self::is_keyboard_device(path))
            .collect();

        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(candidates.into_iter().next().map(|(path, _)| path))
    }

    fn find_by_event_devices() -> Result<Option<PathBuf>> {
        let mut event_devices: Vec<PathBuf> = Self::list_dir(Path::new("/dev/input"))?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("event"))
            })
            .collect();

        event_devices.sort();
        Ok(event_devices.into_iter().find(|path| Self::is_keyboard_device(path)))
    }

    fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .map_err(|e| TilerError::Permission(format!("Нет доступа к {:?}: {}", dir, e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn is_keyboard_device(device_path: &Path) -> bool {
        let device = match evdev::Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                warn!("Устройство {:?} недоступно: {}", device_path, e);
                return false;
            }
        };

        let name = device.name().unwrap_or("Unknown").to_lowercase();
        if ["mouse", "touchpad", "trackpoint"].iter().any(|m| name.contains(m)) {
            debug!("Исключаем устройство как мышь/тачпад: {:?} ({})", device_path, name);
            return false;
        }

        let is_keyboard = device
            .supported_keys()
            .is_some_and(|keys| REQUIRED_KEYS.iter().all(|&key| keys.contains(key)));

        debug!("Устройство {:?} ({}): клавиатура = {}", device_path, name, is_keyboard);
        is_keyboard
    }
}

/// Приоритет по имени ссылки в by-id, `None` если это не клавиатура
fn keyboard_name_priority(name: &str) -> Option<u8> {
    let lower = name.to_lowercase();
    if !lower.contains("event") || lower.contains("mouse") {
        return None;
    }
    if lower.ends_with("event-kbd") {
        Some(100)
    } else if lower.contains("keyboard") || lower.contains("kbd") {
        Some(50)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(matches!(result, Err(TilerError::DeviceNotFound(_))));
    }

    #[test]
    fn test_keyboard_name_priority() {
        assert_eq!(keyboard_name_priority("usb-Logitech_USB_Keyboard-event-kbd"), Some(100));
        assert_eq!(keyboard_name_priority("usb-Some_Keyboard-if01-event-joystick"), Some(50));
        assert_eq!(keyboard_name_priority("usb-Razer_DeathAdder-event-mouse"), None);
        assert_eq!(keyboard_name_priority("usb-Logitech_USB_Keyboard-kbd"), None);
    }
}
