use crate::error::{TilerError, Result};
use crate::events::VirtualKeyEvent;
use tracing::{debug, info};

/// Виртуальная клавиатура uinput для проброса событий захваченного устройства
pub struct VirtualDevice {
    device: Option<uinput::Device>,
    device_name: String,
    dry_run: bool,
}

impl VirtualDevice {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Self::create_virtual_device(device_name)?)
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}'", device_name);

        let device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                TilerError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(device)
    }

    pub fn send_event(&mut self, event: VirtualKeyEvent) -> Result<()> {
        if self.dry_run {
            debug!("[DRY RUN] Виртуальное событие: {:?}", event);
            return Ok(());
        }

        let device = self
            .device
            .as_mut()
            .ok_or_else(|| TilerError::Internal("Виртуальное устройство недоступно".to_string()))?;

        let keycode = event.key_code.value() as i32;

        // EV_KEY, затем EV_SYN
        device.write(1, keycode, event.state.value()).map_err(|e| {
            TilerError::Internal(format!("Не удалось отправить событие клавиши {}: {}", keycode, e))
        })?;
        device
            .write(0, 0, 0)
            .map_err(|e| TilerError::Internal(format!("Не удалось синхронизировать события: {}", e)))?;

        crate::trace_if_enabled!("Событие {} проброшено через '{}'", event.key_code, self.device_name);
        Ok(())
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        if !self.dry_run {
            info!("Закрытие виртуального устройства '{}'", self.device_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyCode, KeyState};

    #[test]
    fn test_dry_run_device_accepts_events() {
        let mut device = VirtualDevice::new("test", true).unwrap();
        let event = VirtualKeyEvent::new(KeyCode::new(45), KeyState::Pressed);
        assert!(device.send_event(event).is_ok());
    }
}
