use crate::config::Config;
use crate::error::{TilerError, Result};
use crate::events::{KeyCode, KeyState, TilerCommand, VirtualKeyEvent};
use crate::services::VirtualDevice;
use crate::utils::DeviceFinder;
use evdev::{Device, EventStream, EventType, InputEvent};
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use super::matcher::HotkeyMatcher;
use super::r#trait::HotkeyListenerTrait;

pub struct RealHotkeyListener {
    commands: mpsc::Sender<TilerCommand>,
    stream: EventStream,
    matcher: HotkeyMatcher,
    /// Есть только при эксклюзивном захвате устройства
    passthrough: Option<VirtualDevice>,
}

impl RealHotkeyListener {
    pub fn new(config: Arc<Config>, commands: mpsc::Sender<TilerCommand>) -> Result<Self> {
        info!("Инициализация RealHotkeyListener");

        let matcher = HotkeyMatcher::from_config(&config)?;
        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let mut device = Device::open(&device_path).map_err(|e| {
            TilerError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        let passthrough = if config.input.grab {
            // виртуальное устройство создаём до захвата, иначе клавиатура останется немой
            let virtual_device = VirtualDevice::new("Hotkey Tiler Passthrough", false)?;
            match device.grab() {
                Ok(()) => Self::log_grabbed_device(&device),
                Err(e) => {
                    Self::log_grab_error(&device_path, &e);
                    return Err(TilerError::Permission(format!(
                        "Не удалось захватить устройство эксклюзивно: {}",
                        e
                    )));
                }
            }
            Some(virtual_device)
        } else {
            info!(
                "Устройство {} читается без захвата, горячие клавиши дойдут и до приложений",
                device.name().unwrap_or("Unknown")
            );
            None
        };

        let stream = device.into_event_stream()?;

        Ok(Self {
            commands,
            stream,
            matcher,
            passthrough,
        })
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("RealHotkeyListener запущен, начинаем чтение событий");

        loop {
            let event = match self.stream.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    return Err(TilerError::Io(e));
                }
            };

            if let Err(e) = self.handle_event(event) {
                match e {
                    TilerError::ServiceUnavailable(_) => return Err(e),
                    _ => error!("Ошибка обработки события: {}", e),
                }
            }
        }
    }

    fn handle_event(&mut self, event: InputEvent) -> Result<()> {
        if event.event_type() != EventType::KEY {
            return Ok(());
        }

        let Some(state) = KeyState::from_value(event.value()) else {
            debug!("Неизвестное значение события: {}", event.value());
            return Ok(());
        };

        let decision = self.matcher.on_key(event.code(), state);
        crate::debug_if_enabled!(
            "Клавиша {} {:?}: {:?}",
            KeyCode::new(event.code()),
            state,
            decision
        );

        if let Some(command) = decision.command {
            info!("Горячая клавиша: {}", command);
            self.send_command(command)?;
        }

        if !decision.swallow {
            self.passthrough_key(KeyCode::new(event.code()), state);
        }

        Ok(())
    }

    /// Не ждём диспетчер: при переполнении очереди команда отбрасывается
    fn send_command(&self, command: TilerCommand) -> Result<()> {
        match self.commands.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(command)) => {
                warn!("Очередь команд переполнена, команда {} отброшена", command);
                Ok(())
            }
            Err(TrySendError::Closed(_)) => {
                Err(crate::tiler_error!(service_unavailable, "диспетчер тайлинга остановлен"))
            }
        }
    }

    fn passthrough_key(&mut self, key_code: KeyCode, state: KeyState) {
        let Some(device) = self.passthrough.as_mut() else {
            return;
        };

        if let Err(e) = device.send_event(VirtualKeyEvent::new(key_code, state)) {
            debug!("Не удалось пробросить событие для клавиши {}: {}", key_code, e);
        }
    }

    fn log_grabbed_device(device: &Device) {
        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
        info!("Устройство захвачено эксклюзивно");
    }

    fn log_grab_error(device_path: &Path, e: &Error) {
        warn!(
            "Не удалось захватить устройство {}: {}",
            device_path.display(),
            e
        );
        warn!("Попробуйте:");
        warn!("1. Отключить input.grab, горячие клавиши будут работать без захвата");
        warn!("2. Добавить пользователя в группу input: sudo usermod -a -G input $USER");
        warn!("3. Перезайти в систему после добавления в группу");
    }
}

#[async_trait::async_trait]
impl HotkeyListenerTrait for RealHotkeyListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

impl Drop for RealHotkeyListener {
    fn drop(&mut self) {
        if self.passthrough.is_none() {
            return;
        }
        info!("Освобождение захваченного устройства");
        if let Err(e) = self.stream.device_mut().ungrab() {
            error!("Не удалось освободить устройство: {}", e);
        }
    }
}
