use crate::config::Config;
use crate::error::{TilerError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Проверить доступ к ресурсам, нужным для реального режима
pub fn check_permissions(config: &Config) -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;

    // uinput нужен только для проброса событий захваченной клавиатуры
    if config.input.grab {
        check_uinput_access()?;
    }

    check_display();
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = Path::new("/dev/input");

    if !input_dir.exists() {
        return Err(TilerError::Permission(format!("Директория {:?} не существует", input_dir)));
    }

    fs::read_dir(input_dir).map_err(|e| {
        TilerError::Permission(format!(
            "Нет доступа к {:?}: {}. Добавьте пользователя в группу 'input'",
            input_dir, e
        ))
    })?;

    info!("Доступ к {:?} подтвержден", input_dir);
    Ok(())
}

fn check_uinput_access() -> Result<()> {
    let uinput_device = Path::new("/dev/uinput");

    if !uinput_device.exists() {
        return Err(TilerError::Permission(format!(
            "{:?} не существует, загрузите модуль: sudo modprobe uinput",
            uinput_device
        )));
    }

    let mode = fs::metadata(uinput_device)?.permissions().mode();
    if mode & 0o006 == 0 && mode & 0o060 == 0 {
        return Err(TilerError::Permission(format!(
            "Нет прав доступа к {:?}. Добавьте пользователя в группу 'uinput' или 'input'",
            uinput_device
        )));
    }

    info!("Доступ к {:?} подтвержден", uinput_device);
    Ok(())
}

fn check_display() {
    match std::env::var("DISPLAY") {
        Ok(display_name) if !display_name.is_empty() => info!("X-дисплей: {}", display_name),
        _ => warn!("DISPLAY не задан: тайлер работает только в сессии X11"),
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("Приложение запущено от имени root!");
            warn!("   xdotool и wmctrl должны работать в X-сессии пользователя,");
            warn!("   добавьте пользователя в группу 'input': sudo usermod -a -G input $USER");
        }
        Ok(user) => info!("Приложение запущено от имени пользователя: {}", user),
        Err(_) => warn!("Не удалось определить пользователя"),
    }
}
