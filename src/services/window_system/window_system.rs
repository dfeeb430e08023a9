use crate::error::{TilerError, Result};
use crate::events::{ProcessHandle, WindowInfo};
use crate::geometry::{Point, Rect, ScreenSize, WindowId};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::r#trait::WindowSystem;
use super::wmctrl::WmctrlBackend;
use super::xdotool::XdotoolBackend;

/// Оконная система X11 поверх xdotool (обязателен) и wmctrl (необязателен)
pub struct X11WindowSystem {
    xdotool: XdotoolBackend,
    wmctrl: Option<WmctrlBackend>,
}

impl X11WindowSystem {
    pub async fn connect() -> Result<Self> {
        info!("Инициализация X11WindowSystem");

        if std::env::var_os("DISPLAY").is_none() {
            warn!("Переменная DISPLAY не задана, xdotool скорее всего не сможет подключиться к X-серверу");
        }

        let xdotool = XdotoolBackend::new();
        xdotool.test().await.map_err(|e| {
            TilerError::ServiceUnavailable(format!("xdotool недоступен, управление окнами невозможно: {}", e))
        })?;
        info!("Используем xdotool");

        let wmctrl = WmctrlBackend::new();
        let wmctrl = match wmctrl.test().await {
            Ok(()) => {
                info!("Используем wmctrl для закрытия и снятия максимизации окон");
                Some(wmctrl)
            }
            Err(e) => {
                warn!("wmctrl недоступен ({}), окна будут закрываться через xdotool", e);
                None
            }
        };

        Ok(Self { xdotool, wmctrl })
    }
}

#[async_trait::async_trait]
impl WindowSystem for X11WindowSystem {
    fn name(&self) -> &'static str {
        "x11"
    }

    async fn spawn_process(&self, command: &str, args: &[String]) -> Result<ProcessHandle> {
        let child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TilerError::SpawnFailed(format!("{}: {}", command, e)))?;

        let handle = ProcessHandle {
            pid: child.id(),
            command: command.to_string(),
        };
        debug!("Процесс {} запущен", handle);
        Ok(handle)
    }

    async fn active_window(&self) -> Result<Option<WindowInfo>> {
        let Some(id) = self.xdotool.active_window_id().await? else {
            return Ok(None);
        };

        // Окно могло закрыться между запросами
        let geometry = match self.xdotool.window_geometry(id).await {
            Ok(rect) => rect,
            Err(TilerError::WindowGone(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut window = WindowInfo::new(id).with_geometry(geometry);
        if let Ok(title) = self.xdotool.window_name(id).await {
            window = window.with_title(title);
        }
        if let Ok(Some(pid)) = self.xdotool.window_pid(id).await {
            window = window.with_pid(pid);
        }

        Ok(Some(window))
    }

    async fn window_geometry(&self, id: WindowId) -> Result<Rect> {
        self.xdotool.window_geometry(id).await
    }

    async fn window_exists(&self, id: WindowId) -> Result<bool> {
        match &self.wmctrl {
            Some(wmctrl) => Ok(wmctrl.list_windows().await?.contains(&id)),
            None => self.xdotool.window_exists(id).await,
        }
    }

    async fn pointer_position(&self) -> Result<Point> {
        self.xdotool.pointer_position().await
    }

    async fn screen_size(&self) -> Result<ScreenSize> {
        self.xdotool.screen_size().await
    }

    async fn move_to(&self, id: WindowId, x: i32, y: i32) -> Result<()> {
        if let Some(wmctrl) = &self.wmctrl {
            wmctrl.unmaximize(id).await?;
        }
        self.xdotool.move_to(id, x, y).await
    }

    async fn resize_to(&self, id: WindowId, width: u32, height: u32) -> Result<()> {
        self.xdotool.resize_to(id, width, height).await
    }

    async fn close(&self, id: WindowId) -> Result<()> {
        match &self.wmctrl {
            Some(wmctrl) => wmctrl.close(id).await,
            None => self.xdotool.close(id).await,
        }
    }
}

impl Drop for X11WindowSystem {
    fn drop(&mut self) {
        info!("X11WindowSystem завершает работу");
    }
}
