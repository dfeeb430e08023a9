use crate::error::{TilerError, Result};
use crate::geometry::{Point, Rect, ScreenSize, WindowId};
use std::collections::HashMap;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Обёртка над утилитой xdotool
pub struct XdotoolBackend;

impl XdotoolBackend {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("xdotool {}", args.join(" "));
        Command::new("xdotool")
            .args(args)
            .output()
            .await
            .map_err(|e| TilerError::ServiceUnavailable(format!("xdotool не найден: {}", e)))
    }

    /// Запуск, который обязан завершиться успешно для живого окна
    async fn run_for_window(&self, id: WindowId, args: &[&str]) -> Result<Output> {
        let output = self.run(args).await?;
        if !output.status.success() {
            debug!(
                "xdotool вернул ошибку для окна {:#x}: {}",
                id,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(TilerError::WindowGone(id));
        }
        Ok(output)
    }

    pub async fn test(&self) -> Result<()> {
        let output = self.run(&["getdisplaygeometry"]).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(TilerError::ServiceUnavailable(format!(
                "xdotool failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    pub async fn active_window_id(&self) -> Result<Option<WindowId>> {
        let output = self.run(&["getactivewindow"]).await?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(parse_window_id(&String::from_utf8_lossy(&output.stdout)))
    }

    pub async fn window_name(&self, id: WindowId) -> Result<String> {
        let id_arg = id.to_string();
        let output = self.run_for_window(id, &["getwindowname", &id_arg]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub async fn window_pid(&self, id: WindowId) -> Result<Option<u32>> {
        let id_arg = id.to_string();
        // не у всех окон есть _NET_WM_PID, это не ошибка
        let output = self.run(&["getwindowpid", &id_arg]).await?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().parse().ok())
    }

    pub async fn window_geometry(&self, id: WindowId) -> Result<Rect> {
        let id_arg = id.to_string();
        let output = self
            .run_for_window(id, &["getwindowgeometry", "--shell", &id_arg])
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        parse_geometry(&stdout).ok_or_else(|| {
            TilerError::Internal(format!("Не удалось разобрать геометрию окна {:#x}: {}", id, stdout.trim()))
        })
    }

    pub async fn window_exists(&self, id: WindowId) -> Result<bool> {
        let id_arg = id.to_string();
        let output = self.run(&["getwindowgeometry", &id_arg]).await?;
        Ok(output.status.success())
    }

    pub async fn pointer_position(&self) -> Result<Point> {
        let output = self.run(&["getmouselocation", "--shell"]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        parse_pointer(&stdout)
            .ok_or_else(|| TilerError::Internal(format!("Не удалось разобрать положение курсора: {}", stdout.trim())))
    }

    pub async fn screen_size(&self) -> Result<ScreenSize> {
        let output = self.run(&["getdisplaygeometry"]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        parse_display_geometry(&stdout)
            .ok_or_else(|| TilerError::Internal(format!("Не удалось разобрать размер экрана: {}", stdout.trim())))
    }

    pub async fn move_to(&self, id: WindowId, x: i32, y: i32) -> Result<()> {
        let (id_arg, x_arg, y_arg) = (id.to_string(), x.to_string(), y.to_string());
        self.run_for_window(id, &["windowmove", &id_arg, &x_arg, &y_arg])
            .await?;
        Ok(())
    }

    pub async fn resize_to(&self, id: WindowId, width: u32, height: u32) -> Result<()> {
        let (id_arg, w_arg, h_arg) = (id.to_string(), width.to_string(), height.to_string());
        self.run_for_window(id, &["windowsize", &id_arg, &w_arg, &h_arg])
            .await?;
        Ok(())
    }

    pub async fn close(&self, id: WindowId) -> Result<()> {
        let id_arg = id.to_string();
        self.run_for_window(id, &["windowclose", &id_arg]).await?;
        Ok(())
    }
}

/// Разбор вывода `--shell`: строки вида `KEY=value`
fn parse_shell_vars(stdout: &str) -> HashMap<&str, &str> {
    stdout
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .collect()
}

fn shell_var<T: std::str::FromStr>(vars: &HashMap<&str, &str>, key: &str) -> Option<T> {
    vars.get(key)?.trim().parse().ok()
}

pub(super) fn parse_window_id(stdout: &str) -> Option<WindowId> {
    stdout.trim().parse().ok()
}

pub(super) fn parse_geometry(stdout: &str) -> Option<Rect> {
    let vars = parse_shell_vars(stdout);
    let rect = Rect::new(
        shell_var(&vars, "X")?,
        shell_var(&vars, "Y")?,
        shell_var(&vars, "WIDTH")?,
        shell_var(&vars, "HEIGHT")?,
    );
    Some(rect)
}

pub(super) fn parse_pointer(stdout: &str) -> Option<Point> {
    let vars = parse_shell_vars(stdout);
    Some(Point::new(shell_var(&vars, "X")?, shell_var(&vars, "Y")?))
}

pub(super) fn parse_display_geometry(stdout: &str) -> Option<ScreenSize> {
    let mut parts = stdout.split_whitespace();
    let width: u32 = parts.next()?.parse().ok()?;
    let height: u32 = parts.next()?.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(ScreenSize::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geometry_shell_output() {
        let stdout = "WINDOW=60817415\nX=960\nY=0\nWIDTH=960\nHEIGHT=1080\nSCREEN=0\n";
        assert_eq!(parse_geometry(stdout), Some(Rect::new(960, 0, 960, 1080)));
    }

    #[test]
    fn test_parse_geometry_missing_field() {
        assert_eq!(parse_geometry("WINDOW=1\nX=0\nY=0\nWIDTH=10\n"), None);
        assert_eq!(parse_geometry("X=0\nY=0\nWIDTH=-10\nHEIGHT=10\n"), None);
    }

    #[test]
    fn test_parse_pointer_shell_output() {
        let stdout = "X=100\nY=250\nSCREEN=0\nWINDOW=60817415\n";
        assert_eq!(parse_pointer(stdout), Some(Point::new(100, 250)));
    }

    #[test]
    fn test_parse_display_geometry() {
        assert_eq!(parse_display_geometry("1920 1080\n"), Some(ScreenSize::new(1920, 1080)));
        assert_eq!(parse_display_geometry("0 1080"), None);
        assert_eq!(parse_display_geometry("garbage"), None);
    }

    #[test]
    fn test_parse_window_id() {
        assert_eq!(parse_window_id("60817415\n"), Some(60817415));
        assert_eq!(parse_window_id(""), None);
    }
}
