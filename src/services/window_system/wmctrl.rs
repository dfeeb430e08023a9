use crate::error::{TilerError, Result};
use crate::geometry::WindowId;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Обёртка над wmctrl: корректное закрытие через _NET_CLOSE_WINDOW,
/// снятие максимизации и список управляемых окон
pub struct WmctrlBackend;

impl WmctrlBackend {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("wmctrl {}", args.join(" "));
        Command::new("wmctrl")
            .args(args)
            .output()
            .await
            .map_err(|e| TilerError::ServiceUnavailable(format!("wmctrl не найден: {}", e)))
    }

    pub async fn test(&self) -> Result<()> {
        let output = self.run(&["-l"]).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(TilerError::ServiceUnavailable("wmctrl failed".to_string()))
        }
    }

    pub async fn list_windows(&self) -> Result<Vec<WindowId>> {
        let output = self.run(&["-l"]).await?;
        if !output.status.success() {
            return Err(TilerError::ServiceUnavailable("wmctrl вернул ошибку".to_string()));
        }
        Ok(parse_window_list(&String::from_utf8_lossy(&output.stdout)))
    }

    pub async fn close(&self, id: WindowId) -> Result<()> {
        let id_arg = format_window_id(id);
        let output = self.run(&["-i", "-c", &id_arg]).await?;
        if !output.status.success() {
            return Err(TilerError::WindowGone(id));
        }
        Ok(())
    }

    /// Снять максимизацию, иначе WM игнорирует новую геометрию
    pub async fn unmaximize(&self, id: WindowId) -> Result<()> {
        let id_arg = format_window_id(id);
        let output = self
            .run(&["-i", "-r", &id_arg, "-b", "remove,maximized_vert,maximized_horz"])
            .await?;
        if !output.status.success() {
            return Err(TilerError::WindowGone(id));
        }
        Ok(())
    }
}

fn format_window_id(id: WindowId) -> String {
    format!("{:#010x}", id)
}

/// Первая колонка `wmctrl -l` это id окна в шестнадцатеричном виде
pub(super) fn parse_window_list(stdout: &str) -> Vec<WindowId> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(|id| WindowId::from_str_radix(id.trim_start_matches("0x"), 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_list() {
        let stdout = "\
0x03a00007  0 host xterm
0x03c0000a  0 host Mozilla Firefox
0x04000003 -1 host desktop
";
        assert_eq!(parse_window_list(stdout), vec![0x03a00007, 0x03c0000a, 0x04000003]);
    }

    #[test]
    fn test_parse_window_list_skips_garbage() {
        assert_eq!(parse_window_list("\nnot-an-id foo\n"), Vec::<WindowId>::new());
    }

    #[test]
    fn test_format_window_id() {
        assert_eq!(format_window_id(0x3a00007), "0x03a00007");
    }
}
