use crate::geometry::{Rect, WindowId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Информация об окне, полученная от оконной системы
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub title: String,
    pub pid: Option<u32>,
    pub geometry: Option<Rect>,
}

impl WindowInfo {
    pub fn new(id: WindowId) -> Self {
        Self {
            id,
            title: String::new(),
            pid: None,
            geometry: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_geometry(mut self, geometry: Rect) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "{:#x}", self.id)
        } else {
            write!(f, "{:#x} \"{}\"", self.id, self.title)
        }
    }
}

/// Запущенный по горячей клавише процесс
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: Option<u32>,
    pub command: String,
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "'{}' (pid {})", self.command, pid),
            None => write!(f, "'{}'", self.command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_info_creation() {
        let window = WindowInfo::new(0x3a00007)
            .with_title("xterm")
            .with_pid(1234)
            .with_geometry(Rect::new(0, 0, 640, 480));

        assert_eq!(window.title, "xterm");
        assert_eq!(window.pid, Some(1234));
        assert_eq!(window.geometry, Some(Rect::new(0, 0, 640, 480)));
        assert_eq!(window.to_string(), "0x3a00007 \"xterm\"");
    }

    #[test]
    fn test_process_handle_display() {
        let handle = ProcessHandle { pid: Some(42), command: "xterm".to_string() };
        assert_eq!(handle.to_string(), "'xterm' (pid 42)");
    }
}
