use crate::error::{TilerError, Result};
use crate::events::{ProcessHandle, WindowInfo};
use crate::geometry::{Point, Rect, ScreenSize, WindowId};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::info;

use super::r#trait::WindowSystem;

const FIRST_WINDOW_ID: WindowId = 0x0100_0001;
const CASCADE_STEP: i32 = 40;
const DEFAULT_WINDOW_SIZE: (u32, u32) = (640, 480);

#[derive(Debug)]
struct DryRunState {
    screen: ScreenSize,
    pointer: Point,
    windows: BTreeMap<WindowId, FakeWindow>,
    active: Option<WindowId>,
    next_id: WindowId,
    next_pid: u32,
    fail_spawn: bool,
    spawn_without_window: bool,
}

#[derive(Debug, Clone)]
struct FakeWindow {
    title: String,
    pid: u32,
    rect: Rect,
}

/// Эмуляция оконной системы в памяти.
///
/// Используется в режиме `--dry-run` и в тестах: запуск процесса создаёт
/// окно каскадом и делает его активным, перемещения только меняют
/// запомненную геометрию.
pub struct DryRunWindowSystem {
    state: Mutex<DryRunState>,
}

impl Default for DryRunWindowSystem {
    fn default() -> Self {
        Self::new(ScreenSize::new(1920, 1080))
    }
}

impl DryRunWindowSystem {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            state: Mutex::new(DryRunState {
                screen,
                pointer: Point::new((screen.width / 2) as i32, (screen.height / 2) as i32),
                windows: BTreeMap::new(),
                active: None,
                next_id: FIRST_WINDOW_ID,
                next_pid: 1000,
                fail_spawn: false,
                spawn_without_window: false,
            }),
        }
    }

    pub fn set_pointer(&self, pointer: Point) {
        self.state.lock().pointer = pointer;
    }

    pub fn set_screen(&self, screen: ScreenSize) {
        self.state.lock().screen = screen;
    }

    /// Следующий запуск процесса завершится ошибкой
    pub fn set_fail_spawn(&self, fail: bool) {
        self.state.lock().fail_spawn = fail;
    }

    /// Процессы запускаются, но окна не появляются
    pub fn set_spawn_without_window(&self, enabled: bool) {
        self.state.lock().spawn_without_window = enabled;
    }

    /// Окно исчезает в обход тайлера (пользователь закрыл его сам)
    pub fn destroy_window(&self, id: WindowId) -> bool {
        let mut state = self.state.lock();
        let removed = state.windows.remove(&id).is_some();
        if state.active == Some(id) {
            state.active = state.windows.keys().next_back().copied();
        }
        removed
    }

    pub fn geometry_of(&self, id: WindowId) -> Option<Rect> {
        self.state.lock().windows.get(&id).map(|w| w.rect)
    }

    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }
}

#[async_trait::async_trait]
impl WindowSystem for DryRunWindowSystem {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn spawn_process(&self, command: &str, _args: &[String]) -> Result<ProcessHandle> {
        let mut state = self.state.lock();
        if state.fail_spawn {
            return Err(TilerError::SpawnFailed(format!("{}: эмуляция ошибки запуска", command)));
        }

        let pid = state.next_pid;
        state.next_pid += 1;

        if !state.spawn_without_window {
            let id = state.next_id;
            state.next_id += 1;

            // каскад, как у большинства WM для новых окон
            let offset = CASCADE_STEP * (state.windows.len() as i32 % 10);
            let (width, height) = DEFAULT_WINDOW_SIZE;
            let rect = Rect::new(offset, offset, width.min(state.screen.width), height.min(state.screen.height));

            state.windows.insert(
                id,
                FakeWindow {
                    title: format!("{} - dry_run", command),
                    pid,
                    rect,
                },
            );
            state.active = Some(id);
            info!("[DRY RUN] Запущен '{}', окно {:#x} {}", command, id, rect);
        } else {
            info!("[DRY RUN] Запущен '{}' без окна", command);
        }

        Ok(ProcessHandle {
            pid: Some(pid),
            command: command.to_string(),
        })
    }

    async fn active_window(&self) -> Result<Option<WindowInfo>> {
        let state = self.state.lock();
        let window = state.active.and_then(|id| {
            state.windows.get(&id).map(|w| {
                WindowInfo::new(id)
                    .with_title(w.title.clone())
                    .with_pid(w.pid)
                    .with_geometry(w.rect)
            })
        });
        Ok(window)
    }

    async fn window_geometry(&self, id: WindowId) -> Result<Rect> {
        self.geometry_of(id).ok_or(TilerError::WindowGone(id))
    }

    async fn window_exists(&self, id: WindowId) -> Result<bool> {
        Ok(self.state.lock().windows.contains_key(&id))
    }

    async fn pointer_position(&self) -> Result<Point> {
        Ok(self.state.lock().pointer)
    }

    async fn screen_size(&self) -> Result<ScreenSize> {
        Ok(self.state.lock().screen)
    }

    async fn move_to(&self, id: WindowId, x: i32, y: i32) -> Result<()> {
        let mut state = self.state.lock();
        let window = state.windows.get_mut(&id).ok_or(TilerError::WindowGone(id))?;
        window.rect.x = x;
        window.rect.y = y;
        info!("[DRY RUN] Окно {:#x} перемещено в ({}, {})", id, x, y);
        Ok(())
    }

    async fn resize_to(&self, id: WindowId, width: u32, height: u32) -> Result<()> {
        let mut state = self.state.lock();
        let window = state.windows.get_mut(&id).ok_or(TilerError::WindowGone(id))?;
        window.rect.width = width;
        window.rect.height = height;
        info!("[DRY RUN] Окно {:#x} изменено до {}x{}", id, width, height);
        Ok(())
    }

    async fn close(&self, id: WindowId) -> Result<()> {
        if !self.destroy_window(id) {
            return Err(TilerError::WindowGone(id));
        }
        info!("[DRY RUN] Окно {:#x} закрыто", id);
        Ok(())
    }
}
