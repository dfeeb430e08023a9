use crate::error::Result;
use crate::events::{ProcessHandle, WindowInfo};
use crate::geometry::{Point, Rect, ScreenSize, WindowId};
use std::sync::Arc;
use tracing::info;

/// Contract between the tiler core and the windowing system.
///
/// Every call is a fresh query; implementations keep no layout state.
/// Operations on a handle that no longer maps to a live window fail with
/// `TilerError::WindowGone`.
#[async_trait::async_trait]
pub trait WindowSystem: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    async fn spawn_process(&self, command: &str, args: &[String]) -> Result<ProcessHandle>;

    /// Currently focused window, `None` when nothing has focus
    async fn active_window(&self) -> Result<Option<WindowInfo>>;

    async fn window_geometry(&self, id: WindowId) -> Result<Rect>;

    async fn window_exists(&self, id: WindowId) -> Result<bool>;

    async fn pointer_position(&self) -> Result<Point>;

    async fn screen_size(&self) -> Result<ScreenSize>;

    async fn move_to(&self, id: WindowId, x: i32, y: i32) -> Result<()>;

    async fn resize_to(&self, id: WindowId, width: u32, height: u32) -> Result<()>;

    async fn close(&self, id: WindowId) -> Result<()>;
}

/// Factory function to create an appropriate window system based on the dry_run flag
pub async fn create_window_system(dry_run: bool) -> Result<Arc<dyn WindowSystem>> {
    if dry_run {
        info!("Используется эмуляция оконной системы (dry-run)");
        Ok(Arc::new(super::dry_run::DryRunWindowSystem::default()))
    } else {
        Ok(Arc::new(super::window_system::X11WindowSystem::connect().await?))
    }
}
