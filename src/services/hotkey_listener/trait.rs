use crate::config::Config;
use crate::error::Result;
use crate::events::TilerCommand;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Trait for hotkey listeners that can run in different modes
#[async_trait::async_trait]
pub trait HotkeyListenerTrait {
    /// Run the listener until the device or the command queue goes away
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate hotkey listener based on the dry_run flag
pub fn create_hotkey_listener(
    config: Arc<Config>,
    commands: mpsc::Sender<TilerCommand>,
    dry_run: bool,
) -> Result<Box<dyn HotkeyListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_hotkey_listener::DryRunHotkeyListener::new(
            config, commands,
        )))
    } else {
        Ok(Box::new(super::hotkey_listener::RealHotkeyListener::new(
            config, commands,
        )?))
    }
}
