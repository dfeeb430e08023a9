pub mod dispatcher;
pub mod hotkey_listener;
pub mod virtual_device;
pub mod window_system;

pub use dispatcher::TilingDispatcher;
pub use hotkey_listener::create_hotkey_listener;
pub use virtual_device::VirtualDevice;
pub use window_system::{create_window_system, DryRunWindowSystem, WindowSystem};
