//! WindowSystem service: responsibility and boundaries
//!
//! This module and its submodules are a thin binding to the windowing system:
//! spawning processes, querying pointer/screen/window geometry and moving,
//! resizing or closing windows. It MUST NOT contain layout decisions; those
//! belong to `crate::layout` and are driven by the dispatcher.

mod dry_run;
mod wmctrl;
mod xdotool;
mod window_system;
mod r#trait;

pub use self::dry_run::DryRunWindowSystem;
pub use self::r#trait::{create_window_system, WindowSystem};
