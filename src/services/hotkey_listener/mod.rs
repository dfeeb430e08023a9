mod dry_hotkey_listener;
mod hotkey_listener;
mod matcher;
mod modifier_state;
mod r#trait;

pub use self::r#trait::create_hotkey_listener;
