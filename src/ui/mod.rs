//! UI module - menus, HUD and the upgrade screen.

mod hud;
mod plugin;
mod upgrade_screen;

pub use hud::upgrade_summary;
pub use plugin::UiPlugin;
