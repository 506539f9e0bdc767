// TUI widget modules for each dashboard panel.

pub mod board;
pub mod editor;
pub mod help_bar;
pub mod presets;
pub mod quit_confirm;
pub mod status_bar;
