// Library root: re-exports all modules so integration tests can reach the
// orchestrator, protocol types, and renderers.

pub mod app;
pub mod cli;
pub mod print;
pub mod protocol;
pub mod tui;
