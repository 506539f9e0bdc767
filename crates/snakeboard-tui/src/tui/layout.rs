// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +------------------------------+-------------------+
// | Board (70%)                   | Editor (65%)      |
// |                               +-------------------+
// |                               | Presets (35%)     |
// +------------------------------+-------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: player, team, round and pick counts, save state, errors.
    pub status_bar: Rect,
    /// Snake draft grid.
    pub board: Rect,
    /// Ranking text editor.
    pub editor: Rect,
    /// Preset list.
    pub presets: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // board + sidebar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(vertical[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        board: horizontal[0],
        editor: sidebar[0],
        presets: sidebar[1],
        help_bar: vertical[2],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
