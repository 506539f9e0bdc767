// Messages exchanged between the app orchestrator and the TUI.

use chrono::{DateTime, Utc};
use snakeboard_core::draft::board::DraftBoard;
use snakeboard_core::draft::parser::ParseError;
use snakeboard_core::draft::picked::PickedSet;

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Replace the ranking text with the editor contents.
    SetText(String),
    SetTeamCount(usize),
    TogglePicked(i64),
    ClearPicks,
    /// Load the preset at this index of the preset list.
    LoadPreset(usize),
    Quit,
}

/// Parse failure details for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorInfo {
    pub message: String,
    /// 1-based line in the editor text.
    pub line_number: usize,
}

impl From<&ParseError> for ParseErrorInfo {
    fn from(e: &ParseError) -> Self {
        ParseErrorInfo {
            message: e.to_string(),
            line_number: e.line_number(),
        }
    }
}

/// Everything the TUI needs to redraw the board.
#[derive(Debug, Clone, Default)]
pub struct BoardSnapshot {
    pub board: DraftBoard,
    pub team_count: usize,
    pub player_count: usize,
    pub picked: PickedSet,
    /// First parse error; the board is empty while this is set.
    pub error: Option<ParseErrorInfo>,
    /// 1-based numbers of every line that fails to parse.
    pub bad_lines: Vec<usize>,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<BoardSnapshot>),
    /// The ranking text was replaced outside the editor (startup, preset).
    TextReplaced(String),
    PresetList(Vec<String>),
    PresetLoaded(usize),
    Saved(DateTime<Utc>),
    SaveFailed(String),
}

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusPanel {
    Board,
    Editor,
    Presets,
}
