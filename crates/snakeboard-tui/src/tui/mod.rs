// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `BoardSnapshot` plus
// purely local state (editor buffer, cursor, focus). The app orchestrator
// pushes `UiUpdate` messages over an mpsc channel; the TUI applies them and
// re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use snakeboard_core::draft::board::Slot;
use snakeboard_core::draft::player::PlayerRecord;

use crate::protocol::{BoardSnapshot, FocusPanel, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Board cell under the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCursor {
    pub team: usize,
    pub round: usize,
}

/// Outcome of the most recent save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    NotSaved,
    Saved(DateTime<Utc>),
    Failed(String),
}

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    /// Latest board from the app orchestrator.
    pub snapshot: BoardSnapshot,
    /// Editor buffer. Every edit is forwarded as `SetText`.
    pub editor_text: String,
    pub presets: Vec<String>,
    /// Preset whose text is currently on the board, if unedited.
    pub active_preset: Option<usize>,
    /// Highlighted row in the presets list.
    pub preset_cursor: usize,
    pub focus: FocusPanel,
    pub cursor: BoardCursor,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    pub save_status: SaveStatus,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: BoardSnapshot::default(),
            editor_text: String::new(),
            presets: Vec::new(),
            active_preset: None,
            preset_cursor: 0,
            focus: FocusPanel::Board,
            cursor: BoardCursor::default(),
            scroll_offset: HashMap::new(),
            save_status: SaveStatus::NotSaved,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Replace the board snapshot, keeping the cursor on the board.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.snapshot = snapshot;
        self.clamp_cursor();
    }

    /// The player under the cursor, if the cell is filled.
    pub fn selected_player(&self) -> Option<&PlayerRecord> {
        self.snapshot
            .board
            .cell(self.cursor.team, self.cursor.round)
            .and_then(Slot::player)
    }

    pub fn clamp_cursor(&mut self) {
        let board = &self.snapshot.board;
        self.cursor.team = self.cursor.team.min(board.team_count().saturating_sub(1));
        self.cursor.round = self.cursor.round.min(board.round_count().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::TextReplaced(text) => {
            state.editor_text = text;
            state.scroll_offset.remove("editor");
        }
        UiUpdate::PresetList(names) => {
            state.presets = names;
            state.preset_cursor = state.preset_cursor.min(state.presets.len().saturating_sub(1));
        }
        UiUpdate::PresetLoaded(idx) => {
            state.active_preset = Some(idx);
            state.preset_cursor = idx;
        }
        UiUpdate::Saved(at) => {
            state.save_status = SaveStatus::Saved(at);
        }
        UiUpdate::SaveFailed(message) => {
            state.save_status = SaveStatus::Failed(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::board::render(frame, layout.board, state, state.focus == FocusPanel::Board);
    widgets::editor::render(frame, layout.editor, state, state.focus == FocusPanel::Editor);
    widgets::presets::render(frame, layout.presets, state, state.focus == FocusPanel::Presets);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen, bracketed paste).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableBracketedPaste) {
        warn!("Bracketed paste unavailable: {}", e);
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        let _ = ratatui::restore();
        default_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        info!("UI channel closed");
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                let cmd = match maybe_event {
                    Some(Ok(Event::Key(key_event))) => input::handle_key(key_event, &mut view_state),
                    Some(Ok(Event::Paste(text))) => input::handle_paste(&text, &mut view_state),
                    Some(Ok(_)) => None,
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                };
                if let Some(cmd) = cmd {
                    let quit = cmd == UserCommand::Quit;
                    let _ = cmd_tx.send(cmd).await;
                    if quit {
                        break;
                    }
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use snakeboard_core::draft::board::assign;
    use snakeboard_core::draft::parser::parse;
    use snakeboard_core::draft::picked::PickedSet;

    fn snapshot(text: &str, teams: usize) -> BoardSnapshot {
        let players = parse(text).unwrap();
        BoardSnapshot {
            board: assign(&players, teams),
            team_count: teams,
            player_count: players.len(),
            picked: PickedSet::new(),
            error: None,
            bad_lines: Vec::new(),
        }
    }

    const SEVEN: &str = "1 Al QB\n2 Bo RB\n3 Cy WR\n4 Di TE\n5 Ed RB\n6 Fy WR\n7 Gu K";

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.snapshot.board.is_empty());
        assert!(state.editor_text.is_empty());
        assert_eq!(state.focus, FocusPanel::Board);
        assert_eq!(state.cursor, BoardCursor::default());
        assert_eq!(state.save_status, SaveStatus::NotSaved);
        assert!(!state.confirm_quit);
        assert!(state.selected_player().is_none());
    }

    #[test]
    fn snapshot_clamps_cursor() {
        let mut state = ViewState::default();
        state.cursor = BoardCursor { team: 9, round: 9 };
        state.apply_snapshot(snapshot(SEVEN, 3));
        assert_eq!(state.cursor, BoardCursor { team: 2, round: 2 });
        // Bottom-right cell of a 7-player, 3-team board is empty
        assert!(state.selected_player().is_none());
    }

    #[test]
    fn selected_player_follows_cursor() {
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(SEVEN, 3));
        state.cursor = BoardCursor { team: 2, round: 1 };
        assert_eq!(state.selected_player().unwrap().rank, 4);
    }

    #[test]
    fn text_replaced_resets_editor_scroll() {
        let mut state = ViewState::default();
        state.scroll_offset.insert("editor".into(), 12);
        apply_ui_update(&mut state, UiUpdate::TextReplaced("1 A B QB".into()));
        assert_eq!(state.editor_text, "1 A B QB");
        assert!(!state.scroll_offset.contains_key("editor"));
    }

    #[test]
    fn preset_updates() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::PresetList(vec!["Sample".into(), "half-ppr".into()]),
        );
        apply_ui_update(&mut state, UiUpdate::PresetLoaded(1));
        assert_eq!(state.active_preset, Some(1));
        assert_eq!(state.preset_cursor, 1);
    }

    #[test]
    fn save_updates() {
        let mut state = ViewState::default();
        let now = Utc::now();
        apply_ui_update(&mut state, UiUpdate::Saved(now));
        assert_eq!(state.save_status, SaveStatus::Saved(now));
        apply_ui_update(&mut state, UiUpdate::SaveFailed("nope".into()));
        assert_eq!(state.save_status, SaveStatus::Failed("nope".into()));
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(SEVEN, 3));
        state.editor_text = SEVEN.to_string();
        state.presets = vec!["Sample".into()];
        state.confirm_quit = true;
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
