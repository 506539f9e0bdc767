// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (cursor movement,
// focus changes, editor buffer edits).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use snakeboard_core::config::MAX_TEAMS;
use snakeboard_core::draft::parser::normalize_line_endings;

use super::ViewState;
use crate::protocol::{FocusPanel, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (text edits, picks, team count, presets, quit). Returns
/// `None` when the key press was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm on Windows emits Press and Release for each keypress
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if key_event.code == KeyCode::Tab {
        view_state.focus = next_focus(view_state.focus);
        return None;
    }

    match view_state.focus {
        FocusPanel::Editor => handle_editor(key_event, view_state),
        FocusPanel::Presets => handle_presets(key_event, view_state),
        FocusPanel::Board => handle_board(key_event, view_state),
    }
}

/// Insert pasted text into the editor. Ignored unless the editor has focus.
pub fn handle_paste(text: &str, view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.focus != FocusPanel::Editor || view_state.confirm_quit {
        return None;
    }
    // Terminals may paste Windows line endings
    view_state.editor_text.push_str(&normalize_line_endings(text));
    view_state.active_preset = None;
    view_state.scroll_offset.remove("editor");
    Some(UserCommand::SetText(view_state.editor_text.clone()))
}

/// Board -> Editor -> Presets -> Board
fn next_focus(focus: FocusPanel) -> FocusPanel {
    match focus {
        FocusPanel::Board => FocusPanel::Editor,
        FocusPanel::Editor => FocusPanel::Presets,
        FocusPanel::Presets => FocusPanel::Board,
    }
}

/// `y`/`q` confirm, `n`/`Esc` cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_board(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let board = &view_state.snapshot.board;
    let last_team = board.team_count().saturating_sub(1);
    let last_round = board.round_count().saturating_sub(1);

    match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.cursor.team = view_state.cursor.team.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            view_state.cursor.team = (view_state.cursor.team + 1).min(last_team);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.cursor.round = view_state.cursor.round.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.cursor.round = (view_state.cursor.round + 1).min(last_round);
            None
        }
        KeyCode::Home => {
            view_state.cursor.team = 0;
            None
        }
        KeyCode::End => {
            view_state.cursor.team = last_team;
            None
        }

        KeyCode::Char(' ') | KeyCode::Enter => view_state
            .selected_player()
            .map(|p| UserCommand::TogglePicked(p.rank)),

        KeyCode::Char('+') | KeyCode::Char('=') => {
            let current = view_state.snapshot.team_count;
            (current < MAX_TEAMS).then(|| UserCommand::SetTeamCount(current + 1))
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            let current = view_state.snapshot.team_count;
            (current > 1).then(|| UserCommand::SetTeamCount(current - 1))
        }

        KeyCode::Char('c') => Some(UserCommand::ClearPicks),

        KeyCode::Char('e') => {
            view_state.focus = FocusPanel::Editor;
            None
        }
        KeyCode::Char('p') => {
            view_state.focus = FocusPanel::Presets;
            None
        }

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Editor mode: every change to the buffer is forwarded as `SetText`.
fn handle_editor(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.focus = FocusPanel::Board;
            return None;
        }
        KeyCode::PageUp => {
            let max = view_state.editor_text.split('\n').count();
            let offset = view_state.scroll_offset.entry("editor".to_string()).or_insert(0);
            *offset = offset.saturating_add(page_size()).min(max);
            return None;
        }
        KeyCode::PageDown => {
            let offset = view_state.scroll_offset.entry("editor".to_string()).or_insert(0);
            *offset = offset.saturating_sub(page_size());
            return None;
        }
        _ => {}
    }

    let text = &mut view_state.editor_text;
    match key_event.code {
        KeyCode::Char('u') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            if text.is_empty() {
                return None;
            }
            text.clear();
        }
        KeyCode::Char(c) => text.push(c),
        KeyCode::Enter => text.push('\n'),
        KeyCode::Backspace => {
            text.pop()?;
        }
        _ => return None,
    }
    let cmd = UserCommand::SetText(text.clone());
    view_state.active_preset = None;
    // Typing happens at the end, so follow it again
    view_state.scroll_offset.remove("editor");
    Some(cmd)
}

/// Lines moved per PageUp/PageDown in the editor.
fn page_size() -> usize {
    20
}

fn handle_presets(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let last = view_state.presets.len().saturating_sub(1);
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.preset_cursor = view_state.preset_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.preset_cursor = (view_state.preset_cursor + 1).min(last);
            None
        }
        KeyCode::Enter => {
            if view_state.preset_cursor < view_state.presets.len() {
                view_state.focus = FocusPanel::Board;
                Some(UserCommand::LoadPreset(view_state.preset_cursor))
            } else {
                None
            }
        }
        KeyCode::Esc => {
            view_state.focus = FocusPanel::Board;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
