// Status bar widget: board counts, next open pick, parse error, save state.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{SaveStatus, ViewState};

/// Render the status bar into the given area.
///
/// Layout: [counts] | [next pick] | [parse error or "ok"] | [save state]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        format!(" {} ", counts_text(state)),
        Style::default().fg(Color::White),
    )];

    if let Some(next) = next_pick_text(state) {
        spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("{next} "),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    match &state.snapshot.error {
        Some(e) => {
            spans.push(Span::styled(
                e.message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
            let more = state.snapshot.bad_lines.len().saturating_sub(1);
            if more > 0 {
                spans.push(Span::styled(
                    format!(" (+{more} more)"),
                    Style::default().fg(Color::Red),
                ));
            }
        }
        None => spans.push(Span::styled("ok", Style::default().fg(Color::Green))),
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (text, color) = save_text(&state.save_status);
    spans.push(Span::styled(text, Style::default().fg(color)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// E.g. "24 players | 12 teams | 2 rounds | picked 3/24".
pub fn counts_text(state: &ViewState) -> String {
    let snapshot = &state.snapshot;
    format!(
        "{} players | {} teams | {} rounds | picked {}/{}",
        snapshot.player_count,
        snapshot.team_count,
        snapshot.board.round_count(),
        snapshot.picked.len(),
        snapshot.player_count,
    )
}

/// Earliest overall pick whose player is still available, e.g.
/// "next #5 Ed (RB)". `None` once every player is picked.
pub fn next_pick_text(state: &ViewState) -> Option<String> {
    let snapshot = &state.snapshot;
    snapshot
        .board
        .picks_in_order()
        .into_iter()
        .find(|pick| !snapshot.picked.contains(pick.player.rank))
        .map(|pick| {
            format!(
                "next #{} {} ({})",
                pick.overall_pick, pick.player.name, pick.player.position
            )
        })
}

/// Save state label and its color.
pub fn save_text(status: &SaveStatus) -> (String, Color) {
    match status {
        SaveStatus::NotSaved => ("not saved".to_string(), Color::DarkGray),
        SaveStatus::Saved(at) => (
            format!("saved {}", at.with_timezone(&chrono::Local).format("%H:%M:%S")),
            Color::Green,
        ),
        SaveStatus::Failed(msg) => (format!("save failed: {msg}"), Color::Red),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{BoardSnapshot, ParseErrorInfo};
    use chrono::Utc;
    use snakeboard_core::draft::board::assign;
    use snakeboard_core::draft::parser::parse;
    use snakeboard_core::draft::picked::PickedSet;

    fn screen(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn counts_text_defaults() {
        let state = ViewState::default();
        assert_eq!(
            counts_text(&state),
            "0 players | 0 teams | 0 rounds | picked 0/0"
        );
    }

    #[test]
    fn next_pick_skips_picked_players() {
        let players = parse("1 Al QB\n2 Bo RB\n3 Cy WR\n4 Di TE").unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(BoardSnapshot {
            board: assign(&players, 2),
            team_count: 2,
            player_count: 4,
            picked: PickedSet::new(),
            error: None,
            bad_lines: Vec::new(),
        });
        assert_eq!(next_pick_text(&state).as_deref(), Some("next #1 Al (QB)"));

        // Picked out of order: the earliest open pick wins
        for rank in [1, 3] {
            state.snapshot.picked.toggle(rank);
        }
        assert_eq!(next_pick_text(&state).as_deref(), Some("next #2 Bo (RB)"));
        state.snapshot.picked.toggle(2);
        assert!(screen(&state).contains("next #4 Di (TE)"));

        state.snapshot.picked.toggle(4);
        assert_eq!(next_pick_text(&state), None);
    }

    #[test]
    fn render_counts_extra_bad_lines() {
        let mut state = ViewState::default();
        state.snapshot.error = Some(ParseErrorInfo {
            message: "line 2: bad".into(),
            line_number: 2,
        });
        state.snapshot.bad_lines = vec![2];
        assert!(!screen(&state).contains("more"));
        state.snapshot.bad_lines = vec![2, 5, 9];
        assert!(screen(&state).contains("line 2: bad (+2 more)"));
    }

    #[test]
    fn save_text_variants() {
        assert_eq!(save_text(&SaveStatus::NotSaved).1, Color::DarkGray);
        let (text, color) = save_text(&SaveStatus::Saved(Utc::now()));
        assert!(text.starts_with("saved "));
        assert_eq!(color, Color::Green);
        let (text, color) = save_text(&SaveStatus::Failed("disk full".into()));
        assert_eq!(text, "save failed: disk full");
        assert_eq!(color, Color::Red);
    }

    #[test]
    fn render_shows_error_message() {
        let backend = ratatui::backend::TestBackend::new(100, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.snapshot.error = Some(ParseErrorInfo {
            message: "line 4: rank is not a whole number".into(),
            line_number: 4,
        });
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("line 4: rank is not"));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
