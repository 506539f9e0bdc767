// Ranking text editor widget.
//
// Shows the editor buffer with a line-number gutter. Every line that fails
// to parse is shown in red, the first one bold, and its error message is
// shown in the bottom border. While focused the view follows the end of the
// text, where typing happens, unless PageUp has scrolled it back.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// First line to show.
///
/// `back` is the stored number of lines scrolled back from the end. Without
/// one, a focused editor keeps the last line visible, an unfocused editor
/// with an error keeps the error line visible, and otherwise the top shows.
pub fn editor_scroll(
    total_lines: usize,
    visible: usize,
    focused: bool,
    error_line: Option<usize>,
    back: Option<usize>,
) -> usize {
    let max_start = total_lines.saturating_sub(visible);
    if let Some(back) = back {
        return max_start.saturating_sub(back);
    }
    if focused {
        return max_start;
    }
    match error_line {
        Some(line) if line > 0 => line.saturating_sub(visible.max(1)).min(max_start),
        _ => 0,
    }
}

/// Render the editor into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, focused: bool) {
    let error = state.snapshot.error.as_ref();
    let error_line = error.map(|e| e.line_number);

    // `lines()` drops a trailing empty line; keep it so the caret sits there
    let mut source: Vec<&str> = state.editor_text.split('\n').collect();
    if source.is_empty() {
        source.push("");
    }
    let gutter = source.len().to_string().len();

    let visible = area.height.saturating_sub(2) as usize;
    let back = state.scroll_offset.get("editor").copied();
    let start = editor_scroll(source.len(), visible, focused, error_line, back);
    let bad_lines = &state.snapshot.bad_lines;

    let last = source.len() - 1;
    let lines: Vec<Line> = source
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, text)| {
            let text_style = if error_line == Some(i + 1) {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else if bad_lines.contains(&(i + 1)) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(
                    format!("{:>width$} ", i + 1, width = gutter),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(text.to_string(), text_style),
            ];
            if focused && i == last {
                spans.push(Span::styled(
                    "_",
                    Style::default().add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let title = if focused {
        " Rankings [editing] ".to_string()
    } else {
        format!(" Rankings ({} players) ", state.snapshot.player_count)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
        .title(title);
    if let Some(e) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", e.message),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
