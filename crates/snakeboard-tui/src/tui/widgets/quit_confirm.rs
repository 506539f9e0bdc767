// Quit confirmation overlay, drawn over the dashboard while
// `ViewState::confirm_quit` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 36;
const DIALOG_HEIGHT: u16 = 4;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog = centered(area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from(vec![
            Span::raw(" Leave snakeboard? "),
            key("y", Color::Green),
            Span::raw("/"),
            key("n", Color::Red),
        ]),
        Line::from(Span::styled(
            " Unsaved rankings are written first.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Quit ");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        dialog,
    );
}

/// Dialog rect centered in `area`, shrunk to fit small terminals.
fn centered(area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(DIALOG_HEIGHT.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Length(DIALOG_WIDTH.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    dialog
}
