// Preset list widget.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the preset list. The loaded preset is marked with a dot; the
/// highlighted row follows `preset_cursor` while focused.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, focused: bool) {
    let items: Vec<ListItem> = state
        .presets
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let active = state.active_preset == Some(i);
            let marker = if active { "● " } else { "  " };
            let style = if active {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(name.clone(), style),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
        .title(" Presets ");

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default();
    if focused && !state.presets.is_empty() {
        list_state.select(Some(state.preset_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
