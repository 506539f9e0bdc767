// Help bar widget: keyboard hints for the focused panel.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::FocusPanel;
use crate::tui::ViewState;

/// (key, action) pairs for the focused panel.
pub fn hints(focus: FocusPanel) -> &'static [(&'static str, &'static str)] {
    match focus {
        FocusPanel::Board => &[
            ("←↓↑→", "move"),
            ("space", "pick"),
            ("+/-", "teams"),
            ("c", "clear picks"),
            ("e", "edit"),
            ("p", "presets"),
            ("tab", "focus"),
            ("q", "quit"),
        ],
        FocusPanel::Editor => &[
            ("type/paste", "edit"),
            ("enter", "newline"),
            ("bksp", "delete"),
            ("^U", "clear"),
            ("pgup/pgdn", "scroll"),
            ("esc", "board"),
        ],
        FocusPanel::Presets => &[
            ("↑↓", "select"),
            ("enter", "load"),
            ("esc", "board"),
            ("q", "quit"),
        ],
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints(state.focus) {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(" {action}  "), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
        area,
    );
}
