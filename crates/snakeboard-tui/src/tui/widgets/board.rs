// Draft board widget: one column per team, one row per round.
//
// Cells show "#overall name (position)", colored by position group.
// Picked players are dimmed and struck through. The cursor cell is
// highlighted while the board has focus. Wide or tall boards scroll so
// the cursor stays visible.

use std::ops::Range;

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use snakeboard_core::draft::board::Slot;
use snakeboard_core::draft::player::PositionGroup;
use snakeboard_core::draft::picked::PickedSet;

use crate::tui::ViewState;

/// Width of each team column, including the gap.
const CELL_WIDTH: u16 = 22;
/// Width of the round label column.
const ROUND_WIDTH: u16 = 4;

/// Groups shown in the color legend.
const LEGEND: [PositionGroup; 6] = [
    PositionGroup::Quarterback,
    PositionGroup::RunningBack,
    PositionGroup::WideReceiver,
    PositionGroup::TightEnd,
    PositionGroup::Kicker,
    PositionGroup::Defense,
];

/// Text for one board cell: `#7 Gu (K)`, or `-` for an empty slot.
pub fn cell_text(overall_pick: usize, slot: &Slot) -> String {
    match slot {
        Slot::Player(p) => format!("#{} {} ({})", overall_pick, p.name, p.position),
        Slot::Empty => "-".to_string(),
    }
}

/// Foreground color for a position group.
pub fn position_color(group: PositionGroup) -> Color {
    match group {
        PositionGroup::Quarterback => Color::Red,
        PositionGroup::RunningBack => Color::Green,
        PositionGroup::WideReceiver => Color::Cyan,
        PositionGroup::TightEnd => Color::Yellow,
        PositionGroup::Kicker => Color::Magenta,
        PositionGroup::Defense => Color::Blue,
        PositionGroup::Other => Color::White,
    }
}

/// Style for a cell, before any cursor highlight.
pub fn cell_style(slot: &Slot, picked: &PickedSet) -> Style {
    match slot {
        Slot::Empty => Style::default().fg(Color::DarkGray),
        Slot::Player(p) if picked.contains(p.rank) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        Slot::Player(p) => Style::default().fg(position_color(p.group())),
    }
}

/// Position labels in their board colors, e.g. " QB RB WR TE K DST ".
pub fn legend_line() -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for group in LEGEND {
        spans.push(Span::styled(
            group.display_str(),
            Style::default().fg(position_color(group)),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Window of `visible` items out of `total` that contains `cursor`.
pub fn visible_range(total: usize, visible: usize, cursor: usize) -> Range<usize> {
    let visible = visible.max(1).min(total);
    let start = if cursor < visible { 0 } else { cursor + 1 - visible };
    let start = start.min(total.saturating_sub(visible));
    start..start + visible
}

/// Render the draft board into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, focused: bool) {
    let board = &state.snapshot.board;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(build_title(state))
        .title_bottom(legend_line());

    if board.is_empty() {
        let hint = if state.snapshot.error.is_some() {
            "Fix the highlighted line in the rankings to see the board."
        } else {
            "No players yet. Press e to edit the rankings or p to load a preset."
        };
        let paragraph = Paragraph::new(Line::from(hint))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2 + ROUND_WIDTH);
    // Borders plus the header row
    let inner_height = area.height.saturating_sub(3);
    let teams = visible_range(
        board.team_count(),
        (inner_width / CELL_WIDTH) as usize,
        state.cursor.team,
    );
    let rounds = visible_range(
        board.round_count(),
        inner_height as usize,
        state.cursor.round,
    );

    let header = Row::new(
        std::iter::once(Cell::from("Rd")).chain(
            board.teams()[teams.clone()]
                .iter()
                .map(|t| Cell::from(t.label.clone())),
        ),
    )
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = rounds
        .map(|round| {
            let cells = teams.clone().map(|team_index| {
                let slot = &board.teams()[team_index].slots[round];
                let mut style = cell_style(slot, &state.snapshot.picked);
                if focused && state.cursor.team == team_index && state.cursor.round == round {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(cell_text(board.overall_pick(round, team_index), slot)).style(style)
            });
            Row::new(
                std::iter::once(
                    Cell::from(format!("R{}", round + 1))
                        .style(Style::default().fg(Color::Gray)),
                )
                .chain(cells),
            )
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(ROUND_WIDTH))
        .chain(teams.map(|_| Constraint::Length(CELL_WIDTH - 1)));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn build_title(state: &ViewState) -> Line<'static> {
    let snapshot = &state.snapshot;
    let mut title = format!(
        " Board: {} teams x {} rounds ",
        snapshot.team_count,
        snapshot.board.round_count()
    );
    if let Some(p) = state.selected_player() {
        title.push_str(&format!("[{}] ", p));
    }
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
