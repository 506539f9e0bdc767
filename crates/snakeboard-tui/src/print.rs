// Plain-text board rendering for `--print`.
//
// One column per team, one row per round:
//
//       Team 1      Team 2      Team 3
//   R1  #1 Al (QB)  #2 Bo (RB)  #3 Cy (WR)
//   R2  #6 Fy (WR)  #5 Ed (RB)  #4 Di (TE)
//   R3  #7 Gu (K)   -           -

use std::iter;

use snakeboard_core::draft::board::{DraftBoard, Slot};
use snakeboard_core::draft::parser::ParseError;
use snakeboard_core::draft::picked::PickedSet;
use snakeboard_core::draft::session::BoardSession;

use crate::tui::widgets::board::cell_text;

const COLUMN_GAP: &str = "  ";

/// Suffix marking a picked player.
const PICKED_MARK: &str = " *";

/// Render the board as an aligned text grid.
pub fn render_text(board: &DraftBoard, picked: &PickedSet) -> String {
    if board.is_empty() {
        return "(empty board)\n".to_string();
    }

    let rounds = board.round_count();
    let row_label_width = format!("R{rounds}").len();

    // columns[team][round]
    let columns: Vec<Vec<String>> = board
        .teams()
        .iter()
        .enumerate()
        .map(|(team_index, team)| {
            team.slots
                .iter()
                .enumerate()
                .map(|(round, slot)| {
                    let mut text = cell_text(board.overall_pick(round, team_index), slot);
                    if let Slot::Player(p) = slot {
                        if picked.contains(p.rank) {
                            text.push_str(PICKED_MARK);
                        }
                    }
                    text
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .zip(board.teams())
        .map(|(cells, team)| {
            cells
                .iter()
                .map(|c| c.chars().count())
                .chain(iter::once(team.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();

    let mut header = " ".repeat(row_label_width);
    for (team, width) in board.teams().iter().zip(&widths) {
        header.push_str(COLUMN_GAP);
        header.push_str(&pad(&team.label, *width));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for round in 0..rounds {
        let mut line = pad(&format!("R{}", round + 1), row_label_width);
        for (cells, width) in columns.iter().zip(&widths) {
            line.push_str(COLUMN_GAP);
            line.push_str(&pad(&cells[round], *width));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Render the session's board, or its parse error.
pub fn render_session(session: &BoardSession) -> Result<String, ParseError> {
    match session.error() {
        Some(e) => Err(e.clone()),
        None => Ok(render_text(session.board(), session.picked())),
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}
