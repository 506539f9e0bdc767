// Board session: the latest inputs and everything derived from them.
//
// Raw text and team count are the inputs. The parse result and the board
// are recomputed from scratch whenever either input changes. Picks are
// cleared whenever the parsed player sequence changes.

use tracing::debug;

use super::board::{assign_with_names, team_label, DraftBoard};
use super::parser::{parse, ParseError};
use super::picked::PickedSet;
use super::player::{PlayerRecord, PlayerSequence};

#[derive(Debug, Clone)]
pub struct BoardSession {
    text: String,
    team_count: usize,
    /// Caller-supplied team names; indices past the end use "Team N".
    team_names: Vec<String>,
    parsed: Result<PlayerSequence, ParseError>,
    board: DraftBoard,
    picked: PickedSet,
}

impl BoardSession {
    pub fn new(team_count: usize) -> Self {
        Self::with_team_names(team_count, Vec::new())
    }

    pub fn with_team_names(team_count: usize, team_names: Vec<String>) -> Self {
        BoardSession {
            text: String::new(),
            team_count,
            team_names,
            parsed: Ok(Vec::new()),
            board: DraftBoard::default(),
            picked: PickedSet::new(),
        }
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Replace the raw text and recompute.
    ///
    /// Returns `false` if the text is unchanged. Picks are kept only when
    /// the new text parses to exactly the same sequence as before.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }

        let parsed = parse(&text);
        let sequence_changed = match (&self.parsed, &parsed) {
            (Ok(old), Ok(new)) => old != new,
            _ => true,
        };

        self.text = text;
        self.parsed = parsed;
        self.rebuild();

        if sequence_changed {
            self.picked.clear();
        }

        debug!(
            "Text updated: {} players, error={}, picks reset={}",
            self.players().len(),
            self.parsed.is_err(),
            sequence_changed
        );
        true
    }

    /// Change the team count and rebuild the board. Picks are kept.
    pub fn set_team_count(&mut self, team_count: usize) -> bool {
        if team_count == self.team_count {
            return false;
        }
        self.team_count = team_count;
        self.rebuild();
        debug!(
            "Team count set to {}: {} rounds",
            team_count,
            self.board.round_count()
        );
        true
    }

    /// Flip the picked state of a player on the current board.
    ///
    /// Returns the new state, or `None` if no cell on the board has `rank`.
    pub fn toggle_picked(&mut self, rank: i64) -> Option<bool> {
        self.board.find_rank(rank)?;
        Some(self.picked.toggle(rank))
    }

    pub fn clear_picks(&mut self) {
        self.picked.clear();
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    /// Parsed players, or an empty slice when the text failed to parse.
    pub fn players(&self) -> &[PlayerRecord] {
        match &self.parsed {
            Ok(players) => players,
            Err(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.parsed.as_ref().err()
    }

    pub fn board(&self) -> &DraftBoard {
        &self.board
    }

    pub fn picked(&self) -> &PickedSet {
        &self.picked
    }

    /// Number of picked ranks that are on the current board.
    pub fn picked_count(&self) -> usize {
        self.players()
            .iter()
            .filter(|p| self.picked.contains(p.rank))
            .count()
    }

    /// Team labels for the current team count, one distinct label per team.
    ///
    /// Caller names are used positionally; a blank or repeated name, or a
    /// missing one, falls back to the first free `Team N` at or after the
    /// team's own number.
    pub fn team_labels(&self) -> Vec<String> {
        let mut labels: Vec<Option<String>> = Vec::with_capacity(self.team_count);
        for i in 0..self.team_count {
            let custom = self
                .team_names
                .get(i)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .filter(|n| !labels.iter().flatten().any(|taken| taken.as_str() == *n));
            labels.push(custom.map(str::to_string));
        }

        let mut next = 0;
        let mut taken: Vec<String> = labels.iter().flatten().cloned().collect();
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                label.unwrap_or_else(|| {
                    next = next.max(i);
                    while taken.contains(&team_label(next)) {
                        next += 1;
                    }
                    let fallback = team_label(next);
                    taken.push(fallback.clone());
                    fallback
                })
            })
            .collect()
    }

    fn rebuild(&mut self) {
        self.board = match &self.parsed {
            Ok(players) => assign_with_names(players, &self.team_labels()),
            Err(_) => DraftBoard::default(),
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
