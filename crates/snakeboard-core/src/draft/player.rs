// Player records as they appear in a pasted ranking list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ranked player parsed from one input line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Draft priority as written in the input. Uniqueness is not enforced.
    pub rank: i64,
    /// Display name with internal whitespace collapsed to single spaces.
    pub name: String,
    /// Position token exactly as written (e.g. "RB", "WR12", "DST").
    pub position: String,
}

impl PlayerRecord {
    pub fn new(rank: i64, name: impl Into<String>, position: impl Into<String>) -> Self {
        PlayerRecord {
            rank,
            name: name.into(),
            position: position.into(),
        }
    }

    /// The coarse position group used for color coding.
    pub fn group(&self) -> PositionGroup {
        PositionGroup::from_token(&self.position)
    }
}

/// Renders the record in the parser's input format: `rank name position`.
impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rank, self.name, self.position)
    }
}

/// Ordered list of players in input line order.
pub type PlayerSequence = Vec<PlayerRecord>;

// ---------------------------------------------------------------------------
// Position groups
// ---------------------------------------------------------------------------

/// Fantasy football position families.
///
/// Ranking exports often suffix the position with a positional rank
/// ("WR3", "RB12"); those map to the same group as the bare token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionGroup {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Other,
}

impl PositionGroup {
    /// Classify a position token, ignoring case and any trailing digits.
    pub fn from_token(token: &str) -> Self {
        let base = token.trim_end_matches(|c: char| c.is_ascii_digit());
        match base.to_uppercase().as_str() {
            "QB" => PositionGroup::Quarterback,
            "RB" => PositionGroup::RunningBack,
            "WR" => PositionGroup::WideReceiver,
            "TE" => PositionGroup::TightEnd,
            "K" | "PK" => PositionGroup::Kicker,
            "DST" | "DEF" | "D/ST" | "DST/D" => PositionGroup::Defense,
            _ => PositionGroup::Other,
        }
    }

    /// Short label used in the board legend.
    pub fn display_str(&self) -> &'static str {
        match self {
            PositionGroup::Quarterback => "QB",
            PositionGroup::RunningBack => "RB",
            PositionGroup::WideReceiver => "WR",
            PositionGroup::TightEnd => "TE",
            PositionGroup::Kicker => "K",
            PositionGroup::Defense => "DST",
            PositionGroup::Other => "--",
        }
    }
}
