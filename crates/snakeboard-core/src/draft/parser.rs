// Ranking text parser.
//
// One player per line: `rank name... position`, whitespace separated.
// Blank lines are skipped. The first bad line aborts the whole parse.

use thiserror::Error;

use super::player::{PlayerRecord, PlayerSequence};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A user-input error pinned to the offending line.
///
/// `line` is the trimmed line text; `line_number` is 1-based and counts
/// blank lines, so it matches what the user sees in an editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line_number}: expected `rank name position`, got \"{line}\"")]
    MalformedLine { line_number: usize, line: String },

    #[error("line {line_number}: rank is not a whole number in \"{line}\"")]
    InvalidRank { line_number: usize, line: String },

    #[error("line {line_number}: missing player name or position in \"{line}\"")]
    InvalidFormat { line_number: usize, line: String },
}

impl ParseError {
    /// The offending line, verbatim after trimming.
    pub fn line(&self) -> &str {
        match self {
            ParseError::MalformedLine { line, .. }
            | ParseError::InvalidRank { line, .. }
            | ParseError::InvalidFormat { line, .. } => line,
        }
    }

    pub fn line_number(&self) -> usize {
        match self {
            ParseError::MalformedLine { line_number, .. }
            | ParseError::InvalidRank { line_number, .. }
            | ParseError::InvalidFormat { line_number, .. } => *line_number,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse ranking text into a player sequence.
///
/// All-or-nothing: the first malformed line is returned as the error and no
/// players survive. Ranks are neither sorted nor deduplicated.
pub fn parse(text: &str) -> Result<PlayerSequence, ParseError> {
    non_blank_lines(text)
        .map(|(line_number, line)| parse_line(line_number, line))
        .collect()
}

/// Parse every line, collecting good records and all errors.
///
/// Diagnostic only: board construction goes through [`parse`], which keeps
/// the abort-on-first-error contract.
pub fn parse_all(text: &str) -> (PlayerSequence, Vec<ParseError>) {
    let mut players = Vec::new();
    let mut errors = Vec::new();
    for (line_number, line) in non_blank_lines(text) {
        match parse_line(line_number, line) {
            Ok(player) => players.push(player),
            Err(e) => errors.push(e),
        }
    }
    (players, errors)
}

/// Render a sequence back into parser input, one record per line.
pub fn to_text(players: &[PlayerRecord]) -> String {
    players
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert CRLF and lone CR line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn parse_line(line_number: usize, line: &str) -> Result<PlayerRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::MalformedLine {
            line_number,
            line: line.to_string(),
        });
    }

    let rank = tokens[0]
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidRank {
            line_number,
            line: line.to_string(),
        })?;

    let last = tokens.len() - 1;
    let position = tokens[last];
    let name = tokens[1..last].join(" ");

    if name.is_empty() || position.is_empty() {
        return Err(ParseError::InvalidFormat {
            line_number,
            line: line.to_string(),
        });
    }

    Ok(PlayerRecord {
        rank,
        name,
        position: position.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
