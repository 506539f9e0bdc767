// Ranking presets: named ranking lists shipped as files.
//
// `*.txt` files are used verbatim as ranking text. `*.csv` files need a
// header with rank, name and position columns; other columns are ignored.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::draft::parser::{normalize_line_endings, parse, to_text, ParseError};
use crate::draft::player::PlayerRecord;

/// Name of the built-in preset that is always available.
pub const SAMPLE_NAME: &str = "Sample";

const SAMPLE_TEXT: &str = "\
1 Ja'Marr Chase WR
2 Bijan Robinson RB
3 Justin Jefferson WR
4 Saquon Barkley RB
5 Jahmyr Gibbs RB
6 CeeDee Lamb WR
7 Puka Nacua WR
8 Malik Nabers WR
9 Amon-Ra St. Brown WR
10 Christian McCaffrey RB
11 Ashton Jeanty RB
12 Derrick Henry RB
13 Nico Collins WR
14 Brian Thomas Jr. WR
15 De'Von Achane RB
16 Brock Bowers TE
17 Josh Jacobs RB
18 Jonathan Taylor RB
19 A.J. Brown WR
20 Drake London WR
21 Bucky Irving RB
22 Trey McBride TE
23 Josh Allen QB
24 Lamar Jackson QB
";

/// A named ranking list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unsupported preset file {path}")]
    Unsupported { path: String },

    #[error("invalid rankings in {path}: {source}")]
    Invalid { path: String, source: ParseError },
}

/// CSV ranking row. Header names vary between exports.
#[derive(Debug, Deserialize)]
struct RawRankingRow {
    #[serde(alias = "Rank", alias = "RANK", alias = "rk", alias = "RK")]
    rank: i64,
    #[serde(alias = "Name", alias = "NAME", alias = "player", alias = "Player")]
    name: String,
    #[serde(alias = "Position", alias = "POSITION", alias = "pos", alias = "Pos", alias = "POS")]
    position: String,
}

/// The built-in sample preset.
pub fn sample() -> Preset {
    Preset {
        name: SAMPLE_NAME.to_string(),
        text: SAMPLE_TEXT.to_string(),
    }
}

/// Load every preset in `dir`, sorted by name, with the sample first.
///
/// A missing directory yields just the sample. Unreadable files are
/// logged and skipped so one bad export does not hide the rest.
pub fn load_dir(dir: &Path) -> Result<Vec<Preset>, PresetError> {
    let mut presets = Vec::new();

    if dir.is_dir() {
        let entries = std::fs::read_dir(dir).map_err(|e| PresetError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("Skipping unreadable preset entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !path.is_file() || !is_preset_file(&path) {
                continue;
            }
            match load_file(&path) {
                Ok(preset) => presets.push(preset),
                Err(e) => warn!("Skipping preset: {}", e),
            }
        }
    }

    presets.sort_by(|a, b| a.name.cmp(&b.name));
    presets.insert(0, sample());
    info!("Loaded {} ranking presets from {}", presets.len(), dir.display());
    Ok(presets)
}

/// Load a single preset file. The preset name is the file stem.
pub fn load_file(path: &Path) -> Result<Preset, PresetError> {
    let path_str = path.display().to_string();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("preset")
        .to_string();

    let text = match extension(path).as_deref() {
        Some("txt") => std::fs::read_to_string(path).map_err(|e| PresetError::Io {
            path: path_str.clone(),
            source: e,
        })?,
        Some("csv") => {
            let file = std::fs::File::open(path).map_err(|e| PresetError::Io {
                path: path_str.clone(),
                source: e,
            })?;
            csv_to_text(file).map_err(|e| PresetError::Csv {
                path: path_str.clone(),
                source: e,
            })?
        }
        _ => return Err(PresetError::Unsupported { path: path_str }),
    };
    let text = normalize_line_endings(&text);

    // A preset that cannot be parsed would blank the board when loaded
    parse(&text).map_err(|e| PresetError::Invalid {
        path: path_str,
        source: e,
    })?;

    Ok(Preset { name, text })
}

/// Convert CSV rankings into parser input, one `rank name position` per row.
pub fn csv_to_text<R: std::io::Read>(reader: R) -> Result<String, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut players = Vec::new();
    for row in rdr.deserialize::<RawRankingRow>() {
        let row = row?;
        players.push(PlayerRecord::new(row.rank, row.name, row.position));
    }
    Ok(to_text(&players))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_preset_file(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("txt") | Some("csv"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
