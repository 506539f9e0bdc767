// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use snakeboard_core::config::MAX_TEAMS;

/// Snake draft board for pasted fantasy football rankings.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "snakeboard", version)]
pub struct Args {
    /// Number of teams (overrides config).
    #[arg(long, value_parser = parse_team_count)]
    pub teams: Option<usize>,

    /// Seed the ranking text from this file instead of the saved text.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Keep the ranking text in memory only.
    #[arg(long)]
    pub no_store: bool,

    /// Print the board as plain text and exit instead of starting the TUI.
    #[arg(long)]
    pub print: bool,
}

fn parse_team_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a whole number"))?;
    if n == 0 || n > MAX_TEAMS {
        return Err(format!("must be between 1 and {MAX_TEAMS}"));
    }
    Ok(n)
}
