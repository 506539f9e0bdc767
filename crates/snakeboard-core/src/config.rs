// Configuration loading and parsing (config/snakeboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest league the board will lay out.
pub const MAX_TEAMS: usize = 32;

/// Upper bound on the save debounce window.
pub const MAX_SAVE_DEBOUNCE_MS: u64 = 10_000;

const CONFIG_FILE: &str = "snakeboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// snakeboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub presets: PresetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_team_count")]
    pub team_count: usize,
    /// Optional display names; when set, one per team.
    #[serde(default)]
    pub team_names: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            team_count: default_team_count(),
            team_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite file for the saved ranking text. Empty means the platform
    /// data directory.
    #[serde(default)]
    pub db_path: String,
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            db_path: String::new(),
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetsConfig {
    #[serde(default = "default_presets_dir")]
    pub dir: String,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        PresetsConfig {
            dir: default_presets_dir(),
        }
    }
}

fn default_team_count() -> usize {
    12
}

fn default_save_debounce_ms() -> u64 {
    500
}

fn default_presets_dir() -> String {
    "data/presets".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/snakeboard.toml` relative to `base_dir`.
///
/// This does not copy defaults. Prefer `load_config()` for the binary.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/snakeboard.toml` into `config/` if it is missing there.
/// Returns the copied path, if any.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() || !source.exists() {
        return Ok(None);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        // Raced with another process creating it
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Load config relative to `base_dir`, copying defaults first.
///
/// When neither `config/` nor `defaults/` provides a file, the built-in
/// defaults are returned.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    if !base_dir.join("config").join(CONFIG_FILE).exists() {
        return Ok(Config::default());
    }
    load_config_from(base_dir)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_in(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let board = &config.board;
    if board.team_count == 0 || board.team_count > MAX_TEAMS {
        return Err(ConfigError::ValidationError {
            field: "board.team_count".into(),
            message: format!("must be between 1 and {MAX_TEAMS}, got {}", board.team_count),
        });
    }

    if !board.team_names.is_empty() && board.team_names.len() != board.team_count {
        return Err(ConfigError::ValidationError {
            field: "board.team_names".into(),
            message: format!(
                "expected {} names to match team_count, got {}",
                board.team_count,
                board.team_names.len()
            ),
        });
    }

    if let Some(blank) = board.team_names.iter().position(|n| n.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: format!("board.team_names[{blank}]"),
            message: "must not be blank".into(),
        });
    }

    // Labels key the board columns, so they must be distinct
    for (i, name) in board.team_names.iter().enumerate() {
        let name = name.trim();
        if board.team_names[..i].iter().any(|earlier| earlier.trim() == name) {
            return Err(ConfigError::ValidationError {
                field: format!("board.team_names[{i}]"),
                message: format!("duplicate team name \"{name}\""),
            });
        }
    }

    if config.storage.save_debounce_ms > MAX_SAVE_DEBOUNCE_MS {
        return Err(ConfigError::ValidationError {
            field: "storage.save_debounce_ms".into(),
            message: format!(
                "must be at most {MAX_SAVE_DEBOUNCE_MS}, got {}",
                config.storage.save_debounce_ms
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
