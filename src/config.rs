use crate::consts;
use crate::difficulty::Difficulty;
use crate::stats::Stats;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings read from `config.toml`
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Gameplay settings
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Where the stats & log live
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// `config.toml` in the `gridsnake` folder of the local configuration
    /// directory
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Parse the TOML file at `path`.  A file that doesn't exist yields the
    /// default configuration when `allow_missing` is set and is an error
    /// otherwise.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        match fs_err::read_to_string(path) {
            Ok(src) => Ok(toml::from_str(&src)?),
            Err(e) if allow_missing && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Return the filepath at which stats should be stored: the file given in
    /// the configuration or, if that is not set, the default stats file path.
    /// Returns `None` if stats saving is disabled or no path could be
    /// determined.
    pub(crate) fn stats_file(&self) -> Option<PathBuf> {
        if !self.files.save_stats {
            return None;
        }
        self.files.stats_file.clone().or_else(Stats::default_path)
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub(crate) struct GameConfig {
    /// Difficulty selected at startup
    pub(crate) difficulty: Difficulty,

    /// Number of cells along each side of the board
    pub(crate) grid_size: u16,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            difficulty: Difficulty::default(),
            grid_size: consts::DEFAULT_GRID_SIZE,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawGameConfig {
    difficulty: Difficulty,
    grid_size: u16,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        RawGameConfig {
            difficulty: Difficulty::default(),
            grid_size: consts::DEFAULT_GRID_SIZE,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GridSizeError;

    fn try_from(value: RawGameConfig) -> Result<GameConfig, GridSizeError> {
        if !(consts::MIN_GRID_SIZE..=consts::MAX_GRID_SIZE).contains(&value.grid_size) {
            return Err(GridSizeError(value.grid_size));
        }
        Ok(GameConfig {
            difficulty: value.difficulty,
            grid_size: value.grid_size,
        })
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which stats should be stored
    pub(crate) stats_file: Option<PathBuf>,

    /// Whether to load & save stats in a file
    pub(crate) save_stats: bool,

    /// File to write log messages to.  Nothing is logged if this is unset.
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            stats_file: None,
            save_stats: true,
            log_file: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error(
    "grid size {0} is out of range; must be between {min} and {max}",
    min = consts::MIN_GRID_SIZE,
    max = consts::MAX_GRID_SIZE
)]
pub(crate) struct GridSizeError(u16);

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not locate the local configuration directory")]
    NoPath,
    #[error("could not read configuration file")]
    Read(#[from] std::io::Error),
    #[error("invalid configuration file")]
    Parse(#[from] toml::de::Error),
}
