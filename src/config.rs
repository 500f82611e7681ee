use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the directories under the user's config & data directories in
/// which the program's files are kept
const APP_DIR: &str = "autosnake";

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Gameplay settings
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read, if the file's contents
    /// could not be deserialized, or if a setting is out of range.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        Config::parse(&content)
    }

    fn parse(content: &str) -> Result<Config, ConfigError> {
        let config = toml::from_str::<Config>(content)?;
        config.game.validate()?;
        Ok(config)
    }
}

/// Settings controlling the board & gameplay
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    /// Width of the board in cells
    pub(crate) width: u16,

    /// Height of the board in cells, including the score bar rows
    pub(crate) height: u16,

    /// Number of entries shown on the leaderboard
    pub(crate) leaderboard_size: usize,

    /// Whether games start with the autopilot steering
    pub(crate) autopilot: bool,

    /// Whether typing `cheat_code` during a game toggles the autopilot
    pub(crate) cheats: bool,

    pub(crate) cheat_code: String,
}

impl GameConfig {
    const WIDTH_RANGE: std::ops::RangeInclusive<u16> = 8..=78;
    const HEIGHT_RANGE: std::ops::RangeInclusive<u16> = 7..=20;
    // The leaderboard screen needs five rows besides the entries
    const LEADERBOARD_SIZE_RANGE: std::ops::RangeInclusive<usize> = 1..=15;

    fn validate(&self) -> Result<(), ConfigError> {
        if !Self::WIDTH_RANGE.contains(&self.width) {
            return Err(ConfigError::Invalid {
                key: "game.width",
                reason: format!(
                    "must be between {} and {}, got {}",
                    Self::WIDTH_RANGE.start(),
                    Self::WIDTH_RANGE.end(),
                    self.width
                ),
            });
        }
        if !Self::HEIGHT_RANGE.contains(&self.height) {
            return Err(ConfigError::Invalid {
                key: "game.height",
                reason: format!(
                    "must be between {} and {}, got {}",
                    Self::HEIGHT_RANGE.start(),
                    Self::HEIGHT_RANGE.end(),
                    self.height
                ),
            });
        }
        if !Self::LEADERBOARD_SIZE_RANGE.contains(&self.leaderboard_size) {
            return Err(ConfigError::Invalid {
                key: "game.leaderboard-size",
                reason: format!(
                    "must be between {} and {}, got {}",
                    Self::LEADERBOARD_SIZE_RANGE.start(),
                    Self::LEADERBOARD_SIZE_RANGE.end(),
                    self.leaderboard_size
                ),
            });
        }
        if self.cheat_code.is_empty() {
            return Err(ConfigError::Invalid {
                key: "game.cheat-code",
                reason: String::from("must not be empty"),
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            width: 40,
            height: 20,
            leaderboard_size: 5,
            autopilot: false,
            cheats: false,
            cheat_code: String::from("solly"),
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path to the high score database
    database: Option<PathBuf>,

    /// Path to the log file
    log_file: Option<PathBuf>,

    /// Filter directive for log messages when `AUTOSNAKE_LOG` is not set
    pub(crate) log_level: String,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            database: None,
            log_file: None,
            log_level: String::from("info"),
        }
    }
}

impl FileConfig {
    /// Return the high score database path: the one given in the
    /// configuration or, if that is not set, the default location
    pub(crate) fn database_path(&self) -> Result<PathBuf, ConfigError> {
        self.database
            .clone()
            .map_or_else(|| data_file("highscores.db"), Ok)
    }

    pub(crate) fn set_database_path(&mut self, path: PathBuf) {
        self.database = Some(path);
    }

    /// Return the log file path: the one given in the configuration or, if
    /// that is not set, the default location
    pub(crate) fn log_path(&self) -> Result<PathBuf, ConfigError> {
        self.log_file
            .clone()
            .map_or_else(|| data_file("autosnake.log"), Ok)
    }
}

fn data_file(name: &str) -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR).join(name))
        .ok_or(ConfigError::NoDataPath)
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct RawFileConfig {
    database: Option<String>,
    log_file: Option<String>,
    log_level: String,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            database: None,
            log_file: None,
            log_level: String::from("info"),
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            database: value.database.map(expanduser::expanduser).transpose()?,
            log_file: value.log_file.map(expanduser::expanduser).transpose()?,
            log_level: value.log_level,
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to determine path to local data directory")]
    NoDataPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
