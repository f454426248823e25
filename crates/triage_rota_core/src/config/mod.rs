//! Rota configuration loading and validation.
//!
//! # Responsibility
//! - Parse the YAML config file into typed settings.
//! - Resolve every on-disk location into an explicit `RotaPaths` value that is
//!   passed to repositories and services.
//!
//! # Invariants
//! - A loaded config always has a non-empty roster.
//! - Relative paths from the config file resolve against the directory
//!   containing it; a relative `TRIAGE_ROTA_OUTPUT_DIR` resolves against the
//!   working directory.
//!
//! # See also
//! - README.md (config file reference)

mod component;
mod roster;

pub use component::{ComponentFilter, ComponentFilterError};
pub use roster::{Roster, RosterEntry, RosterError};

use chrono::Weekday;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "triage-rota.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "TRIAGE_ROTA_CONFIG";
/// Environment variable overriding `paths.output_dir`.
pub const OUTPUT_DIR_ENV_VAR: &str = "TRIAGE_ROTA_OUTPUT_DIR";
/// Environment variable for the log level.
pub const LOG_ENV_VAR: &str = "TRIAGE_ROTA_LOG";

const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_CALENDAR_NAME: &str = "Triage Duty";
const DEFAULT_QUERY_BASE_URL: &str = "https://bugzilla.mozilla.org/buglist.cgi";
const DEFAULT_HISTORY_FILE: &str = "history.json";
const DEFAULT_OUTPUT_DIR: &str = "public";
const DEFAULT_SNAPSHOT_FILE: &str = "triage.json";
const DEFAULT_CALENDAR_FILE: &str = "triage.ics";

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// YAML did not match the expected structure.
    Parse(String),
    /// Roster has no entries.
    EmptyRoster,
    /// A required string setting is blank.
    BlankSetting(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileRead { path, source } => {
                write!(f, "failed to read config file `{}`: {source}", path.display())
            }
            Self::Parse(message) => write!(f, "failed to parse config: {message}"),
            Self::EmptyRoster => write!(f, "config roster must list at least one person"),
            Self::BlankSetting(name) => write!(f, "config setting `{name}` must not be blank"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

/// Rotation and calendar presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// Weekday every cycle starts on.
    pub cycle_weekday: Weekday,
    /// IANA timezone name advertised by the calendar.
    pub timezone: String,
    /// Calendar display name.
    pub calendar_name: String,
    /// Bug-tracker search endpoint used for triage links.
    pub query_base_url: String,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            cycle_weekday: Weekday::Sun,
            timezone: DEFAULT_TIMEZONE.to_string(),
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            query_base_url: DEFAULT_QUERY_BASE_URL.to_string(),
        }
    }
}

/// File locations as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub history: PathBuf,
    pub output_dir: PathBuf,
    /// File name inside `output_dir`.
    pub snapshot_file: String,
    /// File name inside `output_dir`.
    pub calendar_file: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            history: PathBuf::from(DEFAULT_HISTORY_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            calendar_file: DEFAULT_CALENDAR_FILE.to_string(),
        }
    }
}

/// External publish command (argv). The output directory is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    pub command: Vec<String>,
}

/// Resolved on-disk locations used by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaPaths {
    pub history: PathBuf,
    pub output_dir: PathBuf,
    pub snapshot: PathBuf,
    pub calendar: PathBuf,
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RotaConfig {
    pub roster: Roster,
    #[serde(default)]
    pub components: Vec<ComponentFilter>,
    #[serde(default)]
    pub rotation: RotationSettings,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub publish: PublishSettings,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// Output directory taken from `TRIAGE_ROTA_OUTPUT_DIR`, used as given.
    #[serde(skip)]
    pub output_dir_override: Option<PathBuf>,
}

impl RotaConfig {
    /// Loads config from `explicit`, else `$TRIAGE_ROTA_CONFIG`, else
    /// `triage-rota.yaml` in the working directory, then applies env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var_os(CONFIG_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        };

        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads and validates config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parses and validates config from YAML text. `base_dir` stays empty.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants not expressible through serde alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if self.rotation.timezone.trim().is_empty() {
            return Err(ConfigError::BlankSetting("rotation.timezone"));
        }
        if self.rotation.calendar_name.trim().is_empty() {
            return Err(ConfigError::BlankSetting("rotation.calendar_name"));
        }
        if self.rotation.query_base_url.trim().is_empty() {
            return Err(ConfigError::BlankSetting("rotation.query_base_url"));
        }
        if self.paths.snapshot_file.trim().is_empty() {
            return Err(ConfigError::BlankSetting("paths.snapshot_file"));
        }
        if self.paths.calendar_file.trim().is_empty() {
            return Err(ConfigError::BlankSetting("paths.calendar_file"));
        }
        Ok(())
    }

    /// Resolves configured locations against `base_dir`.
    pub fn paths(&self) -> RotaPaths {
        let output_dir = match &self.output_dir_override {
            Some(dir) => dir.clone(),
            None => self.base_dir.join(&self.paths.output_dir),
        };
        RotaPaths {
            history: self.base_dir.join(&self.paths.history),
            snapshot: output_dir.join(&self.paths.snapshot_file),
            calendar: output_dir.join(&self.paths.calendar_file),
            output_dir,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(dir) = std::env::var_os(OUTPUT_DIR_ENV_VAR) {
            if !dir.is_empty() {
                self.output_dir_override = Some(PathBuf::from(dir));
            }
        }
    }
}
