use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Length of every work phase, in seconds
pub const WORK_DURATION_SECS: u32 = 5;
/// Length of every break phase, in seconds
pub const BREAK_DURATION_SECS: u32 = 3;
/// Number of (work, break) sessions in one workout
pub const NUMBER_OF_SESSIONS: u32 = 3;

const SETTINGS_FILE: &str = "config.toml";

/// Get the config directory for cadence.
///
/// # Errors
///
/// Returns an error if the user config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or(Error::NoConfigDir)?;
    path.push("cadence");
    Ok(path)
}

/// Shape of a workout, fixed when the engine is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutConfig {
    work_duration: u32,
    break_duration: u32,
    number_of_sessions: u32,
}

impl WorkoutConfig {
    /// Build a workout shape, rejecting zero durations and counts
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDuration`] naming the first field that is zero
    pub fn new(work_duration: u32, break_duration: u32, number_of_sessions: u32) -> Result<Self> {
        for (field, value) in [
            ("work_duration", work_duration),
            ("break_duration", break_duration),
            ("number_of_sessions", number_of_sessions),
        ] {
            if value == 0 {
                return Err(Error::InvalidDuration { field });
            }
        }

        Ok(Self {
            work_duration,
            break_duration,
            number_of_sessions,
        })
    }

    #[must_use]
    pub const fn work_duration(&self) -> u32 {
        self.work_duration
    }

    #[must_use]
    pub const fn break_duration(&self) -> u32 {
        self.break_duration
    }

    #[must_use]
    pub const fn number_of_sessions(&self) -> u32 {
        self.number_of_sessions
    }

    /// Total number of one-second frames in the workout
    #[must_use]
    pub const fn total_frames(&self) -> u32 {
        self.number_of_sessions * (self.work_duration + self.break_duration)
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            work_duration: WORK_DURATION_SECS,
            break_duration: BREAK_DURATION_SECS,
            number_of_sessions: NUMBER_OF_SESSIONS,
        }
    }
}

/// How the terminal front-end prints frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User settings for the front-end. Workout durations are not settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Print a line every time a work session is completed
    pub announce_sessions: bool,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            announce_sessions: true,
            output: OutputFormat::Text,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join(SETTINGS_FILE))
    }

    /// Load settings from `path`, falling back to defaults when the file is missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&raw).map_err(|source| Error::ParseSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render settings in the on-disk TOML format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write settings to `path`, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = self.to_toml()?;
        fs::write(path, data).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
