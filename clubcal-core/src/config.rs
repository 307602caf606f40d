//! Global clubcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::layout::DEFAULT_MAX_EVENTS_PER_DAY;

static DEFAULT_DATA_FILE: &str = "~/clubcal/calendar.toml";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn is_default_data_file(p: &PathBuf) -> bool {
    *p == default_data_file()
}

fn default_max_events_per_day() -> usize {
    DEFAULT_MAX_EVENTS_PER_DAY
}

/// Global configuration at ~/.config/clubcal/config.toml
///
/// Every key can be overridden with a `CLUBCAL_` environment variable,
/// e.g. `CLUBCAL_MAX_EVENTS_PER_DAY=5`. The saved filter selection lives
/// next to it in filter.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClubcalConfig {
    #[serde(default = "default_data_file", skip_serializing_if = "is_default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_max_events_per_day")]
    pub max_events_per_day: usize,
}

impl Default for ClubcalConfig {
    fn default() -> Self {
        ClubcalConfig {
            data_file: default_data_file(),
            max_events_per_day: DEFAULT_MAX_EVENTS_PER_DAY,
        }
    }
}

impl ClubcalConfig {
    pub fn config_dir() -> CalendarResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("clubcal"))
    }

    pub fn config_path() -> CalendarResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Where the persisted filter selection is stored.
    pub fn filter_path() -> CalendarResult<PathBuf> {
        Ok(Self::config_dir()?.join("filter.toml"))
    }

    /// Load the global config, writing a commented default on first run.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file (missing files give defaults).
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        Self::load_with_env(path, Environment::with_prefix("CLUBCAL"))
    }

    fn load_with_env(path: &Path, env: Environment) -> CalendarResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env.try_parsing(true))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Save the current config to ~/.config/clubcal/config.toml
    pub fn save(&self) -> CalendarResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Data file path with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# clubcal configuration

# Districts, zones, clubs and events:
# data_file = \"{}\"

# Single-day events listed per day before \"+N more\":
# max_events_per_day = {}
",
            DEFAULT_DATA_FILE, DEFAULT_MAX_EVENTS_PER_DAY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_default_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clubcal").join("config.toml");

        ClubcalConfig::create_default_config(&path).unwrap();
        let config = ClubcalConfig::load_from(&path).unwrap();

        assert_eq!(config.data_file, default_data_file());
        assert_eq!(config.max_events_per_day, DEFAULT_MAX_EVENTS_PER_DAY);
    }

    #[test]
    fn test_load_explicit_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_file = \"/srv/club/events.toml\"\nmax_events_per_day = 5\n")
            .unwrap();

        let config = ClubcalConfig::load_from(&path).unwrap();

        assert_eq!(config.data_path(), PathBuf::from("/srv/club/events.toml"));
        assert_eq!(config.max_events_per_day, 5);
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        Environment::with_prefix("CLUBCAL").source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_events_per_day = 5\n").unwrap();

        let config = ClubcalConfig::load_with_env(
            &path,
            env(&[
                ("CLUBCAL_MAX_EVENTS_PER_DAY", "2"),
                ("CLUBCAL_DATA_FILE", "/tmp/club.toml"),
                ("OTHER_MAX_EVENTS_PER_DAY", "9"),
            ]),
        )
        .unwrap();

        assert_eq!(config.max_events_per_day, 2);
        assert_eq!(config.data_path(), PathBuf::from("/tmp/club.toml"));
    }

    #[test]
    fn test_bad_environment_value_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let result =
            ClubcalConfig::load_with_env(&path, env(&[("CLUBCAL_MAX_EVENTS_PER_DAY", "lots")]));

        assert!(matches!(result, Err(CalendarError::Config(_))));
    }

    #[test]
    fn test_default_data_file_not_serialized() {
        let content = toml::to_string_pretty(&ClubcalConfig::default()).unwrap();
        assert!(!content.contains("data_file"));
        assert!(content.contains("max_events_per_day = 3"));
    }
}
