use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::activity::ActivityDefaults;
use crate::color::{ColorScale, Rgb};
use crate::error::{Error, ErrorKind, Result};
use crate::parse;
use crate::store::DEFAULT_MAX_ACTIVITIES;

const CONFIG_PATH_ENV_VAR: &str = "SPORTCAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("sportcal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".sportcal.toml"));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub file_prefix: String,
    pub activity_defaults: Option<PathBuf>,
    pub tile_size: u32,
    pub max_activities: usize,
    /// `"HH:MM"` threshold -> tile colour
    pub colors: BTreeMap<String, Rgb>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sportcal"),
            file_prefix: "activities".to_owned(),
            activity_defaults: None,
            tile_size: 22,
            max_activities: DEFAULT_MAX_ACTIVITIES,
            colors: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content).map_err(|e| {
            let msg = format!(
                "{} (in '{}')",
                e.message.as_deref().unwrap_or_default(),
                path.display()
            );
            e.with_msg(&msg)
        })
    }

    pub fn color_scale(&self) -> Result<ColorScale> {
        if self.colors.is_empty() {
            return Ok(ColorScale::default());
        }

        let steps = self
            .colors
            .iter()
            .map(|(threshold, color)| Ok((parse::parse_duration(threshold)?, *color)))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| Error::new(ErrorKind::Config, &format!("colour threshold: {}", e)))?;

        ColorScale::new(steps)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn activity_defaults(&self) -> Result<ActivityDefaults> {
        match &self.activity_defaults {
            Some(path) => ActivityDefaults::load(&self.resolve(path)),
            None => Ok(ActivityDefaults::default()),
        }
    }
}

/// Loads `explicit` if given, otherwise the first existing file of the
/// usual locations, otherwise the built-in defaults.
pub fn load_suitable_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|path| path.is_file())
    {
        Some(path) => {
            log::info!("Using config file '{}'", path.display());
            Config::load(&path)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
