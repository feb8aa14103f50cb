use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::gesture::{SpringConfig, SwipeTuning};
use crate::library::DEFAULT_MAX_PHOTOS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

pub(crate) const APP_DIR: &str = "swiper";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_LIBRARY_SUBDIR: &str = "Pictures";

/// Optional overrides for the swipe feel.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct SwipeOverrides {
    #[serde(default)]
    pub(crate) threshold_fraction: Option<f64>,
    #[serde(default)]
    pub(crate) rotation_multiplier: Option<f64>,
    #[serde(default)]
    pub(crate) exit_duration_ms: Option<u64>,
    #[serde(default)]
    pub(crate) spring_tension: Option<f64>,
    #[serde(default)]
    pub(crate) spring_friction: Option<f64>,
}

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub(crate) library_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) max_photos: Option<usize>,
    #[serde(default)]
    pub(crate) swipe: SwipeOverrides,
}

impl AppConfig {
    pub(crate) fn max_photos(&self) -> usize {
        match self.max_photos {
            Some(0) => {
                tracing::warn!("max_photos must be positive; using default");
                DEFAULT_MAX_PHOTOS
            }
            Some(value) => value,
            None => DEFAULT_MAX_PHOTOS,
        }
    }

    /// Configured library directory, else `$HOME/Pictures`.
    pub(crate) fn library_dir(&self, home: Option<&Path>) -> Option<PathBuf> {
        self.library_dir
            .clone()
            .or_else(|| home.map(|home| home.join(DEFAULT_LIBRARY_SUBDIR)))
    }

    pub(crate) fn swipe_tuning(&self) -> SwipeTuning {
        let mut tuning = SwipeTuning::default();
        let overrides = self.swipe;

        if let Some(value) = overrides.threshold_fraction {
            if value > 0.0 && value <= 1.0 {
                tuning.threshold_fraction = value;
            } else {
                tracing::warn!(value, "threshold_fraction must be in (0, 1]; ignoring");
            }
        }
        if let Some(value) = overrides.rotation_multiplier {
            if value.is_finite() && value >= 0.0 {
                tuning.rotation_multiplier = value;
            } else {
                tracing::warn!(value, "rotation_multiplier must be non-negative; ignoring");
            }
        }
        if let Some(value) = overrides.exit_duration_ms {
            tuning.exit_duration = Duration::from_millis(value);
        }
        let spring = SpringConfig {
            tension: overrides
                .spring_tension
                .unwrap_or(tuning.spring.tension),
            friction: overrides
                .spring_friction
                .unwrap_or(tuning.spring.friction),
        };
        if spring.stiffness() > 0.0 && spring.damping() > 0.0 {
            tuning.spring = spring;
        } else {
            tracing::warn!(
                tension = spring.tension,
                friction = spring.friction,
                "spring parameters would not settle; ignoring"
            );
        }

        tuning
    }
}

pub(crate) fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = app_config_dir(app_dir, xdg_config_home, home)?;
    path.push(file_name);
    Ok(path)
}

pub(crate) fn app_config_dir(
    app_dir: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

/// Command-line overrides applied on top of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StartupConfig {
    pub(crate) library_dir: Option<PathBuf>,
}

impl StartupConfig {
    pub(crate) fn from_args() -> Self {
        Self::parse(std::env::args_os().skip(1).map(|arg| arg.to_string_lossy().into_owned()))
    }

    pub(crate) fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if let Some(value) = arg.strip_prefix("--library=") {
                config.library_dir = Some(PathBuf::from(value));
            } else if arg == "--library" {
                match args.next() {
                    Some(value) => config.library_dir = Some(PathBuf::from(value)),
                    None => tracing::warn!("--library expects a directory argument"),
                }
            } else {
                tracing::debug!(%arg, "ignoring unknown startup argument");
            }
        }
        config
    }
}
