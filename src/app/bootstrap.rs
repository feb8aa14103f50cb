use std::path::{Path, PathBuf};

use crate::config::{config_env_dirs, load_app_config, AppConfig, StartupConfig};
use crate::error::{AppError, AppResult};
use crate::gesture::SwipeTuning;
use crate::library::PhotoQuery;
use crate::storage::{default_settings_dir, ConsentStore};

pub(super) struct AppBootstrap {
    pub(super) library_dir: PathBuf,
    pub(super) settings_dir: PathBuf,
    pub(super) consent: ConsentStore,
    pub(super) query: PhotoQuery,
    pub(super) tuning: SwipeTuning,
}

pub(super) fn bootstrap_app_runtime() -> AppResult<AppBootstrap> {
    let startup_config = StartupConfig::from_args();
    let app_config = load_app_config();
    let (xdg_config_home, home) = config_env_dirs();

    let library_dir = resolve_library_dir(&startup_config, &app_config, home.as_deref())?;
    let settings_dir = default_settings_dir(xdg_config_home.as_deref(), home.as_deref())?;
    let consent = ConsentStore::in_dir(&settings_dir);
    let query = PhotoQuery {
        first: app_config.max_photos(),
        ..PhotoQuery::default()
    };
    let tuning = app_config.swipe_tuning();

    tracing::info!(
        library = %library_dir.display(),
        settings = %settings_dir.display(),
        max_photos = query.first,
        "resolved runtime paths"
    );

    Ok(AppBootstrap {
        library_dir,
        settings_dir,
        consent,
        query,
        tuning,
    })
}

/// `--library` wins over `config.json`, which wins over `$HOME/Pictures`.
fn resolve_library_dir(
    startup_config: &StartupConfig,
    app_config: &AppConfig,
    home: Option<&Path>,
) -> AppResult<PathBuf> {
    startup_config
        .library_dir
        .clone()
        .or_else(|| app_config.library_dir(home))
        .ok_or(AppError::MissingLibraryDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_flag_overrides_config() {
        let startup = StartupConfig::parse(["--library=/flag".to_string()]);
        let config: AppConfig =
            serde_json::from_str(r#"{"library_dir": "/configured"}"#).expect("config");
        let dir = resolve_library_dir(&startup, &config, Some(Path::new("/home/u"))).expect("dir");
        assert_eq!(dir, PathBuf::from("/flag"));
    }

    #[test]
    fn falls_back_to_pictures_under_home() {
        let dir = resolve_library_dir(
            &StartupConfig::default(),
            &AppConfig::default(),
            Some(Path::new("/home/u")),
        )
        .expect("dir");
        assert_eq!(dir, PathBuf::from("/home/u/Pictures"));
    }

    #[test]
    fn no_home_and_no_override_is_an_error() {
        assert!(matches!(
            resolve_library_dir(&StartupConfig::default(), &AppConfig::default(), None),
            Err(AppError::MissingLibraryDirectory)
        ));
    }
}
