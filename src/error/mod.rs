use crate::browser::SessionError;
use crate::library::LibraryError;
use crate::permission::PermissionError;
use crate::settings::SettingsError;
use crate::state::StateError;
use crate::storage::StorageError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("photo library location unknown: set library_dir in config.json or pass --library")]
    MissingLibraryDirectory,
}
