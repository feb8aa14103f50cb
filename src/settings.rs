use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

const OPEN_COMMAND: &str = "xdg-open";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to prepare settings directory: {path}")]
    PrepareDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

pub trait SettingsLauncher {
    /// Fire-and-forget: returns once the opener has been spawned.
    fn open_settings(&self) -> SettingsResult<()>;
}

/// Opens the settings directory (config and consent record) in the desktop
/// file manager.
#[derive(Debug, Clone)]
pub struct XdgSettingsLauncher {
    target: PathBuf,
    command: String,
}

impl XdgSettingsLauncher {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            command: OPEN_COMMAND.to_string(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }
}

impl SettingsLauncher for XdgSettingsLauncher {
    fn open_settings(&self) -> SettingsResult<()> {
        std::fs::create_dir_all(&self.target).map_err(|source| {
            SettingsError::PrepareDirectory {
                path: self.target.clone(),
                source,
            }
        })?;

        let mut child = Command::new(&self.command)
            .arg(&self.target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SettingsError::CommandIo {
                command: self.command.clone(),
                source,
            })?;
        tracing::info!(dir = %self.target.display(), "opened settings");

        let command = self.command.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(%command, %status, "settings opener exited with failure");
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(%command, ?err, "failed to wait for settings opener"),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_target(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("swiper-settings-{name}-{}", std::process::id()))
    }

    #[test]
    fn missing_opener_is_a_command_error() {
        let launcher = XdgSettingsLauncher::new(scratch_target("missing"))
            .with_command("swiper-definitely-not-a-command");
        assert!(matches!(
            launcher.open_settings(),
            Err(SettingsError::CommandIo { .. })
        ));
    }

    #[test]
    fn open_settings_creates_target_and_spawns_opener() {
        let target = scratch_target("spawn");
        let _ = std::fs::remove_dir_all(&target);
        let launcher = XdgSettingsLauncher::new(&target).with_command("true");
        launcher.open_settings().expect("spawn opener");
        assert!(target.is_dir());
    }
}
