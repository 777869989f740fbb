//! Default config bootstrap for `hueshell init`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE, STORE_FILE_NAME};
use super::GlobalConfigInitResult;

/// `<config root>/hueshell/hueshell.toml`.
pub fn default_global_config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// `<config root>/hueshell/storage.json`.
pub fn default_store_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(STORE_FILE_NAME))
}

fn app_dir() -> Option<PathBuf> {
    config_root_dir().map(|root| root.join(CONFIG_DIR_NAME))
}

/// Write the bundled template to [`default_global_config_path`].
pub fn initialize_default_global_config(
    force: bool,
) -> Result<GlobalConfigInitResult, ConfigError> {
    let Some(path) = default_global_config_path() else {
        return Err(ConfigError::Invalid(
            "no config directory found; set XDG_CONFIG_HOME or HOME".to_string(),
        ));
    };
    initialize_config_at_path(&path, force)
}

/// Write the bundled template to `path`.
///
/// An existing file is left alone unless `force` is set, in which case it is
/// copied to a timestamped `.bak` sibling before being replaced.
pub fn initialize_config_at_path(
    path: &Path,
    force: bool,
) -> Result<GlobalConfigInitResult, ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // create_new so two concurrent `init` runs cannot both write.
    let created = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes()));

    match created {
        Ok(()) => {
            info!(path = %path.display(), "wrote default config");
            Ok(GlobalConfigInitResult::Created {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && !force => {
            Ok(GlobalConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let backup_path = backup_path_for(path);
            fs::copy(path, &backup_path)?;
            fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
            info!(
                path = %path.display(),
                backup = %backup_path.display(),
                "replaced config"
            );
            Ok(GlobalConfigInitResult::Overwritten {
                path: path.to_path_buf(),
                backup_path,
            })
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// First free `<name>.<unix secs>[.<n>].bak` next to `path`.
fn backup_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    (0u32..1000)
        .map(|n| match n {
            0 => path.with_file_name(format!("{name}.{secs}.bak")),
            n => path.with_file_name(format!("{name}.{secs}.{n}.bak")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.with_file_name(format!("{name}.{secs}.{}.bak", std::process::id())))
}

/// `$XDG_CONFIG_HOME` when set and non-blank, else `~/.config`, else the
/// platform config dir.
pub fn config_root_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .or_else(dirs::config_dir)
}
