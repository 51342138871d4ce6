//! Provider configuration
//!
//! One `ProviderConfig` is built at process start and passed by reference
//! into the boot pipeline. Nothing here is global or lazily initialized;
//! the defaults encode how a stock Wildermyth install is laid out.

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Filename of the shipped game archive
pub const GAME_ARCHIVE_NAME: &str = "wildermyth.jar";

/// Classes that may hold the game's static entrypoint, in probe order
pub const ENTRYPOINT_CLASSES: &[&str] = &["com.worldwalkergames.legacy.LegacyDesktop"];

/// Filename substring marking a locally built artifact of the same product
/// family, which must not shadow the shipped jar
pub const DEV_ARTIFACT_MARKER: &str = "wilderforge-";

/// Filename prefix of archives shipped by the hosting runtime itself
pub const FRAMEWORK_PREFIX: &str = "fabric-";

/// Path segment identifying the hosting runtime's own directory
pub const FRAMEWORK_DIR_SEGMENT: &str = "fabric";

/// Filename prefix of this provider's own packaging
pub const PROVIDER_PREFIX: &str = "provider";

/// File holding the game version; first whitespace token is the version
pub const VERSION_FILE: &str = "version.txt";

/// Boot-time configuration for the provider pipeline
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Directory the game is launched from
    pub launch_dir: PathBuf,
    /// Directory holding stable third-party jars; created when absent
    pub lib_dir: PathBuf,
    /// Explicit game archive path, overriding `<launch_dir>/wildermyth.jar`
    pub game_archive: Option<PathBuf>,
    /// Fully qualified entrypoint candidates, probed in order
    pub entrypoint_candidates: Vec<String>,
    /// Development environment flag
    pub development: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ProviderConfig {
    /// Configuration rooted at the given launch directory
    pub fn new<P: AsRef<Path>>(launch_dir: P) -> Self {
        let launch_dir = launch_dir.as_ref().to_path_buf();
        let lib_dir = launch_dir.join("lib");
        Self {
            launch_dir,
            lib_dir,
            game_archive: None,
            entrypoint_candidates: ENTRYPOINT_CLASSES.iter().map(|s| s.to_string()).collect(),
            development: false,
        }
    }

    pub fn with_game_archive<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.game_archive = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Resolve the game archive path (override or launch-directory default)
    pub fn game_archive_path(&self) -> PathBuf {
        self.game_archive
            .clone()
            .unwrap_or_else(|| self.launch_dir.join(GAME_ARCHIVE_NAME))
    }
}

/// Persisted provider settings (`provider.json`)
///
/// Load-or-create: a missing file is written out with defaults rather than
/// treated as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Workshop coremod loading, retained for settings-file compatibility.
    /// Always treated as disabled.
    #[serde(default)]
    pub enable_workshop_coremods: bool,
}

impl ProviderSettings {
    pub fn workshop_coremods_enabled(&self) -> bool {
        false
    }

    /// Read settings from `path`, creating the file with defaults if absent
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|source| ProviderError::InvalidSettings {
                path: path.to_path_buf(),
                source,
            })
        } else {
            info!(path = %path.display(), "settings file doesn't exist, creating it");
            let settings = Self::default();
            let json = serde_json::to_string_pretty(&settings)
                .map_err(|source| ProviderError::InvalidSettings {
                    path: path.to_path_buf(),
                    source,
                })?;
            fs::write(path, json)?;
            Ok(settings)
        }
    }
}

/// Read the game version from `<launch_dir>/version.txt`
///
/// The version is the first whitespace-delimited token of the file. A
/// missing or empty file is a fatal configuration error naming the file, so
/// an operator can tell the install is incomplete.
pub fn detect_game_version<P: AsRef<Path>>(launch_dir: P) -> Result<String> {
    let path = launch_dir.as_ref().join(VERSION_FILE);
    if !path.exists() {
        return Err(ProviderError::VersionNotFound(format!(
            "missing {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(&path)
        .map_err(|e| ProviderError::VersionNotFound(format!("{}: {}", path.display(), e)))?;

    match contents.split_whitespace().next() {
        Some(version) => Ok(version.to_string()),
        None => Err(ProviderError::VersionNotFound(format!(
            "{} is empty",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = ProviderConfig::new("/opt/wildermyth");
        assert_eq!(config.lib_dir, PathBuf::from("/opt/wildermyth/lib"));
        assert_eq!(
            config.game_archive_path(),
            PathBuf::from("/opt/wildermyth/wildermyth.jar")
        );
    }

    #[test]
    fn test_game_archive_override() {
        let config = ProviderConfig::new(".").with_game_archive("/elsewhere/game.jar");
        assert_eq!(
            config.game_archive_path(),
            PathBuf::from("/elsewhere/game.jar")
        );
    }

    #[test]
    fn test_detect_game_version() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("version.txt"), "1.16+544 Maenad\n").unwrap();
        assert_eq!(detect_game_version(dir.path()).unwrap(), "1.16+544");
    }

    #[test]
    fn test_detect_game_version_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            detect_game_version(dir.path()),
            Err(ProviderError::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_detect_game_version_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("version.txt"), "  \n").unwrap();
        assert!(matches!(
            detect_game_version(dir.path()),
            Err(ProviderError::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_settings_load_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.json");

        // First call creates the file
        let settings = ProviderSettings::load_or_create(&path).unwrap();
        assert!(!settings.workshop_coremods_enabled());
        assert!(path.exists());

        // Second call reads it back
        let settings = ProviderSettings::load_or_create(&path).unwrap();
        assert!(!settings.workshop_coremods_enabled());
    }

    #[test]
    fn test_settings_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            ProviderSettings::load_or_create(&path),
            Err(ProviderError::InvalidSettings { .. })
        ));
    }
}
