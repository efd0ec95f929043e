//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{DeformationParams, DEFAULT_VOXEL_SIZE};

/// Environment variable overriding the compute server URL
pub const SERVER_URL_ENV: &str = "MESHLAB_SERVER_URL";

/// Compute server connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL, e.g. `http://localhost:3001`
    pub url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:3001".to_string(),
        }
    }
}

/// Alignment request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSettings {
    /// Downsampling grid resolution
    pub voxel_size: f64,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            voxel_size: DEFAULT_VOXEL_SIZE,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub registration: RegistrationSettings,
    #[serde(default)]
    pub deformation: DeformationParams,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "meshlab", "meshlab")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the user config dir, or defaults if not found.
    /// `MESHLAB_SERVER_URL` overrides the stored server URL.
    pub fn load() -> Self {
        let mut settings = Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default();
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            settings.server.url = url;
        }
        settings
    }

    /// Load settings from a specific JSON file
    pub fn load_from(path: &Path) -> Result<Self, crate::ClientError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to the user config dir
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Failed to save settings to {}: {e}", path.display());
            }
        }
    }

    /// Save settings to a specific JSON file
    pub fn save_to(&self, path: &Path) -> Result<(), crate::ClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Settings pointing at a given server, everything else default
    pub fn with_server_url(url: impl Into<String>) -> Self {
        Self {
            server: ServerSettings { url: url.into() },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AppSettings::default();
        assert_eq!(s.registration.voxel_size, 0.05);
        assert_eq!(s.deformation.modes, 4);
        assert!(s.server.url.starts_with("http://"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: AppSettings =
            serde_json::from_str(r#"{"registration": {"voxel_size": 0.2}}"#).unwrap();
        assert_eq!(s.registration.voxel_size, 0.2);
        assert_eq!(s.server, ServerSettings::default());
    }

    #[test]
    fn test_save_load_file() {
        let dir = std::env::temp_dir().join(format!("meshlab-settings-{}", uuid::Uuid::new_v4()));
        let path = dir.join("settings.json");
        let mut s = AppSettings::with_server_url("http://example:9000");
        s.deformation.ratio = 0.3;
        s.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), s);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
