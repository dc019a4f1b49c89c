//! Settings file management
//!
//! Handles finding and loading the optional YAML/JSON settings file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::PartialSettings;

/// Settings file locations (in order of precedence)
const SETTINGS_LOCATIONS: &[&str] = &[
    "./backend-smoke.yaml",
    "./.backend-smoke.yaml",
    "~/.config/backend-smoke/config.yaml",
];

/// Find a settings file in the standard locations
pub fn find_settings_file() -> Option<PathBuf> {
    SETTINGS_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load a settings layer from file
pub fn load_settings_file(path: impl AsRef<Path>) -> Result<PartialSettings> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    let layer: PartialSettings = if is_yaml_file(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML settings: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON settings: {}", path.display()))?
    };

    Ok(layer)
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backend-smoke.yaml");
        fs::write(
            &path,
            "env_file: ./frontend/.env\ntimeout_secs: 20\ncors_origin: https://app.test\n",
        )
        .unwrap();

        let layer = load_settings_file(&path).unwrap();
        assert_eq!(layer.env_file, Some(PathBuf::from("./frontend/.env")));
        assert_eq!(layer.timeout_secs, Some(20));
        assert_eq!(layer.cors_origin.as_deref(), Some("https://app.test"));
        assert!(layer.base_url.is_none());
    }

    #[test]
    fn test_load_json_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "base_url": "http://localhost:8001", "format": "csv" }"#).unwrap();

        let layer = load_settings_file(&path).unwrap();
        assert_eq!(layer.base_url.as_deref(), Some("http://localhost:8001"));
        assert_eq!(layer.format.as_deref(), Some("csv"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backend-smoke.yml");
        fs::write(&path, "rounds: 3\n").unwrap();

        assert!(load_settings_file(&path).is_err());
    }

    #[test]
    fn test_missing_settings_file() {
        let dir = tempdir().unwrap();
        let err = load_settings_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read settings file"));
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
        assert!(is_yaml_file(Path::new("a.yml")));
        assert!(!is_yaml_file(Path::new("a.json")));
    }
}
