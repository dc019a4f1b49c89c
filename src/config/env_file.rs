//! Backend URL lookup in a `KEY=value` env file

use std::path::Path;
use tracing::debug;

use super::ConfigError;

/// Find the first line starting with `{key}=` and return the rest, trimmed.
///
/// Lines are matched as written; a key preceded by whitespace or `export`
/// does not count. Only the first `=` separates key and value.
pub fn resolve_base_url(path: &Path, key: &str) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::EnvFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let prefix = format!("{key}=");
    let line = content
        .lines()
        .find(|line| line.starts_with(&prefix))
        .ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
            path: path.to_path_buf(),
        })?;

    let value = line
        .split_once('=')
        .map(|(_, value)| value.trim())
        .unwrap_or_default();

    if value.is_empty() {
        return Err(ConfigError::EmptyValue {
            key: key.to_string(),
            path: path.to_path_buf(),
        });
    }

    debug!("Resolved {} from {}", key, path.display());
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const KEY: &str = "REACT_APP_BACKEND_URL";

    fn env_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_resolves_trimmed_value() {
        let (_dir, path) = env_file("WDS_SOCKET_PORT=443\nREACT_APP_BACKEND_URL=  https://api.test  \n");
        assert_eq!(resolve_base_url(&path, KEY).unwrap(), "https://api.test");
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let (_dir, path) = env_file("REACT_APP_BACKEND_URL=https://api.test/?a=b\n");
        assert_eq!(resolve_base_url(&path, KEY).unwrap(), "https://api.test/?a=b");
    }

    #[test]
    fn test_first_match_wins() {
        let (_dir, path) = env_file("REACT_APP_BACKEND_URL=https://one.test\nREACT_APP_BACKEND_URL=https://two.test\n");
        assert_eq!(resolve_base_url(&path, KEY).unwrap(), "https://one.test");
    }

    #[test]
    fn test_key_must_start_the_line() {
        let (_dir, path) = env_file("  REACT_APP_BACKEND_URL=https://api.test\n# REACT_APP_BACKEND_URL=x\n");
        assert!(matches!(
            resolve_base_url(&path, KEY),
            Err(ConfigError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_longer_key_does_not_match() {
        let (_dir, path) = env_file("REACT_APP_BACKEND_URL_OLD=https://old.test\n");
        assert!(matches!(
            resolve_base_url(&path, KEY),
            Err(ConfigError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_value_is_an_error() {
        let (_dir, path) = env_file("REACT_APP_BACKEND_URL=   \n");
        assert!(matches!(
            resolve_base_url(&path, KEY),
            Err(ConfigError::EmptyValue { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = resolve_base_url(&dir.path().join("missing.env"), KEY).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFileUnreadable { .. }));
        assert!(err.to_string().starts_with("Could not read env file"));
    }
}
