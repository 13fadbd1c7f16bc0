//! User configuration loaded from the hon config directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Directory under `$HOME` used when no config directory is given.
pub const CONFIG_DIR_NAME: &str = ".hon";

/// Configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Logical tool names.
pub const GIT: &str = "git";
pub const POETRY: &str = "poetry";
pub const PYENV: &str = "pyenv";
pub const PYTEST: &str = "pytest";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Logical tool name to executable.
    #[serde(default)]
    pub tools: HashMap<String, String>,
    /// Template directory replacing the embedded tree.
    #[serde(default)]
    pub templates: Option<PathBuf>,
}

/// Resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    dir: Option<PathBuf>,
    file: ConfigFile,
}

impl Config {
    /// Load from `dir`, or from `~/.hon` when it exists.
    pub fn load(dir: Option<PathBuf>) -> CoreResult<Self> {
        Self::load_with_fallback(dir, default_dir())
    }

    /// Load from `dir`, or from `fallback` when it exists.
    ///
    /// An explicit `dir` must exist. A missing fallback directory or a missing
    /// `config.toml` yields the defaults.
    pub fn load_with_fallback(dir: Option<PathBuf>, fallback: Option<PathBuf>) -> CoreResult<Self> {
        let dir = match dir {
            Some(dir) if dir.is_dir() => dir,
            Some(dir) => return Err(CoreError::ConfigNotFound(dir)),
            None => match fallback.filter(|d| d.is_dir()) {
                Some(dir) => dir,
                None => {
                    debug!("No config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let path = dir.join(CONFIG_FILE);
        let file = if path.is_file() {
            debug!("Loading config from {:?}", path);
            let text = fs::read_to_string(&path)?;
            toml::from_str(&text).map_err(|source| CoreError::InvalidToml { path, source })?
        } else {
            debug!("{:?} not found, using defaults", path);
            ConfigFile::default()
        };

        Ok(Self {
            dir: Some(dir),
            file,
        })
    }

    pub fn from_file(dir: Option<PathBuf>, file: ConfigFile) -> Self {
        Self { dir, file }
    }

    /// Directory the config was loaded from.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Executable configured for `name`, or `name` itself.
    pub fn tool(&self, name: &str) -> String {
        self.file
            .tools
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Template directory override, relative paths resolved against the config dir.
    pub fn templates_dir(&self) -> Option<PathBuf> {
        let templates = self.file.templates.as_ref()?;
        match &self.dir {
            Some(dir) if templates.is_relative() => Some(dir.join(templates)),
            _ => Some(templates.clone()),
        }
    }
}

fn default_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tool(POETRY), "poetry");
        assert_eq!(config.tool("anything"), "anything");
        assert!(config.templates_dir().is_none());
        assert!(config.dir().is_none());
    }

    #[test]
    fn test_explicit_dir_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = Config::load_with_fallback(Some(missing.clone()), None).unwrap_err();
        assert!(matches!(err, CoreError::ConfigNotFound(p) if p == missing));
    }

    #[test]
    fn test_missing_fallback_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config =
            Config::load_with_fallback(None, Some(temp.path().join("absent"))).unwrap();
        assert!(config.dir().is_none());
    }

    #[test]
    fn test_reads_tools_and_templates() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "templates = \"skeleton\"\n\n[tools]\npoetry = \"/opt/poetry/bin/poetry\"\n",
        )
        .unwrap();

        let config = Config::load_with_fallback(None, Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.tool(POETRY), "/opt/poetry/bin/poetry");
        assert_eq!(config.tool(GIT), "git");
        assert_eq!(config.templates_dir(), Some(temp.path().join("skeleton")));
    }

    #[test]
    fn test_dir_without_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_with_fallback(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.dir(), Some(temp.path()));
        assert_eq!(config.tool(PYENV), "pyenv");
    }

    #[test]
    fn test_invalid_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[tools\n").unwrap();
        let err = Config::load_with_fallback(Some(temp.path().to_path_buf()), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidToml { .. }));
    }

    #[test]
    fn test_absolute_templates_dir() {
        let file = ConfigFile {
            templates: Some(PathBuf::from("/srv/templates")),
            ..Default::default()
        };
        let config = Config::from_file(Some(PathBuf::from("/home/me/.hon")), file);
        assert_eq!(config.templates_dir(), Some(PathBuf::from("/srv/templates")));
    }
}
