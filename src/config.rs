//! Engine configuration.
//!
//! Everything the engine needs from the surrounding settings is captured here
//! once, at construction time. The engine never consults process-wide state
//! afterwards; build a new engine to pick up a configuration change.

use crate::error::ConfigError;
use crate::gate::GateStatus;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Base directory for persisted change sets.
pub const PACKAGES_BASE_DIR: &str = "/etc/pkgstage";
/// Sandboxed base directory used for dry runs.
pub const DRY_RUN_PACKAGES_BASE_DIR: &str = "/tmp/pkgstage";
/// Agreement marker file name, relative to the base directory.
pub const AGREEMENT_FILE: &str = "user-agreement";
/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/pkgstage/config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
    #[serde(default)]
    pub status: GateStatus,

    /// Command prefix used to install packages, e.g. `apt-get install -y`.
    #[serde(default)]
    pub add_verb: String,

    /// Command prefix used to remove packages.
    #[serde(default)]
    pub remove_verb: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_hook: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_hook: Option<String>,

    /// URL template with a `{packageName}` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,

    #[serde(default)]
    pub dry_run: bool,

    /// Overrides both the real and the dry-run base directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Load a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn base_dir(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.clone(),
            None if self.dry_run => PathBuf::from(DRY_RUN_PACKAGES_BASE_DIR),
            None => PathBuf::from(PACKAGES_BASE_DIR),
        }
    }

    pub fn agreement_file(&self) -> PathBuf {
        self.base_dir().join(AGREEMENT_FILE)
    }

    /// Hooks are ignored when blank.
    pub fn pre_hook(&self) -> Option<&str> {
        non_blank(self.pre_hook.as_deref())
    }

    pub fn post_hook(&self) -> Option<&str> {
        non_blank(self.post_hook.as_deref())
    }

    pub fn catalog_url(&self) -> Option<&str> {
        non_blank(self.catalog_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dry_run_selects_sandbox_dir() {
        let mut config = EngineConfig::default();
        assert_eq!(config.base_dir(), PathBuf::from(PACKAGES_BASE_DIR));
        config.dry_run = true;
        assert_eq!(config.base_dir(), PathBuf::from(DRY_RUN_PACKAGES_BASE_DIR));
        config.base_dir = Some(PathBuf::from("/srv/pkgs"));
        assert_eq!(config.base_dir(), PathBuf::from("/srv/pkgs"));
        assert_eq!(
            config.agreement_file(),
            PathBuf::from("/srv/pkgs/user-agreement")
        );
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.status, GateStatus::Disabled);
    }

    #[test]
    fn load_parses_kebab_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "status": 2,
                "add-verb": "apt-get install -y",
                "remove-verb": "apt-get purge -y",
                "pre-hook": "lock",
                "post-hook": "  ",
                "catalog-url": "https://packages.example/api/{packageName}"
            }"#,
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.status, GateStatus::RequiresAgreement);
        assert_eq!(config.add_verb, "apt-get install -y");
        assert_eq!(config.pre_hook(), Some("lock"));
        assert_eq!(config.post_hook(), None);
        assert_eq!(
            config.catalog_url(),
            Some("https://packages.example/api/{packageName}")
        );
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
