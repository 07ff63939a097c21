// Application configuration.
// Backend selection, store identifiers, and cache TTL come from a YAML file;
// the API token comes from the environment so it never lands on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TidoError};
use crate::store::{AnyStore, FirestoreStore, MemoryStore, SheetsStore};

/// Which backing store to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sheets,
    Firestore,
    /// In-process store; nothing persists across runs. The default, so the
    /// app works with no configuration at all.
    #[default]
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Numeric grid id of the worksheet tab (the `gid` URL parameter);
    /// required for row deletion.
    #[serde(default)]
    pub sheet_gid: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendKind,
    pub sheets: Option<SheetsConfig>,
    pub firestore: Option<FirestoreConfig>,
    /// How long a cached list snapshot stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            sheets: None,
            firestore: None,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_sheet_name() -> String {
    "todos".to_string()
}

fn default_collection() -> String {
    "todos".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    crate::cache::DEFAULT_TTL.as_secs()
}

impl Config {
    /// Load configuration from file.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. ./tido.yaml (current directory)
    /// 3. platform config dir (e.g. ~/.config/tido/config.yaml)
    ///
    /// No file at all is fine: the defaults run the memory backend.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => {
                return Err(TidoError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            None => Self::find_config_file(),
        };

        match path {
            Some(p) => Self::load_from_path(&p),
            None => Ok(Config::default()),
        }
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from("tido.yaml");
        if local.exists() {
            return Some(local);
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "tido") {
            let path = dirs.config_dir().join("config.yaml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| {
            TidoError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// OAuth access token for the Google APIs.
    ///
    /// Checks TIDO_TOKEN first, then GOOGLE_OAUTH_ACCESS_TOKEN as fallback.
    pub fn api_token() -> Result<String> {
        std::env::var("TIDO_TOKEN")
            .or_else(|_| std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN"))
            .map_err(|_| {
                TidoError::Config(
                    "API token not found; set TIDO_TOKEN or GOOGLE_OAUTH_ACCESS_TOKEN".into(),
                )
            })
    }

    /// Construct the configured backing store.
    pub fn build_store(&self) -> Result<AnyStore> {
        match self.backend {
            BackendKind::Memory => Ok(AnyStore::Memory(MemoryStore::new())),
            BackendKind::Sheets => {
                let sheets = self.sheets.as_ref().ok_or_else(|| {
                    TidoError::Config("backend is sheets but no [sheets] section is set".into())
                })?;
                Ok(AnyStore::Sheets(SheetsStore::new(sheets, &Self::api_token()?)?))
            }
            BackendKind::Firestore => {
                let firestore = self.firestore.as_ref().ok_or_else(|| {
                    TidoError::Config(
                        "backend is firestore but no [firestore] section is set".into(),
                    )
                })?;
                Ok(AnyStore::Firestore(FirestoreStore::new(
                    firestore,
                    &Self::api_token()?,
                )?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
backend: sheets
sheets:
  spreadsheet_id: 1AbC
  sheet_name: chores
  sheet_gid: 42
firestore:
  project_id: my-project
cache_ttl_secs: 120
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend, BackendKind::Sheets);
        let sheets = config.sheets.unwrap();
        assert_eq!(sheets.spreadsheet_id, "1AbC");
        assert_eq!(sheets.sheet_name, "chores");
        assert_eq!(sheets.sheet_gid, 42);
        assert_eq!(config.firestore.unwrap().collection, "todos");
        assert_eq!(config.cache_ttl_secs, 120);
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert!(config.sheets.is_none());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result: std::result::Result<Config, _> = serde_yaml::from_str("backend: dynamo");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend: firestore\nfirestore:\n  project_id: p1").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.backend, BackendKind::Firestore);
        assert_eq!(config.firestore.unwrap().project_id, "p1");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/tido.yaml"))).unwrap_err();
        assert!(matches!(err, TidoError::Config(_)));
    }

    #[test]
    fn test_memory_backend_needs_no_sections() {
        let config = Config::default();
        assert!(matches!(
            config.build_store().unwrap(),
            AnyStore::Memory(_)
        ));
    }

    #[test]
    fn test_remote_backend_without_section_fails() {
        let config = Config {
            backend: BackendKind::Sheets,
            ..Config::default()
        };
        let err = config.build_store().unwrap_err();
        assert!(matches!(err, TidoError::Config(_)));
    }
}
