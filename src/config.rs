use crate::error::{UnicharError, UnicharResult};
use crate::sources::ucd::DEFAULT_UCD_URL;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const TABLE_FILE: &str = "unicode_list.txt";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "unichar", "unichar")
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Per-query search knobs.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of results; zero or negative returns nothing
    #[serde(default = "default_result_limit")]
    pub result_limit: i64,
    /// Inclusive score threshold, may be negative
    #[serde(default)]
    pub min_score: i64,
    /// Hours before the table is regenerated; zero or negative never refreshes
    #[serde(default)]
    pub update_interval: i64,
}

fn default_result_limit() -> i64 { 8 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            min_score: 0,
            update_interval: 0,
        }
    }
}

impl SearchConfig {
    pub fn limit(&self) -> usize {
        usize::try_from(self.result_limit).unwrap_or(0)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DataConfig {
    #[serde(default)]
    pub table: Option<PathBuf>,
    #[serde(default = "default_ucd_source")]
    pub ucd_source: String,
}

fn default_ucd_source() -> String { DEFAULT_UCD_URL.to_string() }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            table: None,
            ucd_source: default_ucd_source(),
        }
    }
}

impl DataConfig {
    pub fn table_path(&self) -> PathBuf {
        if let Some(path) = &self.table {
            return path.clone();
        }
        match project_dirs() {
            Some(dirs) => dirs.data_dir().join(TABLE_FILE),
            None => PathBuf::from(TABLE_FILE),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_clipboard")]
    pub clipboard: String,
    #[serde(default = "default_icon_font")]
    pub icon_font: String,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_clipboard() -> String { "wl-copy".to_string() }
fn default_icon_font() -> String { "sans-serif".to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            clipboard: default_clipboard(),
            icon_font: default_icon_font(),
            cache_dir: None,
        }
    }
}

impl GeneralConfig {
    pub fn icon_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        match project_dirs() {
            Some(dirs) => dirs.cache_dir().join("icons"),
            None => PathBuf::from("images/cache"),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub fn load_config() -> UnicharResult<Config> {
    load_config_from(&default_config_path())
}

/// A missing file yields the defaults; a present but invalid one is an error.
pub fn load_config_from(path: &Path) -> UnicharResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| UnicharError::io(path, e))?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.general.clipboard, "wl-copy");
        assert_eq!(config.data.ucd_source, DEFAULT_UCD_URL);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\nmin_score = -50\n\n[data]\ntable = \"/tmp/u.txt\"\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.search.min_score, -50);
        assert_eq!(config.search.result_limit, 8);
        assert_eq!(config.data.table_path(), PathBuf::from("/tmp/u.txt"));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\nresult_limit = \"ten\"\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(UnicharError::Config(_))));
    }

    #[test]
    fn test_non_positive_limit() {
        let search = SearchConfig { result_limit: -3, ..SearchConfig::default() };
        assert_eq!(search.limit(), 0);
    }
}
