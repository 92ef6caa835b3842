use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::import::{DEFAULT_HEADER_ROWS, ImportOptions};

/// Database file used when neither the CLI nor the config file names one
pub const DEFAULT_DATABASE: &str = "agenda.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AgendaConfig {
    pub database: Option<String>,
    pub header_rows: Option<usize>,
    pub normalize_times: Option<bool>,
}

impl AgendaConfig {
    /// CLI value if given, then the config file, then `agenda.db`
    pub fn database_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    /// Merge CLI overrides over the config file over the defaults
    pub fn import_options(&self, header_rows: Option<usize>, raw_times: bool) -> ImportOptions {
        ImportOptions {
            header_rows: header_rows
                .or(self.header_rows)
                .unwrap_or(DEFAULT_HEADER_ROWS),
            normalize_times: !raw_times && self.normalize_times.unwrap_or(true),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("agenda.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<AgendaConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: AgendaConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
