use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::currency::symbol_for;
use crate::errors::ProjectionResult;
use crate::ledger::TransactionDefinition;
use crate::projection::{project_from_date_strings, ProjectionRow};

const DEFAULT_DIR_NAME: &str = ".finance_planner";
const HOME_ENV: &str = "FINANCE_PLANNER_HOME";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const UNSET_DATE: &str = "0-0-0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Persisted projection preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    /// Overrides the symbol derived from `currency`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    pub starting_balance: i64,
    /// `YYYY-MM-DD`; `0-0-0` means today.
    pub start_date: String,
    /// `YYYY-MM-DD`; `0-0-0` means one year after today.
    pub end_date: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            currency_symbol: None,
            starting_balance: 0,
            start_date: UNSET_DATE.into(),
            end_date: UNSET_DATE.into(),
        }
    }
}

impl Config {
    pub fn symbol(&self) -> String {
        self.currency_symbol
            .clone()
            .unwrap_or_else(|| symbol_for(&self.currency))
    }

    /// Runs a projection using this configuration's balance and window.
    pub fn project<F>(
        &self,
        definitions: &[TransactionDefinition],
        today: NaiveDate,
        progress: F,
    ) -> ProjectionResult<Vec<ProjectionRow>>
    where
        F: FnMut(&str),
    {
        project_from_date_strings(
            definitions,
            self.starting_balance,
            &self.start_date,
            &self.end_date,
            today,
            progress,
        )
    }
}

/// Reads and writes the configuration file under one directory.
pub struct ConfigManager {
    base: PathBuf,
}

impl ConfigManager {
    /// Rooted at `$FINANCE_PLANNER_HOME`, or `~/.finance_planner`.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(default_base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    pub fn path(&self) -> PathBuf {
        self.base.join(CONFIG_FILE)
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.path();
        if path.exists() {
            let data = fs::read_to_string(&path)?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        replace_file(&self.path(), &json)
    }
}

fn default_base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

// Write to a sibling temp file, then rename over the target.
fn replace_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
