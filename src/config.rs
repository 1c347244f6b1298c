use crate::distribution::{DEFAULT_FALLBACK_LABEL, DistributionStrategy};
use crate::persistence::PersistenceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "CURRICULUM_PLANNER_CONFIG";
pub const STORE_PATH_ENV: &str = "CURRICULUM_PLANNER_STORE";
pub const HTTP_ADDR_ENV: &str = "CURRICULUM_PLANNER_HTTP_ADDR";
pub const STRATEGY_ENV: &str = "CURRICULUM_PLANNER_STRATEGY";
pub const FALLBACK_ENV: &str = "CURRICULUM_PLANNER_FALLBACK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub store_path: PathBuf,
    pub store_backend: StoreBackend,
    pub fallback_label: String,
    pub strategy: DistributionStrategy,
    /// Extra curricula merged over the built-in bank.
    pub bank_path: Option<PathBuf>,
    pub http_addr: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("curriculum_status.json"),
            store_backend: StoreBackend::Json,
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            strategy: DistributionStrategy::Expansion,
            bank_path: None,
            http_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Config file named by `CURRICULUM_PLANNER_CONFIG` (if any), then the
    /// individual environment overrides.
    pub fn from_env() -> Result<Self, PersistenceError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any key lookup; blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, PersistenceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(path) = get(STORE_PATH_ENV) {
            self.store_path = PathBuf::from(path.trim());
        }
        if let Some(addr) = get(HTTP_ADDR_ENV) {
            self.http_addr = addr.trim().to_string();
        }
        if let Some(strategy) = get(STRATEGY_ENV) {
            self.strategy = strategy
                .parse()
                .map_err(|err: crate::PlannerError| PersistenceError::InvalidData(err.to_string()))?;
        }
        if let Some(label) = get(FALLBACK_ENV) {
            self.fallback_label = label;
        }
        Ok(self)
    }
}
