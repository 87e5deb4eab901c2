//! Enumeration settings, loaded from TOML and overridable from the environment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`HotestConfig::max_runs`].
pub const MAX_RUNS_ENV: &str = "HOTEST_MAX_RUNS";

/// Driver configuration (TOML).
///
/// Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HotestConfig {
    /// Upper bound on runs a single enumeration may start. Unbounded when
    /// unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_runs: Option<u32>,
}

impl HotestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_runs == Some(0) {
            return Err(anyhow!("max_runs must be > 0"));
        }
        Ok(())
    }

    /// Defaults with `HOTEST_MAX_RUNS` applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` (an env-like key/value source).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(MAX_RUNS_ENV) {
            let max_runs = raw
                .trim()
                .parse()
                .with_context(|| format!("parse {MAX_RUNS_ENV}={raw:?}"))?;
            self.max_runs = Some(max_runs);
        }
        self.validate()?;
        Ok(self)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `HotestConfig::default()`.
pub fn load_config(path: &Path) -> Result<HotestConfig> {
    if !path.exists() {
        let cfg = HotestConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HotestConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
