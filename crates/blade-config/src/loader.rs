use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::BladeConfig;

/// Loads the blade configuration.
pub struct ConfigLoader {
    config: BladeConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > BLADE_CONFIG env > ~/.blade/blade.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("BLADE_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".blade")
            .join("blade.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> blade_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw, &config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            BladeConfig::default()
        };

        let config = Self::apply_overrides(config, |key| std::env::var(key).ok());
        Self::check(&config)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Parse a `blade.toml` body. `origin` is only used in the error message.
    pub fn parse(raw: &str, origin: &Path) -> blade_core::Result<BladeConfig> {
        toml::from_str::<BladeConfig>(raw).map_err(|e| {
            blade_core::BladeError::Config(format!("failed to parse {}: {}", origin.display(), e))
        })
    }

    /// Validate, logging warnings and failing on errors.
    pub fn check(config: &BladeConfig) -> blade_core::Result<()> {
        let warnings = config.validate().map_err(blade_core::BladeError::Config)?;
        for w in &warnings {
            warn!("{}", w);
        }
        Ok(())
    }

    /// Get a snapshot of the loaded config.
    pub fn get(&self) -> BladeConfig {
        self.config.clone()
    }

    /// Path the config was (or would have been) read from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply overrides (BLADE_NAME, BLADE_REQUESTS_URL, BLADE_RESPONSES_URL,
    /// BLADE_LOG_LEVEL). `lookup` is `std::env::var` outside of tests.
    pub fn apply_overrides(
        mut config: BladeConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> BladeConfig {
        if let Some(v) = lookup("BLADE_NAME") {
            config.blade.name = v;
        }
        if let Some(v) = lookup("BLADE_REQUESTS_URL") {
            config.remote.requests_url = v;
        }
        if let Some(v) = lookup("BLADE_RESPONSES_URL") {
            config.remote.responses_url = v;
        }
        if let Some(v) = lookup("BLADE_LOG_LEVEL") {
            config.logging.level = v;
        }
        config
    }
}
