mod types;

pub use types::*;

use anyhow::{Context, Result};
use codecfit_rules::RuleTable;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./codecfit.toml",
        "~/.config/codecfit/config.toml",
        "/etc/codecfit/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(path) = &config.rules.path {
        if path.as_os_str().is_empty() {
            anyhow::bail!("rules.path cannot be empty");
        }
    }

    Ok(())
}

/// Resolve the rule table path: the command line wins over the config file.
pub fn rules_path(config: &Config, override_path: Option<&Path>) -> Option<PathBuf> {
    override_path
        .map(Path::to_path_buf)
        .or_else(|| config.rules.path.clone())
        .map(|path| PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref()))
}

/// Load and validate a rule table, falling back to the bundled one.
///
/// Structural problems in the table are logged, not rejected: the query
/// layer falls back to built-in values wherever the data has gaps.
pub fn load_rules(path: Option<&Path>) -> Result<Arc<RuleTable>> {
    let table = match path {
        Some(path) => RuleTable::from_path(path)?,
        None => {
            tracing::debug!("Using bundled rule table");
            RuleTable::bundled()?
        }
    };

    for warning in table.validate() {
        tracing::warn!("Rule table: {}", warning);
    }

    Ok(Arc::new(table))
}
