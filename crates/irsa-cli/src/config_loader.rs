//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use irsa_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "irsa.toml";

/// Load layered configuration from an optional file and the environment
pub fn load_config(config_path: Option<&Path>) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file: {}", path.display()))?;
    }

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    config_path: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(config_path)?;
    config.update_from_cli(overrides);
    Ok(config)
}

/// Resolve configuration for a parsed command line
pub fn load_for_cli(cli: &Cli) -> Result<LayeredConfig> {
    let path = resolve_config_path(cli.config.as_deref())?;
    let overrides = CliConfigOverrides {
        server: cli.server.clone(),
        gator_list_url: None,
        timeout: cli.timeout,
        row_limit: cli.row_limit,
    };
    load_config_with_overrides(path.as_deref(), overrides)
}

/// An explicit `--config` must exist; otherwise use `./irsa.toml` if present
fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = std::env::current_dir()?.join(DEFAULT_CONFIG_FILE);
    Ok(local.is_file().then_some(local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use irsa_core::config::ConfigSource;

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = resolve_config_path(Some(Path::new("/nonexistent/irsa.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_overrides_win() {
        let config = load_config_with_overrides(
            None,
            CliConfigOverrides { row_limit: Some(7), ..Default::default() },
        )
        .unwrap();

        assert_eq!(config.row_limit.value, 7);
        assert_eq!(config.row_limit.source, ConfigSource::Cli);
    }
}
