mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

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
        "./moovmend.toml",
        "~/.config/moovmend/config.toml",
        "/etc/moovmend/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file: {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Write a config to a TOML file
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let ext = &config.output.temp_extension;
    if ext.is_empty() {
        anyhow::bail!("output.temp_extension cannot be empty");
    }
    if ext.contains(['.', '/', '\\']) {
        anyhow::bail!(
            "output.temp_extension must be a bare extension without dots or separators: {:?}",
            ext
        );
    }

    if config.output.dir_name.trim().is_empty() {
        anyhow::bail!("output.dir_name cannot be empty");
    }

    if config.profile.trailer_trim_bytes == 0 {
        tracing::warn!("profile.trailer_trim_bytes is 0, device footers will be kept");
    }

    Ok(())
}
