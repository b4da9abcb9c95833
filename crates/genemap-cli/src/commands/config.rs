//! `genemap config` command implementation

use crate::config::{Config, CONFIG_KEYS};
use crate::error::{CliError, Result};
use colored::Colorize;

/// Get configuration value
pub async fn get(config: &Config, key: &str) -> Result<()> {
    let value = config.get(key).ok_or_else(|| {
        let known: Vec<&str> = CONFIG_KEYS.iter().map(|(key, _)| *key).collect();
        CliError::config(format!("Unknown config key '{}' (known: {})", key, known.join(", ")))
    })?;
    println!("{value}");
    Ok(())
}

/// Show all configuration
pub async fn show(config: &Config) -> Result<()> {
    println!("{}", "genemap Configuration:".cyan().bold());
    println!();
    for (key, _) in CONFIG_KEYS {
        println!("{:<24} {}", format!("{key}:"), config.get(key).unwrap_or_default());
    }
    println!();
    println!("{}", "Environment Variables:".cyan());
    for (key, env) in CONFIG_KEYS {
        println!("  {env:<32} {key}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_get_known_key() {
        let config = Config::new().unwrap();
        assert!(get(&config, "taxon_id").await.is_ok());
    }

    #[tokio::test]
    async fn test_config_get_unknown_key() {
        let config = Config::new().unwrap();
        let err = get(&config, "server_url").await.unwrap_err();
        assert!(err.to_string().contains("cache_dir"));
    }

    #[tokio::test]
    async fn test_config_show() {
        let config = Config::new().unwrap();
        assert!(show(&config).await.is_ok());
    }
}
