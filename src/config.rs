use crate::{AuthConfig, ConsoleConfig};
use anyhow::Result;
use std::path::Path;

/// Load configuration from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConsoleConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: ConsoleConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Save configuration to a file
pub fn save_config<P: AsRef<Path>>(config: &ConsoleConfig, path: P) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create a default configuration template
pub fn create_default_config() -> ConsoleConfig {
    ConsoleConfig {
        base_url: "https://deprovision.your-organization.internal/".to_string(),
        auth: AuthConfig {
            username: "".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = create_default_config();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ConsoleConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.base_url, config.base_url);
        assert!(parsed.auth.username.is_empty());
    }

    #[test]
    fn auth_section_is_optional() {
        let parsed: ConsoleConfig =
            toml::from_str("base_url = \"https://example.internal/\"").unwrap();
        assert!(parsed.auth.username.is_empty());
    }
}
