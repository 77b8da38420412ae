use anyhow::{Context, Result};
use mines_core::EngineConfig;
use std::fs;
use std::path::Path;

/// Reads session settings from a TOML file, falling back to the built-in defaults.
pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    let config =
        parse(&text).with_context(|| format!("Invalid config file {}", path.display()))?;
    log::info!("loaded settings from {}", path.display());
    Ok(config)
}

pub fn parse(text: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mines_core::{Level, Money};

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn parses_partial_toml() {
        let config = parse(
            r#"
            starting_balance = 500
            default_bet = 12.5
            default_level = "medium"
            "#,
        )
        .unwrap();

        assert_eq!(config.starting_balance, Money::from_units(500));
        assert_eq!(config.default_bet, Money::from_cents(1250));
        assert_eq!(config.default_level, Level::Medium);
        assert_eq!(config.reveal_delay_ms, 2000);
    }

    #[test]
    fn rejects_invalid_settings() {
        assert!(parse("bet_step = 0").is_err());
        assert!(parse("grid_size = 6").is_err());
        assert!(parse("default_level = \"expert\"").is_err());
    }
}
