use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Session-wide knobs. Every field has a default, so a partial config file is enough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub starting_balance: Money,
    pub default_bet: Money,
    pub default_level: Level,
    /// Amount added or removed by a single bet adjustment.
    pub bet_step: Money,
    /// Floor for bet adjustments.
    pub min_bet: Money,
    /// How long the whole board stays revealed before a finished round returns to idle.
    pub reveal_delay_ms: u64,
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        starting_balance: Money::from_units(1000),
        default_bet: Money::from_units(20),
        default_level: Level::Easy,
        bet_step: Money::from_units(10),
        min_bet: Money::from_units(10),
        reveal_delay_ms: 2000,
    };

    pub const fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.min_bet.is_zero() {
            return Err(ConfigError::ZeroMinBet);
        }
        if self.bet_step.is_zero() {
            return Err(ConfigError::ZeroBetStep);
        }
        if self.default_bet < self.min_bet {
            return Err(ConfigError::DefaultBetBelowMinimum);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.starting_balance, Money::from_units(1000));
        assert_eq!(config.default_bet, Money::from_units(20));
        assert_eq!(config.reveal_delay(), Duration::from_secs(2));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "starting_balance": 250, "default_level": "hard" }"#)
                .unwrap();

        assert_eq!(config.starting_balance, Money::from_units(250));
        assert_eq!(config.default_level, Level::Hard);
        assert_eq!(config.default_bet, EngineConfig::DEFAULT.default_bet);
        assert_eq!(config.reveal_delay_ms, 2000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "grid_size": 6 }"#).is_err());
    }

    #[test]
    fn invalid_configs() {
        let config = EngineConfig {
            min_bet: Money::ZERO,
            ..EngineConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinBet));

        let config = EngineConfig {
            bet_step: Money::ZERO,
            ..EngineConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBetStep));

        let config = EngineConfig {
            default_bet: Money::from_units(5),
            ..EngineConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::DefaultBetBelowMinimum));
    }
}
