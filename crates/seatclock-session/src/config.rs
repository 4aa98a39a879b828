use serde::{Deserialize, Serialize};

use seatclock_core::ClockPolicy;

/// Settings for a clock session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// House rules handed to the state machine.
    pub policy: ClockPolicy,

    /// Capacity of the command channel. Callers wait when it is full.
    ///
    /// Default: 64.
    pub channel_size: usize,

    /// Store key of the game state blob.
    pub state_key: String,

    /// Store key of the clock configuration blob.
    pub config_key: String,
}

impl SessionConfig {
    pub const DEFAULT_STATE_KEY: &'static str = "seatclock.gameState";
    pub const DEFAULT_CONFIG_KEY: &'static str = "seatclock.config";
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: ClockPolicy::default(),
            channel_size: 64,
            state_key: Self::DEFAULT_STATE_KEY.to_owned(),
            config_key: Self::DEFAULT_CONFIG_KEY.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let config = SessionConfig::default();
        assert_eq!(config.state_key, "seatclock.gameState");
        assert_eq!(config.config_key, "seatclock.config");
        assert_eq!(config.channel_size, 64);
        assert_eq!(config.policy, ClockPolicy::default());
    }
}
