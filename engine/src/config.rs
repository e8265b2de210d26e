//! Engine configuration.

use std::time::Duration;

/// Transfer engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bounded wait for each row lock. Exceeding it fails the transfer with
    /// a contention error instead of blocking indefinitely.
    pub lock_wait: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_wait: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ms) = std::env::var("TRANSFER_LOCK_WAIT_MS") {
            if let Ok(ms) = ms.parse() {
                config.lock_wait = Duration::from_millis(ms);
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.lock_wait.is_zero() {
            return Err("Lock wait cannot be zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_lock_wait_rejected() {
        let config = EngineConfig {
            lock_wait: Duration::ZERO,
        };
        assert!(config.validate().is_err());
    }
}
