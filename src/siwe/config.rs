use std::time::Duration;

/// Message version defined by EIP-4361.
pub const SIWE_VERSION: &str = "1";

/// Predefined configuration presets for common use cases.
///
/// These presets trade how long a user has to sign a challenge against how
/// long a leaked challenge stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Production-ready configuration.
    ///
    /// - Nonce TTL: 5 minutes (enough time to open a wallet and sign)
    Production,

    /// Development-friendly configuration.
    ///
    /// - Nonce TTL: 10 minutes (longer window for manual testing)
    Development,

    /// High-security configuration.
    ///
    /// - Nonce TTL: 2 minutes (minimizes the exposure of an unsigned challenge)
    HighSecurity,

    /// Load configuration from environment variables.
    ///
    /// Reads configuration from:
    /// - `SIWE_AUTH_NONCE_TTL`: Nonce TTL in seconds (default: 300)
    /// - `SIWE_AUTH_VERSION`: Message version (default: `1`)
    FromEnv,
}

/// Configuration for issuing sign-in challenges.
///
/// # Environment Variables
///
/// - `SIWE_AUTH_NONCE_TTL`: Nonce TTL in seconds (default: 300)
/// - `SIWE_AUTH_VERSION`: Message version (default: `1`)
///
/// # Example
///
/// ```rust
/// use siwe_auth::{ConfigPreset, SiweConfig};
/// use std::time::Duration;
///
/// let config = SiweConfig::from(ConfigPreset::HighSecurity);
/// assert_eq!(config.nonce_ttl, Duration::from_secs(120));
///
/// let custom = SiweConfig {
///     nonce_ttl: Duration::from_secs(900),
///     version: "1".to_string(),
/// };
/// assert!(custom.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweConfig {
    /// Lifetime of an issued nonce
    pub nonce_ttl: Duration,
    /// Version string placed in challenge messages
    pub version: String,
}

impl Default for SiweConfig {
    fn default() -> Self {
        Self {
            nonce_ttl: Duration::from_secs(
                std::env::var("SIWE_AUTH_NONCE_TTL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            version: std::env::var("SIWE_AUTH_VERSION")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| SIWE_VERSION.to_string()),
        }
    }
}

impl SiweConfig {
    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.nonce_ttl.is_zero() {
            warnings.push("Zero nonce TTL disables nonce expiration".to_string());
        } else if self.nonce_ttl.as_secs() < 60 {
            warnings.push(
                "Very short nonce TTL (< 1 minute) may not leave enough time to sign".to_string(),
            );
        }
        if self.nonce_ttl.as_secs() > 3600 {
            warnings.push("Long nonce TTL (> 1 hour) may increase replay risk".to_string());
        }

        if self.version != SIWE_VERSION {
            warnings.push(format!(
                "Message version '{}' is not supported by EIP-4361 wallets (expected '{}')",
                self.version, SIWE_VERSION
            ));
        }

        warnings
    }

    /// Returns a summary of the current configuration.
    pub fn summary(&self) -> String {
        format!(
            "SiweConfig {{ Nonce TTL: {}s, Version: {} }}",
            self.nonce_ttl.as_secs(),
            self.version,
        )
    }
}

impl From<ConfigPreset> for SiweConfig {
    fn from(preset: ConfigPreset) -> Self {
        let with_ttl = |secs| Self {
            nonce_ttl: Duration::from_secs(secs),
            version: SIWE_VERSION.to_string(),
        };

        match preset {
            ConfigPreset::Production => with_ttl(300),
            ConfigPreset::Development => with_ttl(600),
            ConfigPreset::HighSecurity => with_ttl(120),
            ConfigPreset::FromEnv => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env_vars() {
        unsafe {
            std::env::remove_var("SIWE_AUTH_NONCE_TTL");
            std::env::remove_var("SIWE_AUTH_VERSION");
        }
    }

    #[test]
    fn test_production_preset() {
        let config = SiweConfig::from(ConfigPreset::Production);
        assert_eq!(config.nonce_ttl.as_secs(), 300);
        assert_eq!(config.version, "1");
    }

    #[test]
    fn test_development_preset() {
        let config = SiweConfig::from(ConfigPreset::Development);
        assert_eq!(config.nonce_ttl.as_secs(), 600);
    }

    #[test]
    fn test_high_security_preset() {
        let config = SiweConfig::from(ConfigPreset::HighSecurity);
        assert_eq!(config.nonce_ttl.as_secs(), 120);
    }

    #[test]
    #[serial]
    fn test_default_without_env() {
        clear_env_vars();

        let config = SiweConfig::default();
        assert_eq!(config.nonce_ttl.as_secs(), 300);
        assert_eq!(config.version, SIWE_VERSION);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env_vars();

        unsafe {
            std::env::set_var("SIWE_AUTH_NONCE_TTL", "900");
            std::env::set_var("SIWE_AUTH_VERSION", "2");
        }

        let config = SiweConfig::from(ConfigPreset::FromEnv);
        assert_eq!(config.nonce_ttl.as_secs(), 900);
        assert_eq!(config.version, "2");

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env_vars();

        unsafe {
            std::env::set_var("SIWE_AUTH_NONCE_TTL", "five minutes");
            std::env::set_var("SIWE_AUTH_VERSION", "  ");
        }

        let config = SiweConfig::from(ConfigPreset::FromEnv);
        assert_eq!(config.nonce_ttl.as_secs(), 300);
        assert_eq!(config.version, SIWE_VERSION);

        clear_env_vars();
    }

    #[test]
    fn test_validation_valid_config() {
        for preset in [
            ConfigPreset::Production,
            ConfigPreset::Development,
            ConfigPreset::HighSecurity,
        ] {
            assert!(SiweConfig::from(preset).validate().is_empty());
        }
    }

    #[test]
    fn test_validation_ttl_warnings() {
        let config = SiweConfig {
            nonce_ttl: Duration::from_secs(30),
            version: SIWE_VERSION.to_string(),
        };
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("Very short nonce TTL")));

        let config = SiweConfig {
            nonce_ttl: Duration::from_secs(7200),
            version: SIWE_VERSION.to_string(),
        };
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("Long nonce TTL")));

        let config = SiweConfig {
            nonce_ttl: Duration::ZERO,
            version: SIWE_VERSION.to_string(),
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("disables nonce expiration"));
    }

    #[test]
    fn test_validation_version_warning() {
        let config = SiweConfig {
            nonce_ttl: Duration::from_secs(300),
            version: "2".to_string(),
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'2'"));
    }

    #[test]
    fn test_summary() {
        let config = SiweConfig::from(ConfigPreset::Production);
        assert_eq!(config.summary(), "SiweConfig { Nonce TTL: 300s, Version: 1 }");
    }
}
