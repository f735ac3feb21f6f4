//! Service configuration loaded from environment variables.

use common::ChatId;
use session::EngineSettings;

/// Runtime configuration with defaults suitable for local runs.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — Postgres URL; absent means the in-memory store
/// - `STORE_CONNECT_RETRIES` — connect attempts before giving up (default: `5`)
/// - `STORE_CONNECT_DELAY_MS` — pause between attempts (default: `500`)
/// - `FALLBACK_OPERATOR_ID` — chat id authorized even with an empty roster
/// - `OPERATOR_CHAT_ID` — chat receiving order alerts (falls back to the
///   fallback operator when unset)
/// - `PAYMENT_CARD` — card number shown at the payment step
/// - `SESSION_IDLE_SECS` — idle time before a session slot is evicted
///   (default: `1800`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub store_connect_retries: u32,
    pub store_connect_delay_ms: u64,
    pub fallback_operator: Option<i64>,
    pub operator_chat: Option<i64>,
    pub payment_card: String,
    pub session_idle_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parsed_env("PORT").unwrap_or(3000),
            log_level: env_or("RUST_LOG", "info"),
            database_url: std::env::var("DATABASE_URL").ok(),
            store_connect_retries: parsed_env("STORE_CONNECT_RETRIES").unwrap_or(5),
            store_connect_delay_ms: parsed_env("STORE_CONNECT_DELAY_MS").unwrap_or(500),
            fallback_operator: parsed_env("FALLBACK_OPERATOR_ID"),
            operator_chat: parsed_env("OPERATOR_CHAT_ID"),
            payment_card: env_or("PAYMENT_CARD", "0000-0000-0000-0000"),
            session_idle_secs: parsed_env("SESSION_IDLE_SECS").unwrap_or(1800),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fallback_operator: self.fallback_operator.map(ChatId::new),
            operator_chat: self.operator_chat.map(ChatId::new),
            payment_card: self.payment_card.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            store_connect_retries: 5,
            store_connect_delay_ms: 500,
            fallback_operator: None,
            operator_chat: None,
            payment_card: "0000-0000-0000-0000".to_string(),
            session_idle_secs: 1800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.database_url.is_none());
        assert_eq!(config.store_connect_retries, 5);
        assert_eq!(config.session_idle_secs, 1800);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_engine_settings_mapping() {
        let config = Config {
            fallback_operator: Some(42),
            payment_card: "6037-1234".to_string(),
            ..Config::default()
        };

        let settings = config.engine_settings();
        assert_eq!(settings.fallback_operator, Some(ChatId::new(42)));
        assert!(settings.operator_chat.is_none());
        assert_eq!(settings.payment_card, "6037-1234");
    }
}
