//! Agent process configuration.
//!
//! Loaded from environment variables via the `config` crate with `__`
//! as the nesting separator, e.g. `RETRIEVAL__ENDPOINT`, `NATS__URL`,
//! or `CALENDAR__GRANT_ID`.

use serde::Deserialize;
use switchboard_calendar::NylasConfig;
use switchboard_contacts::SchedulingConfig;
use switchboard_conversation::NatsChannelConfig;
use switchboard_retrieval::{HttpRetrieverConfig, RetrievalPolicy};

/// Agent configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// NATS session transport configuration.
    pub nats: NatsChannelConfig,

    /// Knowledge retrieval configuration.
    pub retrieval: HttpRetrieverConfig,

    /// Retrieval search policy.
    #[serde(default)]
    pub retrieval_policy: RetrievalPolicy,

    /// Calendar service configuration.
    pub calendar: NylasConfig,

    /// Meeting scheduling defaults.
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

impl AgentConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_defaults_apply() {
        let config = SchedulingConfig::default();
        assert_eq!(config.timezone, "Asia/Jerusalem");
        assert_eq!(config.location, "Office");
    }

    #[test]
    fn retrieval_policy_defaults_apply() {
        let policy = RetrievalPolicy::default();
        assert_eq!(policy.top_k, 3);
    }

    #[test]
    fn nested_sections_deserialize() {
        let config: AgentConfig = serde_json::from_value(serde_json::json!({
            "database_url": "postgres://localhost/switchboard",
            "nats": { "url": "nats://localhost:4222" },
            "retrieval": { "endpoint": "http://localhost:8000/search" },
            "calendar": {
                "grant_id": "grant",
                "calendar_id": "primary",
                "api_token": "token"
            }
        }))
        .expect("deserialize");

        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.retrieval_policy.top_k, 3);
    }
}
