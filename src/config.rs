use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::Error;

/// Broker settings loaded once at startup.
///
/// ```json
/// {
///   "api_version": "2.15",
///   "catalog": { "services": [ ... ] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Expected `X-Broker-API-Version`. `None` or `"*"` accepts any version.
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub catalog: Catalog,
}

impl BrokerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config {
            reason: format!("invalid broker config: {e}"),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        let config = Self::from_json_str(&data)?;
        tracing::info!(
            path = %path.display(),
            services = config.catalog.services.len(),
            api_version = config.api_version.as_deref().unwrap_or("*"),
            "loaded broker config"
        );
        Ok(config)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_any_version_with_empty_catalog() {
        let config = BrokerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BrokerConfig::default());
        assert!(config.api_version.is_none());
        assert!(config.catalog.services.is_empty());
    }

    #[test]
    fn parses_catalog_and_version() {
        let config = BrokerConfig::from_json_str(
            r#"{
                "api_version": "2.15",
                "catalog": {
                    "services": [{
                        "id": "service-one-id",
                        "name": "Service One",
                        "description": "Description for Service One",
                        "bindable": true,
                        "plans": [{"id": "plan-one-id", "name": "Plan One", "description": "Plan One"}]
                    }]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.api_version.as_deref(), Some("2.15"));
        let service = config.catalog.service_definition("service-one-id").unwrap();
        assert!(service.plan("plan-one-id").unwrap().free);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = BrokerConfig::from_json_str(r#"{"apiVersion": "2.15"}"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = BrokerConfig::from_path("/nonexistent/broker.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/broker.json"));
    }
}
