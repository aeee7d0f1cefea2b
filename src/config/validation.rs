//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns all validation
//! errors, not just the first; runs before a config is accepted.

use std::net::SocketAddr;

use crate::config::schema::CatalogConfig;
use crate::store::Course;

/// A single semantic problem found in a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("telemetry.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("telemetry.service_name must not be empty")]
    EmptyServiceName,

    #[error("validation.required_fields contains unknown course field '{0}'")]
    UnknownRequiredField(String),
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &CatalogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.telemetry.metrics_enabled
        && config.telemetry.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.telemetry.metrics_address.clone(),
        ));
    }

    if config.telemetry.service_name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    for field in &config.validation.required_fields {
        if !Course::FIELD_NAMES.contains(&field.as_str()) {
            errors.push(ValidationError::UnknownRequiredField(field.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CatalogConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = CatalogConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.telemetry.service_name = " ".to_string();
        config.validation.required_fields = vec!["code".to_string(), "teacher".to_string()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = CatalogConfig::default();
        config.telemetry.metrics_enabled = false;
        config.telemetry.metrics_address = "bogus".to_string();

        assert!(validate_config(&config).is_ok());
    }
}
