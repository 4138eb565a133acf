// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express: non-empty labels,
//! unique labels among internal plugins, and a known log level.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::WebdeckConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WebdeckConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let console = &config.console;

    if !LOG_LEVELS.contains(&console.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "console.log_level `{}` is not one of {}",
                console.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if console.default_category.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "console.default_category must not be empty".to_string(),
        });
    }

    if console.locale.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "console.locale must not be empty".to_string(),
        });
    }

    if matches!(&console.default_label, Some(label) if label.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "console.default_label must not be empty when set".to_string(),
        });
    }

    let mut seen_labels = HashSet::new();
    for (i, plugin) in console.plugins.iter().enumerate() {
        if plugin.factory.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("console.plugins[{i}].factory must not be empty"),
            });
        }
        if plugin.label.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("console.plugins[{i}].label must not be empty"),
            });
        } else if !seen_labels.insert(plugin.label.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate label `{}` in [[console.plugins]]",
                    plugin.label
                ),
            });
        }
    }

    // Directory services may share labels; the registry resolves those by ranking.
    for (i, service) in config.directory.services.iter().enumerate() {
        if service.label.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("directory.services[{i}].label must not be empty"),
            });
        }
        if service.handler.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("directory.services[{i}].handler must not be empty"),
            });
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
    use crate::model::{InternalPluginConfig, ServiceConfig};

    fn messages(config: &WebdeckConfig) -> Vec<String> {
        validate_config(config)
            .err()
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&WebdeckConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = WebdeckConfig::default();
        config.console.log_level = "loud".into();
        config.console.default_category = " ".into();
        config.console.plugins.push(InternalPluginConfig {
            factory: String::new(),
            label: String::new(),
        });

        let msgs = messages(&config);
        assert_eq!(msgs.len(), 4, "got: {msgs:?}");
        assert!(msgs.iter().any(|m| m.contains("log_level")));
        assert!(msgs.iter().any(|m| m.contains("default_category")));
        assert!(msgs.iter().any(|m| m.contains("factory must not be empty")));
        assert!(msgs.iter().any(|m| m.contains("label must not be empty")));
    }

    #[test]
    fn rejects_duplicate_internal_labels() {
        let mut config = WebdeckConfig::default();
        config.console.plugins.push(InternalPluginConfig {
            factory: "other".into(),
            label: "status".into(),
        });
        let msgs = messages(&config);
        assert!(msgs.iter().any(|m| m.contains("duplicate label `status`")));
    }

    #[test]
    fn allows_duplicate_service_labels() {
        let mut config = WebdeckConfig::default();
        for ranking in [1, 2] {
            config.directory.services.push(ServiceConfig {
                label: "logs".into(),
                handler: "echo".into(),
                title: None,
                category: None,
                ranking: Some(ranking),
                provider: None,
                origin: "webdeck".into(),
            });
        }
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = WebdeckConfig::default();
        config.console.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
