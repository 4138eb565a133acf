// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Webdeck plugin console.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Webdeck configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebdeckConfig {
    /// Console behavior and directly registered plugins.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Services published into the in-process directory at startup.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Message tables keyed by locale, then by message key.
    #[serde(default)]
    pub i18n: BTreeMap<String, BTreeMap<String, String>>,
}

/// Console behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Label of the landing page plugin.
    #[serde(default)]
    pub default_label: Option<String>,

    /// Category for plugins that do not declare one.
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Locale used when none is requested explicitly.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Factory ids of internal plugins that are administratively disabled.
    #[serde(default)]
    pub disabled_plugins: Vec<String>,

    /// Internal plugins constructed by the application.
    #[serde(default = "default_plugins")]
    pub plugins: Vec<InternalPluginConfig>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            default_label: None,
            default_category: default_category(),
            locale: default_locale(),
            log_level: default_log_level(),
            disabled_plugins: Vec::new(),
            plugins: default_plugins(),
        }
    }
}

fn default_category() -> String {
    "Main".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_plugins() -> Vec<InternalPluginConfig> {
    ["status", "configuration", "licenses"]
        .into_iter()
        .map(|id| InternalPluginConfig {
            factory: id.to_string(),
            label: id.to_string(),
        })
        .collect()
}

/// One internal plugin: which factory builds it and the label it is mounted under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InternalPluginConfig {
    /// Identifier of the registered factory.
    pub factory: String,

    /// Console label.
    pub label: String,
}

/// In-process directory configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Services published at startup, in order.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

/// A service published into the directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Console label property.
    pub label: String,

    /// Identifier of the built-in handler backing the service.
    pub handler: String,

    /// Title property overriding the handler's own.
    #[serde(default)]
    pub title: Option<String>,

    /// Category property overriding the handler's own.
    #[serde(default)]
    pub category: Option<String>,

    /// Service ranking used to resolve label conflicts.
    #[serde(default)]
    pub ranking: Option<i32>,

    /// Provider name shown in conflict diagnostics.
    #[serde(default)]
    pub provider: Option<String>,

    /// Origin module name used for localization lookups.
    #[serde(default = "default_origin")]
    pub origin: String,
}

fn default_origin() -> String {
    "webdeck".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_console_registers_builtin_plugins() {
        let config = ConsoleConfig::default();
        let labels: Vec<&str> = config.plugins.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["status", "configuration", "licenses"]);
        assert!(config.disabled_plugins.is_empty());
        assert!(config.default_label.is_none());
    }

    #[test]
    fn defaults_serialize_to_toml() {
        let toml_str = toml::to_string(&WebdeckConfig::default()).expect("should serialize");
        assert!(toml_str.contains("default_category"));
        assert!(toml_str.contains("Main"));
    }
}
