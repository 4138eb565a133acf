// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Webdeck plugin console.

use thiserror::Error;

/// The primary error type used across the Webdeck collaborator traits and the registry.
///
/// Almost every variant describes a failure contained at a single plugin entry.
/// The registry logs those and carries on; only [`WebdeckError::Subscription`]
/// is ever returned to a caller of `PluginRegistry::open`.
#[derive(Debug, Error)]
pub enum WebdeckError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Registering for directory notifications or enumerating the directory failed.
    #[error("failed to subscribe to directory with filter `{filter}`: {message}")]
    Subscription { filter: String, message: String },

    /// No factory is registered under the requested identifier.
    #[error("no plugin factory registered for `{id}`")]
    FactoryNotFound { id: String },

    /// A plugin factory failed to construct its component.
    #[error("failed to instantiate plugin `{id}`: {source}")]
    Instantiation {
        id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A freshly constructed component refused activation.
    #[error("failed to activate plugin `{id}`: {source}")]
    Activation {
        id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A component failed to initialize against the execution context.
    #[error("plugin `{label}` failed to initialize: {message}")]
    Init { label: String, message: String },

    /// No localized messages are available for an origin and locale.
    #[error("no messages for origin `{origin}` in locale `{locale}`: {message}")]
    Localization {
        origin: String,
        locale: String,
        message: String,
    },

    /// The service directory reported a failure.
    #[error("directory error: {0}")]
    Directory(String),

    /// Plugin code panicked; the panic was contained at the entry boundary.
    #[error("plugin panicked during {context}: {message}")]
    Panicked { context: String, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebdeckError {
    /// Wraps any error as an instantiation failure for the given factory id.
    pub fn instantiation(
        id: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Instantiation {
            id: id.into(),
            source: source.into(),
        }
    }

    /// Wraps any error as an activation failure for the given factory id.
    pub fn activation(
        id: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Activation {
            id: id.into(),
            source: source.into(),
        }
    }
}
