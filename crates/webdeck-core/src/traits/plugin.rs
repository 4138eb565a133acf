// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component capabilities: console plugins, activation, and bare request handlers.

use crate::error::WebdeckError;
use crate::traits::host::ConsoleHost;
use crate::types::EntryConfig;

/// An administrative console component reachable under a label.
///
/// Rendering is outside the registry's concern; the registry only needs the
/// component's identity, metadata, and lifecycle hooks.
pub trait ConsolePlugin: Send + Sync + 'static {
    /// The label the component expects to be mounted under.
    fn label(&self) -> &str;

    /// Display title. May start with `%` to request localization.
    fn title(&self) -> String;

    /// Slash-separated category path, if the component groups itself.
    fn category(&self) -> Option<String> {
        None
    }

    /// Binds the component to the registry's execution context.
    fn init(&self, _config: &EntryConfig<'_>) -> Result<(), WebdeckError> {
        Ok(())
    }

    /// Unbinds the component from the execution context.
    fn destroy(&self) {}

    /// Activation capability, for components constructed by the owning application.
    fn as_activatable(&self) -> Option<&dyn Activatable> {
        None
    }

    /// Name of the implementing type, used in diagnostics.
    fn provider_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Components that need the owning application before they can serve.
pub trait Activatable: Send + Sync {
    /// Called once after construction, before the component is handed out.
    fn activate(&self, host: &dyn ConsoleHost) -> Result<(), WebdeckError>;

    /// Called when the owning entry releases the component.
    fn deactivate(&self);
}

/// A bare request handler published to the directory without console metadata.
///
/// The registry wraps these so they can be served like any [`ConsolePlugin`].
pub trait RequestHandler: Send + Sync + 'static {
    fn init(&self, _config: &EntryConfig<'_>) -> Result<(), WebdeckError> {
        Ok(())
    }

    fn destroy(&self) {}

    /// Short free-form description of the handler.
    fn info(&self) -> Option<String> {
        None
    }

    fn provider_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
