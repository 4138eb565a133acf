// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in console plugins and request handlers.
//!
//! The plugins are constructed through [`PluginFactories`] under the ids
//! `status`, `configuration` and `licenses`. The handlers back the services
//! declared in `[[directory.services]]`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;
use webdeck_config::WebdeckConfig;
use webdeck_core::{
    Activatable, ConsoleHost, ConsolePlugin, EntryConfig, RequestHandler, WebdeckError,
};
use webdeck_plugin::PluginFactories;

/// Factory ids of the built-in plugins.
pub const BUILTIN_PLUGINS: &[&str] = &["status", "configuration", "licenses"];

/// Handler ids usable in `[[directory.services]]`.
pub const BUILTIN_HANDLERS: &[&str] = &["echo", "health"];

/// Factories for every built-in plugin.
pub fn builtin_factories(config: Arc<WebdeckConfig>) -> PluginFactories {
    PluginFactories::new()
        .with("status", || {
            Ok::<_, WebdeckError>(Arc::new(StatusPlugin::default()) as Arc<dyn ConsolePlugin>)
        })
        .with("configuration", move || {
            Ok::<_, WebdeckError>(
                Arc::new(ConfigurationPlugin::new(Arc::clone(&config))) as Arc<dyn ConsolePlugin>
            )
        })
        .with("licenses", || {
            Ok::<_, WebdeckError>(Arc::new(LicensesPlugin) as Arc<dyn ConsolePlugin>)
        })
}

/// Handler registered under `id`, if any.
pub fn builtin_handler(id: &str) -> Option<Arc<dyn RequestHandler>> {
    match id {
        "echo" => Some(Arc::new(EchoHandler::default())),
        "health" => Some(Arc::new(HealthHandler)),
        _ => None,
    }
}

/// Reports the state of the console itself.
#[derive(Default)]
pub struct StatusPlugin {
    active: AtomicBool,
    origin: Mutex<Option<String>>,
}

impl StatusPlugin {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Origin of the host that activated the plugin.
    pub fn origin(&self) -> Option<String> {
        self.origin.lock().ok()?.clone()
    }
}

impl ConsolePlugin for StatusPlugin {
    fn label(&self) -> &str {
        "status"
    }

    fn title(&self) -> String {
        "%status.title".to_string()
    }

    fn category(&self) -> Option<String> {
        Some("Status".to_string())
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        Some(self)
    }
}

impl Activatable for StatusPlugin {
    fn activate(&self, host: &dyn ConsoleHost) -> Result<(), WebdeckError> {
        *self
            .origin
            .lock()
            .map_err(|_| WebdeckError::Internal("status plugin state poisoned".into()))? =
            Some(host.origin().to_string());
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Shows the effective configuration.
pub struct ConfigurationPlugin {
    config: Arc<WebdeckConfig>,
}

impl ConfigurationPlugin {
    pub fn new(config: Arc<WebdeckConfig>) -> Self {
        Self { config }
    }

    /// The effective configuration as TOML.
    pub fn render(&self) -> Result<String, WebdeckError> {
        toml::to_string_pretty(self.config.as_ref())
            .map_err(|e| WebdeckError::Config(format!("failed to render configuration: {e}")))
    }
}

impl ConsolePlugin for ConfigurationPlugin {
    fn label(&self) -> &str {
        "configuration"
    }

    fn title(&self) -> String {
        "%configuration.title".to_string()
    }

    fn category(&self) -> Option<String> {
        Some("Status".to_string())
    }
}

/// Lists the licenses of the console.
pub struct LicensesPlugin;

impl ConsolePlugin for LicensesPlugin {
    fn label(&self) -> &str {
        "licenses"
    }

    fn title(&self) -> String {
        "%licenses.title".to_string()
    }

    fn category(&self) -> Option<String> {
        Some("Info".to_string())
    }
}

/// Echoes the init parameters it was configured with.
#[derive(Default)]
pub struct EchoHandler {
    parameters: Mutex<Vec<String>>,
}

impl RequestHandler for EchoHandler {
    fn init(&self, config: &EntryConfig<'_>) -> Result<(), WebdeckError> {
        let names = config.init_parameter_names();
        debug!(name = config.name, parameters = names.len(), "echo handler attached");
        *self
            .parameters
            .lock()
            .map_err(|_| WebdeckError::Internal("echo handler state poisoned".into()))? = names;
        Ok(())
    }

    fn destroy(&self) {
        if let Ok(mut parameters) = self.parameters.lock() {
            parameters.clear();
        }
    }

    fn info(&self) -> Option<String> {
        let parameters = self.parameters.lock().ok()?;
        Some(format!("echo ({} parameters)", parameters.len()))
    }
}

/// Always reports healthy.
pub struct HealthHandler;

impl RequestHandler for HealthHandler {
    fn info(&self) -> Option<String> {
        Some("healthy".to_string())
    }
}
