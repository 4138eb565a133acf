// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles a running console from configuration.
//!
//! Startup order: resolve every configured handler, open the registry, publish
//! the directory services, register the internal plugins, then attach the
//! execution context. [`Console::shutdown`] reverses it.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};
use webdeck_config::WebdeckConfig;
use webdeck_core::{props, ExecutionContext, ServiceObject, ServiceReference, WebdeckError};
use webdeck_plugin::{ConfiguredHost, LabelMap, LocalDirectory, PluginRegistry};

use crate::builtin::{builtin_factories, builtin_handler, BUILTIN_HANDLERS};
use crate::i18n::ConfigLocalizer;

/// Name of the execution context the CLI attaches.
pub const CONTEXT_NAME: &str = "/webdeck";

/// A registry wired to the in-process directory and the built-in plugins.
pub struct Console {
    config: Arc<WebdeckConfig>,
    directory: Arc<LocalDirectory>,
    host: Arc<ConfiguredHost>,
    registry: Arc<PluginRegistry>,
    localizer: ConfigLocalizer,
    services: Vec<ServiceReference>,
}

impl Console {
    /// Builds and opens the console described by `config`.
    pub fn start(config: WebdeckConfig) -> Result<Self, WebdeckError> {
        let config = Arc::new(config);

        let mut handlers = Vec::with_capacity(config.directory.services.len());
        for service in &config.directory.services {
            let handler = builtin_handler(&service.handler).ok_or_else(|| {
                WebdeckError::Config(format!(
                    "unknown handler `{}` for service `{}` (expected one of: {})",
                    service.handler,
                    service.label,
                    BUILTIN_HANDLERS.join(", ")
                ))
            })?;
            handlers.push(handler);
        }

        let directory = Arc::new(LocalDirectory::new());
        let host = Arc::new(ConfiguredHost::from_config(&config.console));
        let registry = PluginRegistry::new(
            directory.clone(),
            host.clone(),
            builtin_factories(Arc::clone(&config)),
        );
        registry.open()?;

        let services = config
            .directory
            .services
            .iter()
            .zip(handlers)
            .map(|(service, handler)| {
                let mut properties = Map::new();
                properties.insert(props::LABEL.to_string(), Value::from(service.label.as_str()));
                if let Some(title) = &service.title {
                    properties.insert(props::TITLE.to_string(), Value::from(title.as_str()));
                }
                if let Some(category) = &service.category {
                    properties.insert(props::CATEGORY.to_string(), Value::from(category.as_str()));
                }
                if let Some(ranking) = service.ranking {
                    properties.insert(props::SERVICE_RANKING.to_string(), Value::from(ranking));
                }
                if let Some(provider) = &service.provider {
                    properties.insert(props::PROVIDER.to_string(), Value::from(provider.as_str()));
                }
                debug!(label = %service.label, handler = %service.handler, "publishing service");
                directory.publish(&service.origin, properties, ServiceObject::Handler(handler))
            })
            .collect();

        for plugin in &config.console.plugins {
            registry.add_direct(&plugin.factory, plugin.label.as_str());
        }
        registry.set_default_label(config.console.default_label.clone());
        registry.set_execution_context(Some(
            ExecutionContext::new(CONTEXT_NAME)
                .with_attribute("locale", config.console.locale.as_str()),
        ));

        info!(plugins = registry.len(), "console started");
        Ok(Self {
            localizer: ConfigLocalizer::new(&config.i18n),
            config,
            directory,
            host,
            registry,
            services,
        })
    }

    pub fn config(&self) -> &WebdeckConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn directory(&self) -> &Arc<LocalDirectory> {
        &self.directory
    }

    pub fn host(&self) -> &Arc<ConfiguredHost> {
        &self.host
    }

    pub fn localizer(&self) -> &ConfigLocalizer {
        &self.localizer
    }

    /// Label map in `locale`, falling back to the configured defaults.
    pub fn label_map(&self, locale: Option<&str>, default_category: Option<&str>) -> LabelMap {
        let console = &self.config.console;
        self.registry.build_localized_label_map(
            &self.localizer,
            locale.unwrap_or(&console.locale),
            default_category.unwrap_or(&console.default_category),
        )
    }

    /// Detaches the context, withdraws the published services and closes the registry.
    pub fn shutdown(self) {
        self.registry.set_execution_context(None);
        for reference in &self.services {
            self.directory.withdraw(reference);
        }
        self.registry.close();
        info!("console stopped");
    }
}
