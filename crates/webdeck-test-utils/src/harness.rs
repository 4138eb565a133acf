// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for registry integration testing.
//!
//! `TestHarness` assembles an opened `PluginRegistry` over an in-process
//! `LocalDirectory` and a `ConfiguredHost`, and offers shortcuts to publish
//! and withdraw console services.

use std::sync::Arc;

use serde_json::{Map, Value};
use webdeck_core::{props, ConsolePlugin, ServiceObject, ServiceReference, WebdeckError};
use webdeck_plugin::{ConfiguredHost, LocalDirectory, PluginFactories, PluginFactory, PluginRegistry};

use crate::mock_plugin::MockPlugin;

/// Origin used for services published through the harness.
pub const TEST_ORIGIN: &str = "test-bundle";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    factories: PluginFactories,
    disabled: Vec<String>,
    open: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            factories: PluginFactories::new(),
            disabled: Vec::new(),
            open: true,
        }
    }

    /// Register a plugin factory.
    pub fn with_factory(mut self, id: &str, factory: impl PluginFactory + 'static) -> Self {
        self.factories.register(id, factory);
        self
    }

    /// Register a factory that hands out the given mock on every call.
    pub fn with_mock_factory(self, id: &str, plugin: Arc<MockPlugin>) -> Self {
        self.with_factory(id, move || {
            Ok::<_, WebdeckError>(Arc::clone(&plugin) as Arc<dyn ConsolePlugin>)
        })
    }

    /// Mark factory ids as administratively disabled.
    pub fn with_disabled(mut self, ids: &[&str]) -> Self {
        self.disabled = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Leave the registry closed after building.
    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    /// Build the harness, opening the registry unless told otherwise.
    pub fn build(self) -> Result<TestHarness, WebdeckError> {
        let directory = Arc::new(LocalDirectory::new());
        let host = Arc::new(ConfiguredHost::new(TEST_ORIGIN, self.disabled));
        let registry = PluginRegistry::new(directory.clone(), host.clone(), self.factories);
        if self.open {
            registry.open()?;
        }
        Ok(TestHarness {
            directory,
            host,
            registry,
        })
    }
}

/// An assembled registry with direct access to its collaborators.
pub struct TestHarness {
    pub directory: Arc<LocalDirectory>,
    pub host: Arc<ConfiguredHost>,
    pub registry: Arc<PluginRegistry>,
}

impl TestHarness {
    /// Create a builder for a custom test environment.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Publish `plugin` under `label` with the given ranking.
    pub fn publish_plugin(
        &self,
        label: &str,
        ranking: i32,
        plugin: Arc<MockPlugin>,
    ) -> ServiceReference {
        let mut properties = Map::new();
        properties.insert(props::LABEL.to_string(), Value::from(label));
        properties.insert(props::SERVICE_RANKING.to_string(), Value::from(ranking));
        self.publish(properties, ServiceObject::Plugin(plugin))
    }

    /// Publish any object with explicit properties.
    pub fn publish(&self, properties: Map<String, Value>, object: ServiceObject) -> ServiceReference {
        self.directory.publish(TEST_ORIGIN, properties, object)
    }

    pub fn withdraw(&self, reference: &ServiceReference) -> bool {
        self.directory.withdraw(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_opens_registry() {
        let harness = TestHarness::builder().build().unwrap();
        assert!(harness.registry.is_open());
        harness.publish_plugin("a", 0, Arc::new(MockPlugin::new("a", "A")));
        assert_eq!(harness.registry.labels(), vec!["a"]);
    }

    #[test]
    fn closed_harness_ignores_publications() {
        let harness = TestHarness::builder().closed().build().unwrap();
        harness.publish_plugin("a", 0, Arc::new(MockPlugin::new("a", "A")));
        assert!(harness.registry.is_empty());
    }
}
