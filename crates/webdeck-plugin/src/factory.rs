// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Factories for directly constructed console plugins.
//!
//! The owning application registers one [`PluginFactory`] per factory id.
//! Direct entries look their factory up here and construct the component on
//! first use.

use std::collections::HashMap;
use std::sync::Arc;

use webdeck_core::{ConsolePlugin, WebdeckError};

/// Constructs a fresh console component.
pub trait PluginFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn ConsolePlugin>, WebdeckError>;
}

impl<F> PluginFactory for F
where
    F: Fn() -> Result<Arc<dyn ConsolePlugin>, WebdeckError> + Send + Sync,
{
    fn create(&self) -> Result<Arc<dyn ConsolePlugin>, WebdeckError> {
        self()
    }
}

/// Factory ids mapped to their factories.
#[derive(Clone, Default)]
pub struct PluginFactories {
    factories: HashMap<String, Arc<dyn PluginFactory>>,
}

impl PluginFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `id`, replacing any previous one.
    pub fn register(&mut self, id: impl Into<String>, factory: impl PluginFactory + 'static) {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Builder-style [`PluginFactories::register`].
    pub fn with(mut self, id: impl Into<String>, factory: impl PluginFactory + 'static) -> Self {
        self.register(id, factory);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn PluginFactory>> {
        self.factories.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for PluginFactories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactories")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webdeck_test_utils::MockPlugin;

    fn mock(label: &'static str) -> impl PluginFactory {
        move || Ok::<_, WebdeckError>(Arc::new(MockPlugin::new(label, label)) as Arc<dyn ConsolePlugin>)
    }

    #[test]
    fn register_and_get_roundtrip() {
        let factories = PluginFactories::new().with("status", mock("status"));
        let component = factories
            .get("status")
            .expect("registered")
            .create()
            .expect("create");
        assert_eq!(component.label(), "status");
        assert!(factories.get("missing").is_none());
    }

    #[test]
    fn ids_are_sorted() {
        let factories = PluginFactories::new()
            .with("zebra", mock("zebra"))
            .with("alpha", mock("alpha"));
        assert_eq!(factories.ids(), vec!["alpha", "zebra"]);
        assert_eq!(factories.len(), 2);
        assert!(factories.contains("alpha"));
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut factories = PluginFactories::new();
        factories.register("x", mock("first"));
        factories.register("x", mock("second"));
        let component = factories.get("x").unwrap().create().unwrap();
        assert_eq!(component.label(), "second");
        assert_eq!(factories.len(), 1);
    }

    #[test]
    fn factory_errors_propagate() {
        let factories = PluginFactories::new().with("broken", || {
            Err::<Arc<dyn ConsolePlugin>, _>(WebdeckError::Internal("boom".into()))
        });
        let err = factories
            .get("broken")
            .unwrap()
            .create()
            .err()
            .expect("factory error");
        assert!(err.to_string().contains("boom"));
    }
}
