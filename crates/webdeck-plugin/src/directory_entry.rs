// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entries backed by a service registration in the directory.

use std::sync::Arc;

use tracing::debug;
use webdeck_core::{props, ConsolePlugin, Directory, ServiceObject, ServiceReference};

use crate::adapter::HandlerAdapter;

/// Source of an entry whose component lives in the service directory.
///
/// Each resolution takes one hold on the service; [`DirectoryEntry::release`]
/// gives it back.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    reference: ServiceReference,
}

impl DirectoryEntry {
    pub fn new(reference: ServiceReference) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &ServiceReference {
        &self.reference
    }

    /// Provider name for diagnostics, from the registration only.
    pub fn provider(&self) -> String {
        if let Some(provider) = self.reference.string_property(props::PROVIDER) {
            return provider.to_string();
        }
        let class = match self.reference.property(props::OBJECT_CLASS) {
            Some(serde_json::Value::String(name)) => Some(name.as_str()),
            Some(serde_json::Value::Array(names)) => names.first().and_then(|n| n.as_str()),
            _ => None,
        };
        match class {
            Some(class) => format!("{class} #{}", self.reference.id()),
            None => format!("service #{}", self.reference.id()),
        }
    }

    pub(crate) fn acquire(
        &self,
        label: &str,
        directory: &dyn Directory,
    ) -> Option<Arc<dyn ConsolePlugin>> {
        match directory.get_service(&self.reference)? {
            ServiceObject::Plugin(plugin) => Some(plugin),
            ServiceObject::Handler(handler) => Some(Arc::new(HandlerAdapter::new(
                label,
                handler,
                self.reference.clone(),
            ))),
            ServiceObject::Other(_) => {
                debug!(
                    label,
                    service_id = self.reference.id(),
                    "service is neither a console plugin nor a request handler"
                );
                directory.release_service(&self.reference);
                None
            }
        }
    }

    pub(crate) fn release(&self, directory: &dyn Directory) {
        directory.release_service(&self.reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use webdeck_core::CONSOLE_PLUGIN_CAPABILITY;
    use webdeck_test_utils::{MockHandler, MockPlugin};

    use crate::local_directory::LocalDirectory;

    fn properties(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("object expected");
        };
        map
    }

    #[test]
    fn provider_prefers_explicit_property() {
        let entry = DirectoryEntry::new(ServiceReference::new(
            4,
            "bundle",
            properties(json!({ "webdeck.provider": "log-viewer", "objectClass": ["x"] })),
        ));
        assert_eq!(entry.provider(), "log-viewer");
    }

    #[test]
    fn provider_falls_back_to_capability_and_id() {
        let entry = DirectoryEntry::new(ServiceReference::new(
            4,
            "bundle",
            properties(json!({ "objectClass": [CONSOLE_PLUGIN_CAPABILITY] })),
        ));
        assert_eq!(entry.provider(), format!("{CONSOLE_PLUGIN_CAPABILITY} #4"));

        let bare = DirectoryEntry::new(ServiceReference::new(9, "bundle", Map::new()));
        assert_eq!(bare.provider(), "service #9");
    }

    #[test]
    fn plugin_objects_are_used_as_is() {
        let directory = LocalDirectory::new();
        let plugin = Arc::new(MockPlugin::new("logs", "Logs"));
        let reference = directory.publish(
            "bundle",
            properties(json!({ "webdeck.label": "logs" })),
            ServiceObject::Plugin(plugin),
        );
        let entry = DirectoryEntry::new(reference.clone());

        let component = entry.acquire("logs", &directory).expect("resolves");
        assert_eq!(component.title(), "Logs");
        assert_eq!(directory.holds(&reference), 1);

        entry.release(&directory);
        assert_eq!(directory.holds(&reference), 0);
    }

    #[test]
    fn handlers_are_adapted() {
        let directory = LocalDirectory::new();
        let reference = directory.publish(
            "bundle",
            properties(json!({ "webdeck.label": "echo", "webdeck.title": "Echo" })),
            ServiceObject::Handler(Arc::new(MockHandler::new())),
        );
        let component = DirectoryEntry::new(reference)
            .acquire("echo", &directory)
            .expect("adapted");
        assert_eq!(component.label(), "echo");
        assert_eq!(component.title(), "Echo");
    }

    #[test]
    fn unusable_objects_are_released() {
        let directory = LocalDirectory::new();
        let reference = directory.publish(
            "bundle",
            properties(json!({ "webdeck.label": "odd" })),
            ServiceObject::Other(Arc::new(17_u32)),
        );
        let entry = DirectoryEntry::new(reference.clone());
        assert!(entry.acquire("odd", &directory).is_none());
        assert_eq!(directory.holds(&reference), 0);
    }

    #[test]
    fn withdrawn_services_resolve_to_nothing() {
        let directory = LocalDirectory::new();
        let reference = directory.publish(
            "bundle",
            properties(json!({ "webdeck.label": "gone" })),
            ServiceObject::Plugin(Arc::new(MockPlugin::new("gone", "Gone"))),
        );
        directory.withdraw(&reference);
        assert!(DirectoryEntry::new(reference).acquire("gone", &directory).is_none());
    }
}
