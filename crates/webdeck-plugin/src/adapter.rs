// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serves a bare [`RequestHandler`] as a console plugin.

use std::sync::Arc;

use webdeck_core::{props, ConsolePlugin, EntryConfig, RequestHandler, ServiceReference, WebdeckError};

/// A [`RequestHandler`] published without console metadata, wrapped so the
/// registry can serve it under its label.
///
/// Title and category come from the registration properties; a handler
/// without a title is shown under its label.
pub struct HandlerAdapter {
    label: String,
    handler: Arc<dyn RequestHandler>,
    reference: ServiceReference,
}

impl HandlerAdapter {
    pub fn new(
        label: impl Into<String>,
        handler: Arc<dyn RequestHandler>,
        reference: ServiceReference,
    ) -> Self {
        Self {
            label: label.into(),
            handler,
            reference,
        }
    }
}

impl ConsolePlugin for HandlerAdapter {
    fn label(&self) -> &str {
        &self.label
    }

    fn title(&self) -> String {
        self.reference
            .string_property(props::TITLE)
            .unwrap_or(&self.label)
            .to_string()
    }

    fn category(&self) -> Option<String> {
        self.reference.string_property(props::CATEGORY).map(str::to_string)
    }

    fn init(&self, config: &EntryConfig<'_>) -> Result<(), WebdeckError> {
        self.handler.init(config)
    }

    fn destroy(&self) {
        self.handler.destroy();
    }

    fn provider_name(&self) -> &'static str {
        self.handler.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use webdeck_core::ExecutionContext;
    use webdeck_test_utils::MockHandler;

    fn reference(properties: Value) -> ServiceReference {
        let Value::Object(map) = properties else {
            panic!("object expected");
        };
        ServiceReference::new(3, "handlers", map)
    }

    #[test]
    fn title_defaults_to_label() {
        let adapter = HandlerAdapter::new("echo", Arc::new(MockHandler::new()), reference(json!({})));
        assert_eq!(adapter.title(), "echo");
        assert_eq!(adapter.category(), None);
    }

    #[test]
    fn metadata_comes_from_registration() {
        let adapter = HandlerAdapter::new(
            "echo",
            Arc::new(MockHandler::new()),
            reference(json!({ "webdeck.title": "Echo", "webdeck.category": "Tools" })),
        );
        assert_eq!(adapter.title(), "Echo");
        assert_eq!(adapter.category().as_deref(), Some("Tools"));
    }

    #[test]
    fn lifecycle_is_forwarded() {
        let handler = Arc::new(MockHandler::new());
        let adapter = HandlerAdapter::new("echo", handler.clone(), reference(json!({})));
        let context = ExecutionContext::new("/console");
        let r = reference(json!({}));
        let config = EntryConfig {
            name: "Echo",
            context: &context,
            reference: Some(&r),
        };

        adapter.init(&config).unwrap();
        adapter.destroy();
        assert_eq!(handler.init_calls(), 1);
        assert_eq!(handler.destroy_calls(), 1);
        assert_eq!(adapter.provider_name(), handler.provider_name());
    }
}
