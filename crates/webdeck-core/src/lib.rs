// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Webdeck plugin console.
//!
//! This crate provides the collaborator traits, error type, and shared types
//! used throughout the Webdeck workspace. Console components implement the
//! traits defined here; the registry in `webdeck-plugin` consumes them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WebdeckError;
pub use types::{
    props, EntryConfig, ExecutionContext, MessageTable, ServiceReference, SourceKind,
    SubscriptionId, CONSOLE_PLUGIN_CAPABILITY,
};

pub use traits::{
    Activatable, ConsoleHost, ConsolePlugin, Directory, DirectoryEvent, DirectoryListener,
    Localizer, RequestHandler, ServiceObject,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn reference(id: u64, properties: Value) -> ServiceReference {
        let Value::Object(map) = properties else {
            panic!("properties must be an object");
        };
        ServiceReference::new(id, "test-origin", map)
    }

    #[test]
    fn reference_always_carries_its_id_property() {
        let r = ServiceReference::new(42, "origin", Map::new());
        assert_eq!(r.id(), 42);
        assert_eq!(r.property(props::SERVICE_ID), Some(&json!(42)));
        assert_eq!(r.origin(), "origin");
    }

    #[test]
    fn ranking_defaults_to_zero() {
        assert_eq!(reference(1, json!({})).ranking(), 0);
        assert_eq!(reference(1, json!({ "service.ranking": "10" })).ranking(), 0);
        assert_eq!(reference(1, json!({ "service.ranking": 1.5 })).ranking(), 0);
        assert_eq!(
            reference(1, json!({ "service.ranking": i64::from(i32::MAX) + 1 })).ranking(),
            0
        );
        assert_eq!(reference(1, json!({ "service.ranking": -7 })).ranking(), -7);
    }

    #[test]
    fn label_must_be_a_string() {
        assert_eq!(reference(1, json!({ "webdeck.label": "bundles" })).label(), Some("bundles"));
        assert_eq!(reference(1, json!({ "webdeck.label": 5 })).label(), None);
    }

    #[test]
    fn capability_matches_string_or_array() {
        let single = reference(1, json!({ "objectClass": CONSOLE_PLUGIN_CAPABILITY }));
        let many = reference(2, json!({ "objectClass": ["other", CONSOLE_PLUGIN_CAPABILITY] }));
        let none = reference(3, json!({ "objectClass": ["other"] }));
        assert!(single.has_capability(CONSOLE_PLUGIN_CAPABILITY));
        assert!(many.has_capability(CONSOLE_PLUGIN_CAPABILITY));
        assert!(!none.has_capability(CONSOLE_PLUGIN_CAPABILITY));
    }

    #[test]
    fn init_parameters_skip_arrays() {
        let r = reference(
            9,
            json!({ "name": "x", "size": 3, "flag": true, "list": ["a", "b"] }),
        );
        assert_eq!(r.init_parameter("name").as_deref(), Some("x"));
        assert_eq!(r.init_parameter("size").as_deref(), Some("3"));
        assert_eq!(r.init_parameter("flag").as_deref(), Some("true"));
        assert_eq!(r.init_parameter("list"), None);
        assert_eq!(r.init_parameter("missing"), None);

        let ctx = ExecutionContext::new("/console");
        let config = EntryConfig {
            name: "Title",
            context: &ctx,
            reference: Some(&r),
        };
        assert_eq!(config.init_parameter("size").as_deref(), Some("3"));
        assert!(config.init_parameter_names().contains(&"list".to_string()));
    }

    #[test]
    fn direct_entry_config_has_no_parameters() {
        let ctx = ExecutionContext::new("/console").with_attribute("mode", "test");
        let config = EntryConfig {
            name: "Status",
            context: &ctx,
            reference: None,
        };
        assert!(config.init_parameter("anything").is_none());
        assert!(config.init_parameter_names().is_empty());
        assert_eq!(config.context.attributes.get("mode").map(String::as_str), Some("test"));
    }

    #[test]
    fn source_kind_display_round_trip() {
        use std::str::FromStr;

        for kind in [SourceKind::Directory, SourceKind::Direct] {
            let parsed = SourceKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(kind, parsed);
        }
        assert_eq!(SourceKind::Direct.to_string(), "direct");
    }

    #[test]
    fn error_messages_name_the_subject() {
        let err = WebdeckError::instantiation("status", "boom");
        assert!(err.to_string().contains("status"));
        assert!(err.to_string().contains("boom"));

        let err = WebdeckError::Subscription {
            filter: "(objectClass=x".into(),
            message: "unbalanced".into(),
        };
        assert!(err.to_string().contains("(objectClass=x"));
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin<T: ConsolePlugin>() {}
        fn _assert_handler<T: RequestHandler>() {}
        fn _assert_activatable<T: Activatable>() {}
        fn _assert_directory<T: Directory>() {}
        fn _assert_listener<T: DirectoryListener>() {}
        fn _assert_localizer<T: Localizer>() {}
        fn _assert_host<T: ConsoleHost>() {}
    }

    mod ranking_props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ranking_is_value_only_when_it_fits_i32(rank in any::<i64>()) {
                let r = reference(1, json!({ "service.ranking": rank }));
                let expected = i32::try_from(rank).unwrap_or(0);
                prop_assert_eq!(r.ranking(), expected);
            }
        }
    }
}
