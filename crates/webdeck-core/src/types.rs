// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the directory, the registry, and console components.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Well-known service property keys.
pub mod props {
    /// Label under which a directory service is registered in the console.
    pub const LABEL: &str = "webdeck.label";
    /// Title overriding the one reported by the component.
    pub const TITLE: &str = "webdeck.title";
    /// Slash-separated category path overriding the component's category.
    pub const CATEGORY: &str = "webdeck.category";
    /// Human-readable provider name used in conflict diagnostics.
    pub const PROVIDER: &str = "webdeck.provider";
    /// Directory-assigned registration id.
    pub const SERVICE_ID: &str = "service.id";
    /// Tie-break priority; higher wins.
    pub const SERVICE_RANKING: &str = "service.ranking";
    /// Capability names the service is registered under.
    pub const OBJECT_CLASS: &str = "objectClass";
}

/// Capability name console components are registered under in the directory.
pub const CONSOLE_PLUGIN_CAPABILITY: &str = "webdeck.ConsolePlugin";

/// Localized message table: key to translated string.
pub type MessageTable = HashMap<String, String>;

/// Handle returned by a directory subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Where a registry entry obtains its component from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Component is looked up from the service directory on demand.
    Directory,
    /// Component is constructed by the owning application from a factory.
    Direct,
}

/// A directory's handle on one registered service.
///
/// Carries the directory-assigned id, the origin (the module that
/// published the service), and the registration properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReference {
    id: u64,
    origin: String,
    properties: Map<String, Value>,
}

impl ServiceReference {
    /// Creates a reference. The `service.id` property is always set to `id`.
    pub fn new(id: u64, origin: impl Into<String>, mut properties: Map<String, Value>) -> Self {
        properties.insert(props::SERVICE_ID.to_string(), Value::from(id));
        Self {
            id,
            origin: origin.into(),
            properties,
        }
    }

    /// Directory-assigned, monotonically increasing registration id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name of the module that published the service.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Raw property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// All property keys, in the directory's order.
    pub fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Returns the property only if it is a string.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Console label, if the service carries one.
    pub fn label(&self) -> Option<&str> {
        self.string_property(props::LABEL)
    }

    /// Service ranking; absent, non-integer, or out-of-range values count as 0.
    pub fn ranking(&self) -> i32 {
        self.properties
            .get(props::SERVICE_RANKING)
            .and_then(Value::as_i64)
            .and_then(|rank| i32::try_from(rank).ok())
            .unwrap_or(0)
    }

    /// Whether the service was published under the given capability name.
    pub fn has_capability(&self, capability: &str) -> bool {
        match self.properties.get(props::OBJECT_CLASS) {
            Some(Value::String(name)) => name == capability,
            Some(Value::Array(names)) => names.iter().any(|n| n.as_str() == Some(capability)),
            _ => false,
        }
    }

    /// Property rendered as an init parameter. Arrays and objects are not parameters.
    pub fn init_parameter(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(_) | Value::Object(_) | Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// The external resource entries are initialized against while attached.
///
/// The registry treats this as opaque; components may read its name and
/// attributes during `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Name of the context, e.g. the mount path of the console.
    pub name: String,
    /// Free-form attributes made available to components.
    pub attributes: BTreeMap<String, String>,
}

impl ExecutionContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// What a component receives when it is initialized by its entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryConfig<'a> {
    /// Plugin name; the entry's title.
    pub name: &'a str,
    /// The execution context the registry is attached to.
    pub context: &'a ExecutionContext,
    /// Registration of the service, for directory-backed entries.
    pub reference: Option<&'a ServiceReference>,
}

impl EntryConfig<'_> {
    /// Init parameter taken from the service registration properties.
    pub fn init_parameter(&self, name: &str) -> Option<String> {
        self.reference.and_then(|r| r.init_parameter(name))
    }

    /// Names of all init parameters; empty for directly constructed components.
    pub fn init_parameter_names(&self) -> Vec<String> {
        self.reference
            .map(|r| r.property_keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
