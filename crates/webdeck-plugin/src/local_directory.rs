// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-process service directory.
//!
//! `LocalDirectory` holds published services in memory, assigns them
//! increasing ids, counts holds, and delivers change events synchronously to
//! subscribers. Listeners are always called without the directory lock held,
//! so they may call back into the directory.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tracing::debug;
use webdeck_core::{
    props, Directory, DirectoryEvent, DirectoryListener, ServiceObject, ServiceReference,
    SubscriptionId, WebdeckError, CONSOLE_PLUGIN_CAPABILITY,
};

use crate::entry::lock;

/// Builds the only filter form the directory understands.
pub fn capability_filter(capability: &str) -> String {
    format!("({}={capability})", props::OBJECT_CLASS)
}

fn parse_filter(filter: &str) -> Result<&str, WebdeckError> {
    filter
        .strip_prefix('(')
        .and_then(|f| f.strip_suffix(')'))
        .and_then(|f| f.strip_prefix(props::OBJECT_CLASS))
        .and_then(|f| f.strip_prefix('='))
        .filter(|capability| !capability.is_empty())
        .ok_or_else(|| WebdeckError::Directory(format!("unsupported filter `{filter}`")))
}

struct Published {
    reference: ServiceReference,
    object: ServiceObject,
    holds: usize,
}

struct Subscription {
    id: SubscriptionId,
    capability: String,
    listener: Arc<dyn DirectoryListener>,
}

#[derive(Default)]
struct Inner {
    services: BTreeMap<u64, Published>,
    subscriptions: Vec<Subscription>,
}

impl Inner {
    fn listeners_for(&self, reference: &ServiceReference) -> Vec<Arc<dyn DirectoryListener>> {
        self.subscriptions
            .iter()
            .filter(|s| reference.has_capability(&s.capability))
            .map(|s| Arc::clone(&s.listener))
            .collect()
    }
}

/// In-memory [`Directory`].
#[derive(Default)]
pub struct LocalDirectory {
    inner: Mutex<Inner>,
    next_service_id: AtomicU64,
    next_subscription_id: AtomicU64,
}

impl LocalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `object` and announces it to matching subscribers.
    ///
    /// Properties without an `objectClass` are published under the console
    /// plugin capability.
    pub fn publish(
        &self,
        origin: &str,
        mut properties: Map<String, Value>,
        object: ServiceObject,
    ) -> ServiceReference {
        properties
            .entry(props::OBJECT_CLASS)
            .or_insert_with(|| Value::from(vec![CONSOLE_PLUGIN_CAPABILITY]));
        let id = self.next_service_id.fetch_add(1, Ordering::Relaxed) + 1;
        let reference = ServiceReference::new(id, origin, properties);

        let listeners = {
            let mut inner = lock(&self.inner);
            inner.services.insert(
                id,
                Published {
                    reference: reference.clone(),
                    object,
                    holds: 0,
                },
            );
            inner.listeners_for(&reference)
        };
        debug!(service_id = id, origin, "service published");
        for listener in listeners {
            listener.service_changed(DirectoryEvent::Registered(reference.clone()));
        }
        reference
    }

    /// Replaces the properties of a published service and announces the change.
    ///
    /// Returns the updated reference, or `None` if the service is gone.
    pub fn modify(&self, id: u64, properties: Map<String, Value>) -> Option<ServiceReference> {
        let (reference, listeners) = {
            let mut inner = lock(&self.inner);
            let published = inner.services.get_mut(&id)?;
            let mut properties = properties;
            if !properties.contains_key(props::OBJECT_CLASS) {
                if let Some(class) = published.reference.property(props::OBJECT_CLASS) {
                    properties.insert(props::OBJECT_CLASS.to_string(), class.clone());
                }
            }
            published.reference =
                ServiceReference::new(id, published.reference.origin(), properties);
            let reference = published.reference.clone();
            let listeners = inner.listeners_for(&reference);
            (reference, listeners)
        };
        for listener in listeners {
            listener.service_changed(DirectoryEvent::Modified(reference.clone()));
        }
        Some(reference)
    }

    /// Announces the withdrawal to subscribers, then removes the service.
    ///
    /// Subscribers may still release their holds while being notified.
    pub fn withdraw(&self, reference: &ServiceReference) -> bool {
        let listeners = {
            let inner = lock(&self.inner);
            match inner.services.get(&reference.id()) {
                Some(published) => inner.listeners_for(&published.reference),
                None => return false,
            }
        };
        let current = self.reference(reference.id()).unwrap_or_else(|| reference.clone());
        for listener in listeners {
            listener.service_changed(DirectoryEvent::Unregistering(current.clone()));
        }
        let removed = lock(&self.inner).services.remove(&reference.id());
        if let Some(published) = &removed {
            debug!(
                service_id = reference.id(),
                outstanding_holds = published.holds,
                "service withdrawn"
            );
        }
        removed.is_some()
    }

    /// Current reference of a published service.
    pub fn reference(&self, id: u64) -> Option<ServiceReference> {
        lock(&self.inner)
            .services
            .get(&id)
            .map(|p| p.reference.clone())
    }

    /// Outstanding holds on a service; 0 once it is withdrawn.
    pub fn holds(&self, reference: &ServiceReference) -> usize {
        lock(&self.inner)
            .services
            .get(&reference.id())
            .map_or(0, |p| p.holds)
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).services.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).services.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscriptions.len()
    }
}

impl Directory for LocalDirectory {
    fn subscribe(
        &self,
        filter: &str,
        listener: Arc<dyn DirectoryListener>,
    ) -> Result<SubscriptionId, WebdeckError> {
        let capability = parse_filter(filter)?.to_string();
        let id = SubscriptionId(self.next_subscription_id.fetch_add(1, Ordering::Relaxed) + 1);
        lock(&self.inner).subscriptions.push(Subscription {
            id,
            capability,
            listener,
        });
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.inner).subscriptions.retain(|s| s.id != id);
    }

    fn references(&self, filter: &str) -> Result<Vec<ServiceReference>, WebdeckError> {
        let capability = parse_filter(filter)?;
        Ok(lock(&self.inner)
            .services
            .values()
            .filter(|p| p.reference.has_capability(capability))
            .map(|p| p.reference.clone())
            .collect())
    }

    fn get_service(&self, reference: &ServiceReference) -> Option<ServiceObject> {
        let mut inner = lock(&self.inner);
        let published = inner.services.get_mut(&reference.id())?;
        published.holds += 1;
        Some(published.object.clone())
    }

    fn release_service(&self, reference: &ServiceReference) {
        if let Some(published) = lock(&self.inner).services.get_mut(&reference.id()) {
            published.holds = published.holds.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use webdeck_test_utils::MockPlugin;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<DirectoryEvent>>,
    }

    impl DirectoryListener for Recorder {
        fn service_changed(&self, event: DirectoryEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn plugin(label: &str) -> ServiceObject {
        ServiceObject::Plugin(Arc::new(MockPlugin::new(label, label)))
    }

    fn labelled(label: &str) -> Map<String, Value> {
        let Value::Object(map) = json!({ "webdeck.label": label }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn filter_parsing() {
        assert_eq!(parse_filter("(objectClass=a.B)").unwrap(), "a.B");
        assert!(parse_filter("objectClass=a.B").is_err());
        assert!(parse_filter("(label=x)").is_err());
        assert!(parse_filter("(objectClass=)").is_err());
        assert_eq!(capability_filter("x.Y"), "(objectClass=x.Y)");
    }

    #[test]
    fn ids_increase_from_one() {
        let directory = LocalDirectory::new();
        let a = directory.publish("o", labelled("a"), plugin("a"));
        let b = directory.publish("o", labelled("b"), plugin("b"));
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert!(a.has_capability(CONSOLE_PLUGIN_CAPABILITY));
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn subscribers_see_the_lifecycle() {
        let directory = LocalDirectory::new();
        let recorder = Arc::new(Recorder::default());
        let filter = capability_filter(CONSOLE_PLUGIN_CAPABILITY);
        let id = directory.subscribe(&filter, recorder.clone()).unwrap();

        let reference = directory.publish("o", labelled("a"), plugin("a"));
        directory.modify(reference.id(), labelled("renamed")).unwrap();
        assert!(directory.withdraw(&reference));
        assert!(!directory.withdraw(&reference));

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], DirectoryEvent::Registered(r) if r.label() == Some("a")));
        assert!(matches!(&events[1], DirectoryEvent::Modified(r) if r.label() == Some("renamed")));
        assert!(matches!(&events[2], DirectoryEvent::Unregistering(r) if r.id() == reference.id()));

        directory.unsubscribe(id);
        directory.publish("o", labelled("b"), plugin("b"));
        assert_eq!(recorder.events.lock().unwrap().len(), 3);
    }

    #[test]
    fn other_capabilities_are_filtered_out() {
        let directory = LocalDirectory::new();
        let mut properties = labelled("x");
        properties.insert("objectClass".into(), json!("something.Else"));
        directory.publish("o", properties, plugin("x"));
        directory.publish("o", labelled("y"), plugin("y"));

        let found = directory
            .references(&capability_filter(CONSOLE_PLUGIN_CAPABILITY))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label(), Some("y"));
    }

    #[test]
    fn holds_are_counted() {
        let directory = LocalDirectory::new();
        let reference = directory.publish("o", labelled("a"), plugin("a"));
        assert!(directory.get_service(&reference).is_some());
        assert!(directory.get_service(&reference).is_some());
        assert_eq!(directory.holds(&reference), 2);
        directory.release_service(&reference);
        directory.release_service(&reference);
        directory.release_service(&reference);
        assert_eq!(directory.holds(&reference), 0);
    }
}
