// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The external service directory the registry discovers components from.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::WebdeckError;
use crate::traits::plugin::{ConsolePlugin, RequestHandler};
use crate::types::{ServiceReference, SubscriptionId};

/// A change to a service registration.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEvent {
    /// A service matching the subscription filter was published.
    Registered(ServiceReference),
    /// Registration properties of a service changed.
    Modified(ServiceReference),
    /// A service is about to be withdrawn.
    Unregistering(ServiceReference),
}

impl DirectoryEvent {
    pub fn reference(&self) -> &ServiceReference {
        match self {
            DirectoryEvent::Registered(r)
            | DirectoryEvent::Modified(r)
            | DirectoryEvent::Unregistering(r) => r,
        }
    }
}

/// A service instance as handed out by the directory.
#[derive(Clone)]
pub enum ServiceObject {
    /// A full console component.
    Plugin(Arc<dyn ConsolePlugin>),
    /// A bare handler that needs adapting.
    Handler(Arc<dyn RequestHandler>),
    /// Something the console cannot use.
    Other(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for ServiceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceObject::Plugin(p) => f.debug_tuple("Plugin").field(&p.provider_name()).finish(),
            ServiceObject::Handler(h) => f.debug_tuple("Handler").field(&h.provider_name()).finish(),
            ServiceObject::Other(_) => f.write_str("Other"),
        }
    }
}

/// Receives registration changes from a [`Directory`] subscription.
pub trait DirectoryListener: Send + Sync {
    fn service_changed(&self, event: DirectoryEvent);
}

/// A registry of services that announces and retracts components.
///
/// Filters use the form `(objectClass=<capability>)`.
pub trait Directory: Send + Sync {
    /// Starts delivering events for services matching `filter` to `listener`.
    ///
    /// Fails only for malformed filters.
    fn subscribe(
        &self,
        filter: &str,
        listener: Arc<dyn DirectoryListener>,
    ) -> Result<SubscriptionId, WebdeckError>;

    /// Stops a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Snapshot of all currently registered services matching `filter`.
    fn references(&self, filter: &str) -> Result<Vec<ServiceReference>, WebdeckError>;

    /// Takes a hold on the service instance. `None` if it is gone.
    fn get_service(&self, reference: &ServiceReference) -> Option<ServiceObject>;

    /// Gives back one hold taken by [`Directory::get_service`].
    fn release_service(&self, reference: &ServiceReference);
}
