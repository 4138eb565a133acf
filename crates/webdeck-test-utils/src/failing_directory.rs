// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A directory that fails on purpose.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;
use webdeck_core::{
    Directory, DirectoryListener, ServiceObject, ServiceReference, SubscriptionId, WebdeckError,
};

/// Which directory call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    Subscribe,
    References,
}

/// An empty [`Directory`] that fails at the chosen [`FailurePoint`].
pub struct FailingDirectory {
    point: FailurePoint,
    subscriptions: AtomicUsize,
    unsubscriptions: AtomicUsize,
}

impl FailingDirectory {
    pub fn new(point: FailurePoint) -> Self {
        Self {
            point,
            subscriptions: AtomicUsize::new(0),
            unsubscriptions: AtomicUsize::new(0),
        }
    }

    /// Subscriptions that succeeded and were not yet cancelled.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst) - self.unsubscriptions.load(Ordering::SeqCst)
    }
}

impl Directory for FailingDirectory {
    fn subscribe(
        &self,
        filter: &str,
        _listener: Arc<dyn DirectoryListener>,
    ) -> Result<SubscriptionId, WebdeckError> {
        if self.point == FailurePoint::Subscribe {
            debug!(filter, "failing directory refuses subscription");
            return Err(WebdeckError::Directory("subscription refused".to_string()));
        }
        let id = self.subscriptions.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        Ok(SubscriptionId(id))
    }

    fn unsubscribe(&self, _id: SubscriptionId) {
        self.unsubscriptions.fetch_add(1, Ordering::SeqCst);
    }

    fn references(&self, filter: &str) -> Result<Vec<ServiceReference>, WebdeckError> {
        match self.point {
            FailurePoint::References => {
                debug!(filter, "failing directory refuses enumeration");
                Err(WebdeckError::Directory("enumeration refused".to_string()))
            }
            FailurePoint::Subscribe => Ok(Vec::new()),
        }
    }

    fn get_service(&self, _reference: &ServiceReference) -> Option<ServiceObject> {
        None
    }

    fn release_service(&self, _reference: &ServiceReference) {}
}
