// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin registry: labels mapped to lazily resolved console components.
//!
//! The `PluginRegistry` stores one [`PluginEntry`] per label. Entries come
//! from two places: services announced by the [`Directory`], and plugins the
//! owning application constructs from its [`PluginFactories`]. When two
//! entries claim a label, the one with the higher ranking stays; on equal
//! ranking the earlier registration stays.
//!
//! The table lock is never held while plugin code runs. Readers take a
//! snapshot of the entries and work on that.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use arc_swap::ArcSwapOption;
use serde::Serialize;
use tracing::{debug, info, warn};
use webdeck_core::{
    ConsoleHost, ConsolePlugin, Directory, DirectoryEvent, DirectoryListener, ExecutionContext,
    Localizer, ServiceReference, SourceKind, SubscriptionId, WebdeckError,
    CONSOLE_PLUGIN_CAPABILITY,
};

use crate::direct_entry::DirectEntry;
use crate::directory_entry::DirectoryEntry;
use crate::entry::{lock, EntrySource, PluginEntry, Shared};
use crate::factory::PluginFactories;
use crate::labels::{localize, LabelMap};
use crate::local_directory::capability_filter;

/// Snapshot of one entry, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub label: String,
    pub title: String,
    pub category: Option<String>,
    pub source: SourceKind,
    pub provider: String,
    pub rank: i32,
    pub sequence_id: u64,
    pub enabled: bool,
    pub warm: bool,
}

/// Registry of console plugins keyed by label.
pub struct PluginRegistry {
    shared: Arc<Shared>,
    factories: PluginFactories,
    plugins: Mutex<HashMap<String, Arc<PluginEntry>>>,
    default_label: Mutex<Option<String>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl PluginRegistry {
    /// Creates an empty, closed registry.
    pub fn new(
        directory: Arc<dyn Directory>,
        host: Arc<dyn ConsoleHost>,
        factories: PluginFactories,
    ) -> Arc<Self> {
        Arc::new(Self {
            shared: Arc::new(Shared {
                directory,
                host,
                context: ArcSwapOption::empty(),
            }),
            factories,
            plugins: Mutex::new(HashMap::new()),
            default_label: Mutex::new(None),
            subscription: Mutex::new(None),
        })
    }

    /// Subscribes to the directory and registers every console plugin already
    /// published. Opening twice is a no-op.
    pub fn open(self: &Arc<Self>) -> Result<(), WebdeckError> {
        let filter = capability_filter(CONSOLE_PLUGIN_CAPABILITY);
        {
            let mut subscription = lock(&self.subscription);
            if subscription.is_some() {
                debug!("plugin registry already open");
                return Ok(());
            }
            let listener = Arc::new(RegistryListener {
                registry: Arc::downgrade(self),
            });
            let id = self
                .shared
                .directory
                .subscribe(&filter, listener)
                .map_err(|e| subscription_error(&filter, e))?;
            *subscription = Some(id);
        }

        let references = match self.shared.directory.references(&filter) {
            Ok(references) => references,
            Err(e) => {
                let subscription = lock(&self.subscription).take();
                if let Some(id) = subscription {
                    self.shared.directory.unsubscribe(id);
                }
                return Err(subscription_error(&filter, e));
            }
        };
        for reference in references {
            self.add_service(reference);
        }
        info!(plugins = self.len(), "plugin registry opened");
        Ok(())
    }

    /// Unsubscribes, releases every warm component, and empties the table.
    /// Safe to call repeatedly.
    pub fn close(&self) {
        let subscription = lock(&self.subscription).take();
        if let Some(id) = subscription {
            self.shared.directory.unsubscribe(id);
        }
        let entries: Vec<Arc<PluginEntry>> = lock(&self.plugins).drain().map(|(_, e)| e).collect();
        let released = entries.len();
        for entry in entries {
            entry.dispose();
        }
        *lock(&self.default_label) = None;
        if released > 0 {
            info!(plugins = released, "plugin registry closed");
        }
    }

    pub fn is_open(&self) -> bool {
        lock(&self.subscription).is_some()
    }

    /// Entry for a directory service; `None` if it has no string label.
    pub fn service_entry(&self, reference: ServiceReference) -> Option<PluginEntry> {
        let label = reference.label()?.to_string();
        Some(PluginEntry::new(
            label,
            EntrySource::Directory(DirectoryEntry::new(reference)),
            Arc::clone(&self.shared),
        ))
    }

    /// Entry for a plugin built by the factory registered under `factory_id`.
    pub fn direct_entry(&self, factory_id: &str, label: impl Into<String>) -> PluginEntry {
        let factory = self.factories.get(factory_id);
        if factory.is_none() {
            warn!(factory = factory_id, "no factory registered, plugin will never resolve");
        }
        PluginEntry::new(
            label.into(),
            EntrySource::Direct(DirectEntry::new(factory_id, factory)),
            Arc::clone(&self.shared),
        )
    }

    /// Inserts `entry` under its label, resolving a conflict with the entry
    /// already there. The losing entry is disposed.
    pub fn register(&self, entry: PluginEntry) {
        let entry = Arc::new(entry);
        let loser = {
            let mut plugins = lock(&self.plugins);
            match plugins.entry(entry.label().to_string()) {
                Entry::Vacant(slot) => {
                    debug!(label = entry.label(), provider = %entry.provider(), "plugin registered");
                    slot.insert(entry);
                    None
                }
                Entry::Occupied(mut slot) => match entry.compare_rank(slot.get()) {
                    Ordering::Equal => {
                        debug!(label = entry.label(), "ignoring repeated registration");
                        Some(entry)
                    }
                    Ordering::Greater => {
                        warn!(
                            label = entry.label(),
                            replaced = %slot.get().provider(),
                            provider = %entry.provider(),
                            "overwriting plugin with a preferred provider"
                        );
                        Some(slot.insert(entry))
                    }
                    Ordering::Less => {
                        warn!(
                            label = entry.label(),
                            kept = %slot.get().provider(),
                            provider = %entry.provider(),
                            "ignoring plugin: label already held by a preferred provider"
                        );
                        Some(entry)
                    }
                },
            }
        };
        if let Some(loser) = loser {
            loser.dispose();
        }
    }

    /// Removes and disposes the entry under `label`, whichever it is.
    pub fn unregister(&self, label: &str) -> bool {
        let removed = lock(&self.plugins).remove(label);
        match removed {
            Some(entry) => {
                entry.dispose();
                debug!(label, "plugin unregistered");
                true
            }
            None => false,
        }
    }

    /// Registers a console plugin announced by the directory.
    pub fn add_service(&self, reference: ServiceReference) {
        let id = reference.id();
        match self.service_entry(reference) {
            Some(entry) => self.register(entry),
            None => debug!(service_id = id, "ignoring console service without a label"),
        }
    }

    /// Drops the entry of a withdrawn service, if that service is the one
    /// currently holding a label.
    ///
    /// The entry is found by its announced label first, then by service id,
    /// so a service whose label changed after registration is still removed.
    pub fn remove_service(&self, reference: &ServiceReference) {
        let owns = |entry: &PluginEntry| {
            entry.kind() == SourceKind::Directory && entry.sequence_id() == reference.id()
        };
        let removed = {
            let mut plugins = lock(&self.plugins);
            let held = reference
                .label()
                .filter(|label| plugins.get(*label).is_some_and(|e| owns(&**e)))
                .map(str::to_string)
                .or_else(|| {
                    plugins
                        .iter()
                        .find(|(_, e)| owns(&***e))
                        .map(|(label, _)| label.clone())
                });
            held.and_then(|label| plugins.remove(&label))
        };
        match removed {
            Some(entry) => {
                entry.dispose();
                debug!(label = entry.label(), service_id = reference.id(), "plugin withdrawn");
            }
            None => debug!(
                service_id = reference.id(),
                "withdrawn service does not hold a label"
            ),
        }
    }

    /// Registers a plugin constructed from `factory_id` under `label`.
    pub fn add_direct(&self, factory_id: &str, label: impl Into<String>) {
        self.register(self.direct_entry(factory_id, label));
    }

    /// Removes a directly constructed plugin.
    pub fn remove_direct(&self, label: &str) -> bool {
        self.unregister(label)
    }

    /// Component registered under `label`, resolved on demand.
    ///
    /// An empty label yields the first component that resolves, in label
    /// order.
    pub fn lookup(&self, label: &str) -> Option<Arc<dyn ConsolePlugin>> {
        if label.is_empty() {
            return self.snapshot().iter().find_map(|entry| entry.component());
        }
        let entry = lock(&self.plugins).get(label).cloned();
        entry?.component()
    }

    /// Component under the configured default label, falling back to the
    /// first one that resolves.
    pub fn lookup_default(&self) -> Option<Arc<dyn ConsolePlugin>> {
        let preferred = self.default_label();
        preferred
            .as_deref()
            .and_then(|label| self.lookup(label))
            .or_else(|| self.lookup(""))
    }

    /// Builds the navigation map of every enabled, resolvable entry.
    ///
    /// Entries without a category are filed under `default_category`. Titles
    /// starting with `%` are localized through `localizer`; failures keep the
    /// raw title and never affect other entries.
    pub fn build_localized_label_map(
        &self,
        localizer: &dyn Localizer,
        locale: &str,
        default_category: &str,
    ) -> LabelMap {
        let mut map = LabelMap::default();
        for entry in self.snapshot() {
            if !entry.is_enabled() {
                continue;
            }
            let title = entry.title();
            let category = entry
                .category()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| default_category.to_string());
            if entry.is_broken() {
                continue;
            }
            let title = localize(title, &entry.origin(), locale, localizer);
            map.insert(&category, entry.label(), title);
        }
        map
    }

    /// Attaches every entry to `context`, or detaches them on `None`.
    ///
    /// Failures are logged per entry and never stop the others.
    pub fn set_execution_context(&self, context: Option<ExecutionContext>) {
        let entries = self.snapshot();
        match context {
            Some(context) => {
                let context = Arc::new(context);
                self.shared.context.store(Some(Arc::clone(&context)));
                for entry in &entries {
                    if let Err(e) = entry.init(&context) {
                        warn!(label = entry.label(), error = %e, "plugin failed to initialize");
                    }
                }
                info!(context = %context.name, plugins = entries.len(), "execution context attached");
            }
            None => {
                for entry in &entries {
                    if let Err(e) = entry.destroy() {
                        warn!(label = entry.label(), error = %e, "plugin failed to tear down");
                    }
                }
                self.shared.context.store(None);
                info!(plugins = entries.len(), "execution context detached");
            }
        }
    }

    pub fn execution_context(&self) -> Option<Arc<ExecutionContext>> {
        self.shared.context.load_full()
    }

    pub fn default_label(&self) -> Option<String> {
        lock(&self.default_label).clone()
    }

    pub fn set_default_label(&self, label: Option<String>) {
        *lock(&self.default_label) = label;
    }

    pub fn entry(&self, label: &str) -> Option<Arc<PluginEntry>> {
        lock(&self.plugins).get(label).cloned()
    }

    /// Registered labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = lock(&self.plugins).keys().cloned().collect();
        labels.sort();
        labels
    }

    /// One [`PluginInfo`] per entry, sorted by label. Resolves titles.
    pub fn describe(&self) -> Vec<PluginInfo> {
        self.snapshot()
            .iter()
            .map(|entry| PluginInfo {
                label: entry.label().to_string(),
                title: entry.title(),
                category: entry.category(),
                source: entry.kind(),
                provider: entry.provider(),
                rank: entry.rank(),
                sequence_id: entry.sequence_id(),
                enabled: entry.is_enabled(),
                warm: entry.is_warm(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.plugins).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.plugins).is_empty()
    }

    /// Entries sorted by label, copied out of the table.
    fn snapshot(&self) -> Vec<Arc<PluginEntry>> {
        let mut entries: Vec<Arc<PluginEntry>> = lock(&self.plugins).values().cloned().collect();
        entries.sort_by(|a, b| a.label().cmp(b.label()));
        entries
    }
}

impl Drop for PluginRegistry {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("labels", &self.labels())
            .field("open", &self.is_open())
            .finish()
    }
}

fn subscription_error(filter: &str, error: WebdeckError) -> WebdeckError {
    match error {
        WebdeckError::Subscription { .. } => error,
        other => WebdeckError::Subscription {
            filter: filter.to_string(),
            message: other.to_string(),
        },
    }
}

/// Forwards directory events to a registry without keeping it alive.
struct RegistryListener {
    registry: Weak<PluginRegistry>,
}

impl DirectoryListener for RegistryListener {
    fn service_changed(&self, event: DirectoryEvent) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match event {
            DirectoryEvent::Registered(reference) => registry.add_service(reference),
            DirectoryEvent::Unregistering(reference) => registry.remove_service(&reference),
            DirectoryEvent::Modified(_) => {}
        }
    }
}
