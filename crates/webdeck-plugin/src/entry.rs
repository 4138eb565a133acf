// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry entries: one label and the lazily resolved component behind it.
//!
//! A [`PluginEntry`] owns everything common to both entry shapes: the label,
//! the comparison key used for conflict resolution, the title and category
//! caches, and the warm-component slot. Where the component comes from is
//! decided by its [`EntrySource`].

use std::any::Any;
use std::cmp::Ordering;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;
use tracing::{debug, warn};
use webdeck_core::{
    props, ConsoleHost, ConsolePlugin, Directory, EntryConfig, ExecutionContext, ServiceReference,
    SourceKind, WebdeckError,
};

use crate::direct_entry::DirectEntry;
use crate::directory_entry::DirectoryEntry;

/// State shared between a registry and every entry it creates.
pub(crate) struct Shared {
    pub(crate) directory: Arc<dyn Directory>,
    pub(crate) host: Arc<dyn ConsoleHost>,
    pub(crate) context: ArcSwapOption<ExecutionContext>,
}

/// Locks a mutex, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate leaves its data consistent, so a
/// poisoned lock carries no torn state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs plugin code, turning a panic into [`WebdeckError::Panicked`].
pub(crate) fn contain<T>(
    context: &str,
    f: impl FnOnce() -> Result<T, WebdeckError>,
) -> Result<T, WebdeckError> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(WebdeckError::Panicked {
            context: context.to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Identity of a component instance, ignoring vtables.
pub(crate) fn same_component(a: &Arc<dyn ConsolePlugin>, b: &Arc<dyn ConsolePlugin>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Memoized metadata with a reentrancy guard.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cached<T> {
    Uncached,
    /// Resolution is in flight; reentrant readers get the fallback.
    Provisional,
    Resolved(T),
}

/// Outcome of claiming a cache slot.
enum Claim<T> {
    Hit(T),
    InFlight,
    Claimed,
}

fn claim<T: Clone>(cache: &Mutex<Cached<T>>) -> Claim<T> {
    let mut cache = lock(cache);
    match &*cache {
        Cached::Resolved(value) => Claim::Hit(value.clone()),
        Cached::Provisional => Claim::InFlight,
        Cached::Uncached => {
            *cache = Cached::Provisional;
            Claim::Claimed
        }
    }
}

struct Warm {
    component: Arc<dyn ConsolePlugin>,
    /// Context the component was last initialized against.
    bound: Option<Arc<ExecutionContext>>,
}

#[derive(Default)]
struct Slot {
    warm: Option<Warm>,
    /// The last resolution attempt produced nothing.
    failed: bool,
    /// Released for good; the entry never goes warm again.
    disposed: bool,
}

/// Where an entry's component comes from. Exactly one of two shapes.
pub enum EntrySource {
    /// Looked up from the service directory on demand.
    Directory(DirectoryEntry),
    /// Constructed by the owning application from a factory.
    Direct(DirectEntry),
}

impl EntrySource {
    fn kind(&self) -> SourceKind {
        match self {
            EntrySource::Directory(_) => SourceKind::Directory,
            EntrySource::Direct(_) => SourceKind::Direct,
        }
    }

    fn acquire(&self, label: &str, shared: &Shared) -> Option<Arc<dyn ConsolePlugin>> {
        match self {
            EntrySource::Directory(d) => d.acquire(label, shared.directory.as_ref()),
            EntrySource::Direct(d) => d.acquire(shared.host.as_ref()),
        }
    }

    fn release(&self, component: &Arc<dyn ConsolePlugin>, shared: &Shared) {
        match self {
            EntrySource::Directory(d) => d.release(shared.directory.as_ref()),
            EntrySource::Direct(d) => d.release(component),
        }
    }

    fn reference(&self) -> Option<&ServiceReference> {
        match self {
            EntrySource::Directory(d) => Some(d.reference()),
            EntrySource::Direct(_) => None,
        }
    }

    fn property(&self, key: &str) -> Option<&str> {
        self.reference()
            .and_then(|r| r.string_property(key))
            .filter(|value| !value.is_empty())
    }
}

/// One registered label and the lazily resolved component behind it.
///
/// An entry is *cold* until its component is first resolved, then *warm*
/// until it is disposed. Title and category are memoized on first access.
pub struct PluginEntry {
    label: String,
    rank: i32,
    sequence_id: u64,
    source: EntrySource,
    shared: Arc<Shared>,
    title: Mutex<Cached<String>>,
    category: Mutex<Cached<String>>,
    slot: Mutex<Slot>,
}

impl PluginEntry {
    pub(crate) fn new(label: String, source: EntrySource, shared: Arc<Shared>) -> Self {
        let (rank, sequence_id) = match &source {
            EntrySource::Directory(d) => (d.reference().ranking(), d.reference().id()),
            EntrySource::Direct(_) => (0, 0),
        };
        Self {
            label,
            rank,
            sequence_id,
            source,
            shared,
            title: Mutex::new(Cached::Uncached),
            category: Mutex::new(Cached::Uncached),
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Tie-break priority; 0 for direct entries.
    pub fn rank(&self) -> i32 {
        self.rank
    }

    /// Directory registration id; 0 for direct entries.
    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    pub fn source(&self) -> &EntrySource {
        &self.source
    }

    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Whether the component is currently resolved and cached.
    pub fn is_warm(&self) -> bool {
        lock(&self.slot).warm.is_some()
    }

    /// Whether the last attempt to resolve the component produced nothing.
    pub fn is_broken(&self) -> bool {
        lock(&self.slot).failed
    }

    pub fn is_enabled(&self) -> bool {
        match &self.source {
            EntrySource::Directory(_) => true,
            EntrySource::Direct(d) => d.is_enabled(self.shared.host.as_ref()),
        }
    }

    /// Name of whoever provides this entry, without resolving the component.
    pub fn provider(&self) -> String {
        match &self.source {
            EntrySource::Directory(d) => d.provider(),
            EntrySource::Direct(d) => d.factory_id().to_string(),
        }
    }

    /// Module name used to look up localized messages.
    pub fn origin(&self) -> String {
        match &self.source {
            EntrySource::Directory(d) => d.reference().origin().to_string(),
            EntrySource::Direct(_) => self.shared.host.origin().to_string(),
        }
    }

    /// Conflict ordering of `self` (the newcomer) against `existing`.
    ///
    /// `Equal`: same registration, keep `existing`. `Less`: keep `existing`.
    /// `Greater`: replace `existing`. Higher rank wins; on equal rank the
    /// lower sequence id wins.
    pub fn compare_rank(&self, existing: &PluginEntry) -> Ordering {
        if self.sequence_id == existing.sequence_id {
            return Ordering::Equal;
        }
        match self.rank.cmp(&existing.rank) {
            Ordering::Equal if self.sequence_id < existing.sequence_id => Ordering::Greater,
            Ordering::Equal => Ordering::Less,
            decided => decided,
        }
    }

    /// Display title; resolved once, then cached.
    ///
    /// Returns the label while resolution is in flight, so a component that
    /// asks for its own title while being resolved does not recurse.
    pub fn title(&self) -> String {
        match claim(&self.title) {
            Claim::Hit(title) => title,
            Claim::InFlight => self.label.clone(),
            Claim::Claimed => {
                let title = self
                    .resolve_title()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| self.label.clone());
                *lock(&self.title) = Cached::Resolved(title.clone());
                title
            }
        }
    }

    /// Category path; cached once resolved, retried while unresolved.
    pub fn category(&self) -> Option<String> {
        match claim(&self.category) {
            Claim::Hit(category) => Some(category),
            Claim::InFlight => None,
            Claim::Claimed => {
                let category = self.resolve_category().filter(|c| !c.is_empty());
                *lock(&self.category) = match &category {
                    Some(c) => Cached::Resolved(c.clone()),
                    None => Cached::Uncached,
                };
                category
            }
        }
    }

    fn resolve_title(&self) -> Option<String> {
        if let Some(title) = self.source.property(props::TITLE) {
            return Some(title.to_string());
        }
        let component = self.component()?;
        contain("title", || Ok(component.title()))
            .inspect_err(|e| debug!(label = %self.label, error = %e, "title lookup failed"))
            .ok()
    }

    fn resolve_category(&self) -> Option<String> {
        if let Some(category) = self.source.property(props::CATEGORY) {
            return Some(category.to_string());
        }
        let component = self.component()?;
        contain("category", || Ok(component.category()))
            .inspect_err(|e| debug!(label = %self.label, error = %e, "category lookup failed"))
            .ok()
            .flatten()
    }

    /// The resolved component, initialized against the current execution
    /// context if one is attached.
    ///
    /// `None` when the component cannot be resolved. An initialization
    /// failure is logged and the component is still returned.
    pub fn component(&self) -> Option<Arc<dyn ConsolePlugin>> {
        let component = self.resolve_component()?;
        let Some(context) = self.shared.context.load_full() else {
            return Some(component);
        };
        if self.claim_binding(&component, &context) {
            if let Err(e) = self.init_component(&component, &context) {
                warn!(label = %self.label, error = %e, "plugin failed to initialize");
            }
        }
        Some(component)
    }

    fn resolve_component(&self) -> Option<Arc<dyn ConsolePlugin>> {
        {
            let slot = lock(&self.slot);
            if slot.disposed {
                return None;
            }
            if let Some(warm) = &slot.warm {
                return Some(Arc::clone(&warm.component));
            }
        }

        let Some(fresh) = self.source.acquire(&self.label, &self.shared) else {
            lock(&self.slot).failed = true;
            return None;
        };

        let mut slot = lock(&self.slot);
        if slot.disposed {
            drop(slot);
            self.source.release(&fresh, &self.shared);
            return None;
        }
        if let Some(warm) = &slot.warm {
            // Lost a race with a concurrent first resolution.
            let winner = Arc::clone(&warm.component);
            drop(slot);
            debug!(label = %self.label, "discarding concurrently resolved duplicate");
            self.source.release(&fresh, &self.shared);
            return Some(winner);
        }
        slot.failed = false;
        slot.warm = Some(Warm {
            component: Arc::clone(&fresh),
            bound: None,
        });
        Some(fresh)
    }

    /// Records `context` as the binding of `component`; false if it already is.
    fn claim_binding(
        &self,
        component: &Arc<dyn ConsolePlugin>,
        context: &Arc<ExecutionContext>,
    ) -> bool {
        let mut slot = lock(&self.slot);
        match slot.warm.as_mut() {
            Some(warm) if same_component(&warm.component, component) => {
                if warm.bound.as_ref().is_some_and(|b| Arc::ptr_eq(b, context)) {
                    false
                } else {
                    warm.bound = Some(Arc::clone(context));
                    true
                }
            }
            _ => false,
        }
    }

    fn init_component(
        &self,
        component: &Arc<dyn ConsolePlugin>,
        context: &ExecutionContext,
    ) -> Result<(), WebdeckError> {
        let name = self.title();
        let config = EntryConfig {
            name: &name,
            context,
            reference: self.source.reference(),
        };
        contain("init", || component.init(&config)).map_err(|e| match e {
            WebdeckError::Init { .. } | WebdeckError::Panicked { .. } => e,
            other => WebdeckError::Init {
                label: self.label.clone(),
                message: other.to_string(),
            },
        })
    }

    /// Binds a warm component to `context`. Cold entries are bound on first
    /// resolution instead.
    pub fn init(&self, context: &Arc<ExecutionContext>) -> Result<(), WebdeckError> {
        let component = match lock(&self.slot).warm.as_ref() {
            Some(warm) => Arc::clone(&warm.component),
            None => return Ok(()),
        };
        if !self.claim_binding(&component, context) {
            return Ok(());
        }
        self.init_component(&component, context)
    }

    /// Unbinds a warm component from the execution context.
    pub fn destroy(&self) -> Result<(), WebdeckError> {
        let component = {
            let mut slot = lock(&self.slot);
            let Some(warm) = slot.warm.as_mut() else {
                return Ok(());
            };
            match warm.bound.take() {
                Some(_) => Arc::clone(&warm.component),
                None => return Ok(()),
            }
        };
        contain("destroy", || {
            component.destroy();
            Ok(())
        })
    }

    /// Releases the warm component, if any. Idempotent; the entry stays cold.
    pub fn dispose(&self) {
        let warm = {
            let mut slot = lock(&self.slot);
            slot.disposed = true;
            slot.warm.take()
        };
        let Some(warm) = warm else {
            return;
        };
        if warm.bound.is_some() {
            let teardown = contain("destroy", || {
                warm.component.destroy();
                Ok(())
            });
            if let Err(e) = teardown {
                warn!(label = %self.label, error = %e, "plugin failed to tear down");
            }
        }
        self.source.release(&warm.component, &self.shared);
        debug!(label = %self.label, "plugin released");
    }

    /// Init parameter from the directory registration; `None` for direct entries.
    pub fn init_parameter(&self, name: &str) -> Option<String> {
        self.source.reference().and_then(|r| r.init_parameter(name))
    }

    /// Names of all init parameters.
    pub fn init_parameter_names(&self) -> Vec<String> {
        self.source
            .reference()
            .map(|r| r.property_keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("label", &self.label)
            .field("kind", &self.kind())
            .field("rank", &self.rank)
            .field("sequence_id", &self.sequence_id)
            .field("warm", &self.is_warm())
            .finish()
    }
}
