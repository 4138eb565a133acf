// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entries whose component the owning application constructs itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use webdeck_core::{ConsoleHost, ConsolePlugin, WebdeckError};

use crate::entry::contain;
use crate::factory::PluginFactory;

/// Source of an entry constructed from a registered [`PluginFactory`].
///
/// Components that are [`Activatable`](webdeck_core::Activatable) are
/// activated after construction and deactivated on release. A disabled or
/// failing plugin is reported once; the report is re-armed by the next
/// successful construction.
pub struct DirectEntry {
    factory_id: String,
    factory: Option<Arc<dyn PluginFactory>>,
    report_armed: AtomicBool,
}

impl DirectEntry {
    /// `factory` is `None` when no factory is registered under `factory_id`;
    /// the entry then never resolves.
    pub fn new(factory_id: impl Into<String>, factory: Option<Arc<dyn PluginFactory>>) -> Self {
        Self {
            factory_id: factory_id.into(),
            factory,
            report_armed: AtomicBool::new(true),
        }
    }

    pub fn factory_id(&self) -> &str {
        &self.factory_id
    }

    pub(crate) fn is_enabled(&self, host: &dyn ConsoleHost) -> bool {
        !host.is_plugin_disabled(&self.factory_id)
    }

    pub(crate) fn acquire(&self, host: &dyn ConsoleHost) -> Option<Arc<dyn ConsolePlugin>> {
        if !self.is_enabled(host) {
            if self.report_armed.swap(false, Ordering::AcqRel) {
                info!(plugin = %self.factory_id, "ignoring plugin: disabled by configuration");
            }
            return None;
        }

        match self.instantiate(host) {
            Ok(component) => {
                self.report_armed.store(true, Ordering::Release);
                Some(component)
            }
            Err(e) => {
                if self.report_armed.swap(false, Ordering::AcqRel) {
                    warn!(plugin = %self.factory_id, error = %e, "failed to instantiate plugin");
                }
                None
            }
        }
    }

    fn instantiate(&self, host: &dyn ConsoleHost) -> Result<Arc<dyn ConsolePlugin>, WebdeckError> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| WebdeckError::FactoryNotFound {
                id: self.factory_id.clone(),
            })?;

        let component = contain("construction", || factory.create())
            .map_err(|e| WebdeckError::instantiation(&self.factory_id, e))?;

        if let Some(activatable) = component.as_activatable() {
            contain("activation", || activatable.activate(host))
                .map_err(|e| WebdeckError::activation(&self.factory_id, e))?;
        }
        Ok(component)
    }

    pub(crate) fn release(&self, component: &Arc<dyn ConsolePlugin>) {
        let Some(activatable) = component.as_activatable() else {
            return;
        };
        let deactivated = contain("deactivation", || {
            activatable.deactivate();
            Ok(())
        });
        if let Err(e) = deactivated {
            warn!(plugin = %self.factory_id, error = %e, "plugin failed to deactivate");
        }
    }
}

impl std::fmt::Debug for DirectEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectEntry")
            .field("factory_id", &self.factory_id)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tracing_test::traced_test;
    use webdeck_test_utils::MockPlugin;

    use crate::host::ConfiguredHost;

    fn entry_for(plugin: Arc<MockPlugin>) -> DirectEntry {
        let factory = move || Ok::<_, WebdeckError>(plugin.clone() as Arc<dyn ConsolePlugin>);
        DirectEntry::new("status", Some(Arc::new(factory)))
    }

    #[test]
    fn activates_after_construction_and_deactivates_on_release() {
        let plugin = Arc::new(MockPlugin::new("status", "Status").activatable());
        let entry = entry_for(plugin.clone());
        let host = ConfiguredHost::new("webdeck", Vec::<String>::new());

        let component = entry.acquire(&host).expect("constructed");
        assert_eq!(plugin.activate_calls(), 1);

        entry.release(&component);
        assert_eq!(plugin.deactivate_calls(), 1);
    }

    #[test]
    fn activation_failure_discards_the_component() {
        let plugin = Arc::new(MockPlugin::new("status", "Status").failing_activation());
        let entry = entry_for(plugin.clone());
        let host = ConfiguredHost::new("webdeck", Vec::<String>::new());

        assert!(entry.acquire(&host).is_none());
        assert_eq!(plugin.activate_calls(), 1);
    }

    #[test]
    fn missing_factory_never_resolves() {
        let entry = DirectEntry::new("ghost", None);
        let host = ConfiguredHost::new("webdeck", Vec::<String>::new());
        assert!(entry.acquire(&host).is_none());
        let err = entry.instantiate(&host).err().expect("no factory");
        assert!(matches!(err, WebdeckError::FactoryNotFound { id } if id == "ghost"));
    }

    #[test]
    fn panicking_factory_is_contained() {
        let factory = || -> Result<Arc<dyn ConsolePlugin>, WebdeckError> { panic!("kaboom") };
        let entry = DirectEntry::new("bomb", Some(Arc::new(factory)));
        let host = ConfiguredHost::new("webdeck", Vec::<String>::new());

        let err = entry.instantiate(&host).err().expect("panic becomes error");
        assert!(err.to_string().contains("kaboom"), "got: {err}");
    }

    #[test]
    #[traced_test]
    fn disabled_plugin_is_reported_once_per_transition() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();
        let factory = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, WebdeckError>(Arc::new(MockPlugin::new("status", "Status")) as Arc<dyn ConsolePlugin>)
        };
        let entry = DirectEntry::new("status", Some(Arc::new(factory)));
        let host = ConfiguredHost::new("webdeck", ["status"]);

        assert!(entry.acquire(&host).is_none());
        assert!(entry.acquire(&host).is_none());
        assert_eq!(created.load(Ordering::SeqCst), 0);
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("disabled by configuration")).count() {
                1 => Ok(()),
                n => Err(format!("expected one report, got {n}")),
            }
        });

        host.set_disabled_plugins(Vec::<String>::new());
        assert!(entry.acquire(&host).is_some());

        host.set_disabled_plugins(["status"]);
        assert!(entry.acquire(&host).is_none());
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("disabled by configuration")).count() {
                2 => Ok(()),
                n => Err(format!("expected two reports, got {n}")),
            }
        });
    }

    #[test]
    #[traced_test]
    fn failing_factory_is_reported_once() {
        let factory = || Err::<Arc<dyn ConsolePlugin>, _>(WebdeckError::Internal("broken".into()));
        let entry = DirectEntry::new("broken", Some(Arc::new(factory)));
        let host = ConfiguredHost::new("webdeck", Vec::<String>::new());

        for _ in 0..3 {
            assert!(entry.acquire(&host).is_none());
        }
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("failed to instantiate plugin")).count() {
                1 => Ok(()),
                n => Err(format!("expected one warning, got {n}")),
            }
        });
    }
}
