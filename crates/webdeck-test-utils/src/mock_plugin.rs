// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock console plugin for deterministic testing.
//!
//! `MockPlugin` implements `ConsolePlugin` and `Activatable`, counts every
//! lifecycle call, and records what it was initialized with.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use webdeck_core::{Activatable, ConsoleHost, ConsolePlugin, EntryConfig, WebdeckError};

#[derive(Default)]
struct Counters {
    title: AtomicUsize,
    category: AtomicUsize,
    init: AtomicUsize,
    destroy: AtomicUsize,
    activate: AtomicUsize,
    deactivate: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
struct InitRecord {
    name: String,
    context: String,
    parameters: BTreeMap<String, String>,
}

/// A console plugin with configurable metadata and failure knobs.
pub struct MockPlugin {
    label: String,
    title: String,
    category: Option<String>,
    activatable: bool,
    fail_init: bool,
    fail_activation: bool,
    panic_on_title: bool,
    counters: Counters,
    last_init: Mutex<Option<InitRecord>>,
}

impl MockPlugin {
    pub fn new(label: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            category: None,
            activatable: false,
            fail_init: false,
            fail_activation: false,
            panic_on_title: false,
            counters: Counters::default(),
            last_init: Mutex::new(None),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Exposes the `Activatable` capability.
    pub fn activatable(mut self) -> Self {
        self.activatable = true;
        self
    }

    /// `init` returns an error.
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Activatable, and `activate` returns an error.
    pub fn failing_activation(mut self) -> Self {
        self.activatable = true;
        self.fail_activation = true;
        self
    }

    /// `title` panics.
    pub fn panicking_title(mut self) -> Self {
        self.panic_on_title = true;
        self
    }

    pub fn title_calls(&self) -> usize {
        self.counters.title.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> usize {
        self.counters.category.load(Ordering::SeqCst)
    }

    pub fn init_calls(&self) -> usize {
        self.counters.init.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.counters.destroy.load(Ordering::SeqCst)
    }

    pub fn activate_calls(&self) -> usize {
        self.counters.activate.load(Ordering::SeqCst)
    }

    pub fn deactivate_calls(&self) -> usize {
        self.counters.deactivate.load(Ordering::SeqCst)
    }

    /// Plugin name passed to the last `init`.
    pub fn last_init_name(&self) -> Option<String> {
        self.record().map(|r| r.name)
    }

    /// Execution context name passed to the last `init`.
    pub fn last_init_context(&self) -> Option<String> {
        self.record().map(|r| r.context)
    }

    /// Init parameter seen by the last `init`.
    pub fn last_init_parameter(&self, name: &str) -> Option<String> {
        self.record().and_then(|r| r.parameters.get(name).cloned())
    }

    fn record(&self) -> Option<InitRecord> {
        self.last_init.lock().unwrap().clone()
    }
}

impl ConsolePlugin for MockPlugin {
    fn label(&self) -> &str {
        &self.label
    }

    fn title(&self) -> String {
        self.counters.title.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_title {
            panic!("mock plugin `{}` refuses to tell its title", self.label);
        }
        self.title.clone()
    }

    fn category(&self) -> Option<String> {
        self.counters.category.fetch_add(1, Ordering::SeqCst);
        self.category.clone()
    }

    fn init(&self, config: &EntryConfig<'_>) -> Result<(), WebdeckError> {
        self.counters.init.fetch_add(1, Ordering::SeqCst);
        let parameters = config
            .init_parameter_names()
            .into_iter()
            .filter_map(|name| Some((name.clone(), config.init_parameter(&name)?)))
            .collect();
        *self.last_init.lock().unwrap() = Some(InitRecord {
            name: config.name.to_string(),
            context: config.context.name.clone(),
            parameters,
        });
        if self.fail_init {
            return Err(WebdeckError::Init {
                label: self.label.clone(),
                message: "mock init failure".to_string(),
            });
        }
        Ok(())
    }

    fn destroy(&self) {
        self.counters.destroy.fetch_add(1, Ordering::SeqCst);
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        if self.activatable { Some(self) } else { None }
    }
}

impl Activatable for MockPlugin {
    fn activate(&self, _host: &dyn ConsoleHost) -> Result<(), WebdeckError> {
        self.counters.activate.fetch_add(1, Ordering::SeqCst);
        if self.fail_activation {
            return Err(WebdeckError::Internal("mock activation failure".to_string()));
        }
        Ok(())
    }

    fn deactivate(&self) {
        self.counters.deactivate.fetch_add(1, Ordering::SeqCst);
    }
}
