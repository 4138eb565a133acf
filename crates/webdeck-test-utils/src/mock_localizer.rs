// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock localizer with in-memory message tables.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use webdeck_core::{Localizer, MessageTable, WebdeckError};

/// Message tables keyed by `(origin, locale)`.
///
/// Unknown pairs yield an empty table; origins marked with
/// [`MockLocalizer::failing_for`] yield an error.
#[derive(Default)]
pub struct MockLocalizer {
    tables: HashMap<(String, String), Arc<MessageTable>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MockLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds messages for `origin` in `locale`.
    pub fn with_messages<I, K, V>(mut self, origin: &str, locale: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self
            .tables
            .entry((origin.to_string(), locale.to_string()))
            .or_default();
        Arc::make_mut(table).extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Every lookup for `origin` fails.
    pub fn failing_for(mut self, origin: &str) -> Self {
        self.failing.insert(origin.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Localizer for MockLocalizer {
    fn messages(&self, origin: &str, locale: &str) -> Result<Arc<MessageTable>, WebdeckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(origin) {
            return Err(WebdeckError::Localization {
                origin: origin.to_string(),
                locale: locale.to_string(),
                message: "mock localizer failure".to_string(),
            });
        }
        Ok(self
            .tables
            .get(&(origin.to_string(), locale.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
