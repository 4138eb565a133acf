// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`ConsoleHost`] driven by configuration.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use webdeck_config::model::ConsoleConfig;
use webdeck_core::ConsoleHost;

/// Owning-application view backed by the `[console]` configuration section.
///
/// The disabled set can be swapped at runtime; readers never block.
pub struct ConfiguredHost {
    origin: String,
    disabled: ArcSwap<HashSet<String>>,
}

impl ConfiguredHost {
    pub fn new<I, S>(origin: impl Into<String>, disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origin: origin.into(),
            disabled: ArcSwap::from_pointee(disabled.into_iter().map(Into::into).collect()),
        }
    }

    /// Host for the built-in plugins of the `webdeck` origin.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new("webdeck", config.disabled_plugins.iter().cloned())
    }

    /// Replaces the set of disabled factory ids.
    pub fn set_disabled_plugins<I, S>(&self, disabled: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled
            .store(Arc::new(disabled.into_iter().map(Into::into).collect()));
    }

    /// Disabled factory ids, sorted.
    pub fn disabled_plugins(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.disabled.load().iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl ConsoleHost for ConfiguredHost {
    fn is_plugin_disabled(&self, factory_id: &str) -> bool {
        self.disabled.load().contains(factory_id)
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}
