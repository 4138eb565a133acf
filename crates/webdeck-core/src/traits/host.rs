// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The owning application, as seen by directly constructed plugins.

/// The application that owns the registry and constructs direct plugins.
pub trait ConsoleHost: Send + Sync {
    /// Whether the plugin with this factory id is administratively disabled.
    fn is_plugin_disabled(&self, factory_id: &str) -> bool;

    /// Origin name used to localize titles of directly constructed plugins.
    fn origin(&self) -> &str;
}
