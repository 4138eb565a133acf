// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry for the Webdeck console.
//!
//! The registry maps labels to console components that are resolved lazily:
//! either services announced by a [`Directory`](webdeck_core::Directory) or
//! plugins the application constructs from its [`PluginFactories`]. It
//! resolves label conflicts by ranking, builds the localized navigation map,
//! and propagates the execution context to every warm component.

pub mod adapter;
pub mod direct_entry;
pub mod directory_entry;
pub mod entry;
pub mod factory;
pub mod host;
pub mod labels;
pub mod local_directory;
pub mod registry;

pub use adapter::HandlerAdapter;
pub use direct_entry::DirectEntry;
pub use directory_entry::DirectoryEntry;
pub use entry::{EntrySource, PluginEntry};
pub use factory::{PluginFactories, PluginFactory};
pub use host::ConfiguredHost;
pub use labels::{
    localize, LabelMap, LabelNode, CATEGORY_PREFIX, LABEL_MAP_KEY, LOCALIZATION_MARKER,
};
pub use local_directory::{capability_filter, LocalDirectory};
pub use registry::{PluginInfo, PluginRegistry};
