// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console assembly behind the `webdeck` binary.
//!
//! [`console::Console`] wires the plugin registry to an in-process directory,
//! the built-in plugins and handlers, and the configured message tables.

pub mod builtin;
pub mod commands;
pub mod console;
pub mod i18n;
