// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits for the Webdeck plugin console.
//!
//! Console components implement [`ConsolePlugin`] (optionally [`Activatable`]);
//! bare request handlers implement [`RequestHandler`] and are adapted by the
//! registry. The registry talks to the outside world only through
//! [`Directory`], [`Localizer`] and [`ConsoleHost`].

pub mod directory;
pub mod host;
pub mod localizer;
pub mod plugin;

pub use directory::{Directory, DirectoryEvent, DirectoryListener, ServiceObject};
pub use host::ConsoleHost;
pub use localizer::Localizer;
pub use plugin::{Activatable, ConsolePlugin, RequestHandler};
