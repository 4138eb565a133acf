// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Webdeck integration tests.
//!
//! Provides mock collaborators and a registry harness for fast,
//! deterministic tests without a real service directory.
//!
//! # Components
//!
//! - [`MockPlugin`] - Console plugin that counts lifecycle calls and can be told to fail
//! - [`MockHandler`] - Bare request handler with lifecycle counters
//! - [`MockLocalizer`] - Message tables per origin and locale, optionally failing
//! - [`FailingDirectory`] - Directory whose subscription or enumeration fails
//! - [`TestHarness`] - An opened registry over an in-process directory

pub mod failing_directory;
pub mod harness;
pub mod mock_handler;
pub mod mock_localizer;
pub mod mock_plugin;

pub use failing_directory::{FailingDirectory, FailurePoint};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_handler::MockHandler;
pub use mock_localizer::MockLocalizer;
pub use mock_plugin::MockPlugin;
