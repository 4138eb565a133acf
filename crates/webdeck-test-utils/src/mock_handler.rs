// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock request handler, published to the directory without console metadata.

use std::sync::atomic::{AtomicUsize, Ordering};

use webdeck_core::{EntryConfig, RequestHandler, WebdeckError};

/// A [`RequestHandler`] that counts its lifecycle calls.
#[derive(Default)]
pub struct MockHandler {
    init: AtomicUsize,
    destroy: AtomicUsize,
}

impl MockHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init_calls(&self) -> usize {
        self.init.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroy.load(Ordering::SeqCst)
    }
}

impl RequestHandler for MockHandler {
    fn init(&self, _config: &EntryConfig<'_>) -> Result<(), WebdeckError> {
        self.init.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn destroy(&self) {
        self.destroy.fetch_add(1, Ordering::SeqCst);
    }

    fn info(&self) -> Option<String> {
        Some("mock handler".to_string())
    }
}
