// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message lookup for localized plugin titles.

use std::sync::Arc;

use crate::error::WebdeckError;
use crate::types::MessageTable;

/// Supplies per-origin, per-locale message tables.
pub trait Localizer: Send + Sync {
    /// Returns the message table of `origin` for `locale`.
    ///
    /// Failure means "no localization available"; callers fall back to the raw text.
    fn messages(&self, origin: &str, locale: &str) -> Result<Arc<MessageTable>, WebdeckError>;
}
