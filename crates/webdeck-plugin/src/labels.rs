// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The localized label map used to render console navigation.
//!
//! The map nests titles under their category path. Each path segment
//! becomes a key prefixed with [`CATEGORY_PREFIX`]; labels are the leaves.
//! A flat label-to-title view is kept under [`LABEL_MAP_KEY`].
//!
//! ```text
//! {
//!   "category.sys": { "category.info": { "a": "Info" } },
//!   "category.misc": { "b": "Plain" },
//!   "webdeck.labelMap": { "a": "Info", "b": "Plain" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use webdeck_core::Localizer;

use crate::entry::contain;

/// Key of the flat label-to-title map inside a [`LabelMap`].
pub const LABEL_MAP_KEY: &str = "webdeck.labelMap";

/// Prefix distinguishing category keys from labels.
pub const CATEGORY_PREFIX: &str = "category.";

/// Titles starting with this marker are message keys.
pub const LOCALIZATION_MARKER: char = '%';

/// A node of the label map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LabelNode {
    Title(String),
    Group(BTreeMap<String, LabelNode>),
}

impl LabelNode {
    pub fn as_title(&self) -> Option<&str> {
        match self {
            LabelNode::Title(title) => Some(title),
            LabelNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&BTreeMap<String, LabelNode>> {
        match self {
            LabelNode::Group(group) => Some(group),
            LabelNode::Title(_) => None,
        }
    }

    /// The group under this node, replacing a title that is in the way.
    fn group_mut(&mut self) -> &mut BTreeMap<String, LabelNode> {
        if let LabelNode::Title(_) = self {
            *self = LabelNode::Group(BTreeMap::new());
        }
        match self {
            LabelNode::Group(group) => group,
            LabelNode::Title(_) => unreachable!("title replaced by a group above"),
        }
    }
}

/// Category tree of titles plus the flat view under [`LABEL_MAP_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelMap {
    root: BTreeMap<String, LabelNode>,
}

impl LabelMap {
    pub fn root(&self) -> &BTreeMap<String, LabelNode> {
        &self.root
    }

    pub fn get(&self, key: &str) -> Option<&LabelNode> {
        self.root.get(key)
    }

    /// Label to title, across all categories.
    pub fn flat(&self) -> BTreeMap<&str, &str> {
        self.root
            .get(LABEL_MAP_KEY)
            .and_then(LabelNode::as_group)
            .map(|group| {
                group
                    .iter()
                    .filter_map(|(label, node)| Some((label.as_str(), node.as_title()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The group of a slash-separated category path, e.g. `"sys/info"`.
    pub fn category(&self, path: &str) -> Option<&BTreeMap<String, LabelNode>> {
        let mut group = &self.root;
        for segment in segments(path) {
            group = group
                .get(&format!("{CATEGORY_PREFIX}{segment}"))?
                .as_group()?;
        }
        Some(group)
    }

    /// Whether no label was added.
    pub fn is_empty(&self) -> bool {
        self.flat().is_empty()
    }

    /// Files `title` under `label` in the group of `category` and in the flat view.
    pub(crate) fn insert(&mut self, category: &str, label: &str, title: String) {
        let mut group = &mut self.root;
        for segment in segments(category) {
            group = group
                .entry(format!("{CATEGORY_PREFIX}{segment}"))
                .or_insert_with(|| LabelNode::Group(BTreeMap::new()))
                .group_mut();
        }
        group.insert(label.to_string(), LabelNode::Title(title.clone()));

        self.root
            .entry(LABEL_MAP_KEY.to_string())
            .or_insert_with(|| LabelNode::Group(BTreeMap::new()))
            .group_mut()
            .insert(label.to_string(), LabelNode::Title(title));
    }
}

/// Path segments of a category; trailing empty segments are dropped.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_end_matches('/');
    let only_slashes = trimmed.is_empty() && !path.is_empty();
    (!only_slashes)
        .then(|| trimmed.split('/'))
        .into_iter()
        .flatten()
}

/// Resolves a `%key` title through the localizer; other titles pass through.
///
/// Any localization failure leaves the raw title in place.
pub fn localize(title: String, origin: &str, locale: &str, localizer: &dyn Localizer) -> String {
    let Some(key) = title.strip_prefix(LOCALIZATION_MARKER) else {
        return title;
    };
    match contain("localization", || localizer.messages(origin, locale)) {
        Ok(messages) => match messages.get(key) {
            Some(localized) => localized.clone(),
            None => title,
        },
        Err(e) => {
            debug!(origin, locale, error = %e, "no localized messages, keeping raw title");
            title
        }
    }
}
