// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message tables for localized plugin titles.
//!
//! Built-in English titles cover the `webdeck` origin. `[i18n.<locale>]`
//! tables from the configuration apply to every origin and override the
//! built-ins. A locale such as `de-AT` falls back to `de`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use webdeck_core::{Localizer, MessageTable, WebdeckError};

/// Origin of the built-in plugins.
pub const BUILTIN_ORIGIN: &str = "webdeck";

const BUILTIN_EN: &[(&str, &str)] = &[
    ("status.title", "Status"),
    ("configuration.title", "Configuration"),
    ("licenses.title", "Licenses"),
];

/// [`Localizer`] backed by configuration tables.
pub struct ConfigLocalizer {
    tables: HashMap<String, Arc<MessageTable>>,
    builtin: HashMap<String, Arc<MessageTable>>,
}

impl ConfigLocalizer {
    pub fn new(i18n: &BTreeMap<String, BTreeMap<String, String>>) -> Self {
        let tables = i18n
            .iter()
            .map(|(locale, messages)| {
                let table: MessageTable = messages.clone().into_iter().collect();
                (locale.to_ascii_lowercase(), Arc::new(table))
            })
            .collect();
        let english: MessageTable = BUILTIN_EN
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            tables,
            builtin: HashMap::from([("en".to_string(), Arc::new(english))]),
        }
    }

    fn lookup<'a>(
        tables: &'a HashMap<String, Arc<MessageTable>>,
        locale: &str,
    ) -> Option<&'a Arc<MessageTable>> {
        let locale = locale.to_ascii_lowercase();
        tables.get(&locale).or_else(|| {
            let language = locale.split(['-', '_']).next()?;
            tables.get(language)
        })
    }
}

impl Localizer for ConfigLocalizer {
    fn messages(&self, origin: &str, locale: &str) -> Result<Arc<MessageTable>, WebdeckError> {
        let configured = Self::lookup(&self.tables, locale);
        let builtin = if origin == BUILTIN_ORIGIN {
            Self::lookup(&self.builtin, locale)
        } else {
            None
        };

        match (builtin, configured) {
            (Some(builtin), Some(configured)) => {
                let mut merged = MessageTable::clone(builtin);
                merged.extend(configured.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(Arc::new(merged))
            }
            (Some(table), None) | (None, Some(table)) => Ok(Arc::clone(table)),
            (None, None) => Err(WebdeckError::Localization {
                origin: origin.to_string(),
                locale: locale.to_string(),
                message: "no message table".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(locale: &str, pairs: &[(&str, &str)]) -> BTreeMap<String, BTreeMap<String, String>> {
        BTreeMap::from([(
            locale.to_string(),
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )])
    }

    #[test]
    fn builtin_titles_cover_english() {
        let localizer = ConfigLocalizer::new(&BTreeMap::new());
        let table = localizer.messages(BUILTIN_ORIGIN, "en").unwrap();
        assert_eq!(table["status.title"], "Status");
        assert!(localizer.messages("other", "en").is_err());
    }

    #[test]
    fn configured_tables_override_builtins() {
        let localizer = ConfigLocalizer::new(&config("en", &[("status.title", "Health")]));
        let table = localizer.messages(BUILTIN_ORIGIN, "en").unwrap();
        assert_eq!(table["status.title"], "Health");
        assert_eq!(table["licenses.title"], "Licenses");
    }

    #[test]
    fn regional_locale_falls_back_to_language() {
        let localizer = ConfigLocalizer::new(&config("de", &[("status.title", "Zustand")]));
        let table = localizer.messages("anything", "de-AT").unwrap();
        assert_eq!(table["status.title"], "Zustand");
        assert!(localizer.messages("anything", "fr").is_err());
    }
}
