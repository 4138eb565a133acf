// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Each command writes to the given writer so the output can be checked in
//! tests. `--json` output is meant for scripting; the text forms are not stable.

use std::io::Write;

use serde::Serialize;
use webdeck_core::WebdeckError;
use webdeck_plugin::{localize, PluginInfo};

use crate::console::Console;
use crate::i18n::BUILTIN_ORIGIN;

/// Result of `webdeck lookup`.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub label: String,
    pub title: String,
    pub category: Option<String>,
}

fn io_error(e: std::io::Error) -> WebdeckError {
    WebdeckError::Internal(format!("failed to write output: {e}"))
}

fn json_error(e: serde_json::Error) -> WebdeckError {
    WebdeckError::Internal(format!("failed to serialize output: {e}"))
}

/// `webdeck labels`: prints the localized label map as JSON.
pub fn run_labels(
    console: &Console,
    locale: Option<&str>,
    default_category: Option<&str>,
    out: &mut impl Write,
) -> Result<(), WebdeckError> {
    let map = console.label_map(locale, default_category);
    let rendered = serde_json::to_string_pretty(&map).map_err(json_error)?;
    writeln!(out, "{rendered}").map_err(io_error)
}

/// `webdeck plugins`: lists every registry entry.
pub fn run_plugins(
    console: &Console,
    json: bool,
    use_color: bool,
    out: &mut impl Write,
) -> Result<(), WebdeckError> {
    let plugins = console.registry().describe();
    if json {
        let rendered = serde_json::to_string_pretty(&plugins).map_err(json_error)?;
        return writeln!(out, "{rendered}").map_err(io_error);
    }

    let locale = &console.config().console.locale;
    writeln!(out).map_err(io_error)?;
    writeln!(out, "  webdeck plugins").map_err(io_error)?;
    writeln!(out, "  {}", "-".repeat(35)).map_err(io_error)?;
    if plugins.is_empty() {
        writeln!(out, "    (none)").map_err(io_error)?;
    }
    for info in &plugins {
        let origin = console
            .registry()
            .entry(&info.label)
            .map(|entry| entry.origin())
            .unwrap_or_else(|| BUILTIN_ORIGIN.to_string());
        let title = localize(info.title.clone(), &origin, locale, console.localizer());
        writeln!(out, "    {}", plugin_line(info, &title, use_color)).map_err(io_error)?;
    }
    writeln!(out).map_err(io_error)
}

fn plugin_line(info: &PluginInfo, title: &str, use_color: bool) -> String {
    let state = match (info.enabled, use_color) {
        (true, true) => {
            use colored::Colorize;
            "enabled".green().to_string()
        }
        (false, true) => {
            use colored::Colorize;
            "disabled".red().to_string()
        }
        (true, false) => "[enabled]".to_string(),
        (false, false) => "[disabled]".to_string(),
    };
    format!(
        "{:<16} {:<20} {:<9} rank {:<4} {} {}",
        info.label,
        title,
        info.source,
        info.rank,
        info.provider,
        state
    )
}

/// `webdeck lookup`: resolves one label, or the default plugin when none is given.
///
/// Returns `false` when nothing resolves.
pub fn run_lookup(
    console: &Console,
    label: Option<&str>,
    out: &mut impl Write,
) -> Result<bool, WebdeckError> {
    let registry = console.registry();
    let plugin = match label {
        Some(label) => registry.lookup(label),
        None => registry.lookup_default(),
    };
    let Some(plugin) = plugin else {
        return Ok(false);
    };

    let label = plugin.label().to_string();
    let (raw_title, origin) = match registry.entry(&label) {
        Some(entry) => (entry.title(), entry.origin()),
        None => (plugin.title(), BUILTIN_ORIGIN.to_string()),
    };
    let response = LookupResponse {
        title: localize(
            raw_title,
            &origin,
            &console.config().console.locale,
            console.localizer(),
        ),
        category: plugin.category(),
        label,
    };
    let rendered = serde_json::to_string_pretty(&response).map_err(json_error)?;
    writeln!(out, "{rendered}").map_err(io_error)?;
    Ok(true)
}

/// `webdeck config`: prints the effective configuration as TOML.
pub fn run_config(console: &Console, out: &mut impl Write) -> Result<(), WebdeckError> {
    let rendered = toml::to_string_pretty(console.config())
        .map_err(|e| WebdeckError::Config(format!("failed to render configuration: {e}")))?;
    write!(out, "{rendered}").map_err(io_error)
}
