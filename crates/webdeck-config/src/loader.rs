// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./webdeck.toml` > `~/.config/webdeck/webdeck.toml` > `/etc/webdeck/webdeck.toml`
//! with environment variable overrides via `WEBDECK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WebdeckConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/webdeck/webdeck.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "webdeck.toml";

/// Per-user configuration file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("webdeck").join("webdeck.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/webdeck/webdeck.toml` (system-wide)
/// 3. `~/.config/webdeck/webdeck.toml` (user XDG config)
/// 4. `./webdeck.toml` (local directory)
/// 5. `WEBDECK_*` environment variables
pub fn load_config() -> Result<WebdeckConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<WebdeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WebdeckConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WebdeckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WebdeckConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the XDG hierarchy, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WebdeckConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `WEBDECK_CONSOLE_LOG_LEVEL` to `console.log_level`.
///
/// Only the section prefix is turned into a dot; keys keep their underscores.
/// The map sees the key in its original case, so it is lowercased first.
fn env_provider() -> Env {
    Env::prefixed("WEBDECK_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        key_str
            .replacen("console_", "console.", 1)
            .replacen("directory_", "directory.", 1)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use serial_test::serial;

    #[test]
    #[serial]
    fn upper_case_env_keys_reach_their_section() {
        Jail::expect_with(|jail| {
            jail.set_env("WEBDECK_CONSOLE_DEFAULT_CATEGORY", "FromEnv");
            jail.set_env("WEBDECK_CONSOLE_LOG_LEVEL", "debug");

            let config: WebdeckConfig = Figment::new()
                .merge(Serialized::defaults(WebdeckConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.console.default_category, "FromEnv");
            assert_eq!(config.console.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    #[serial]
    fn explicit_path_keeps_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file("deck.toml", "[console]\nlocale = \"fr\"\n")?;
            jail.set_env("WEBDECK_CONSOLE_LOCALE", "de");

            let config = load_config_from_path(Path::new("deck.toml"))?;
            assert_eq!(config.console.locale, "de");
            Ok(())
        });
    }
}
