// SPDX-FileCopyrightText: 2026 Webdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Webdeck configuration system.

use figment::Jail;
use serial_test::serial;
use webdeck_config::diagnostic::ConfigError;
use webdeck_config::model::{InternalPluginConfig, WebdeckConfig};
use webdeck_config::{load_and_validate_path, load_and_validate_str, load_config, load_config_from_str};

/// Valid TOML with every section deserializes.
#[test]
fn valid_toml_deserializes_into_webdeck_config() {
    let toml = r#"
[console]
default_label = "status"
default_category = "System"
locale = "de"
log_level = "debug"
disabled_plugins = ["licenses"]

[[console.plugins]]
factory = "status"
label = "status"

[[directory.services]]
label = "logs"
handler = "echo"
title = "%logs.title"
category = "System/Diagnostics"
ranking = 5
provider = "log-viewer"

[i18n.de]
"logs.title" = "Protokolle"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.console.default_label.as_deref(), Some("status"));
    assert_eq!(config.console.default_category, "System");
    assert_eq!(config.console.locale, "de");
    assert_eq!(config.console.log_level, "debug");
    assert_eq!(config.console.disabled_plugins, vec!["licenses"]);
    assert_eq!(
        config.console.plugins,
        vec![InternalPluginConfig {
            factory: "status".into(),
            label: "status".into(),
        }]
    );

    let service = &config.directory.services[0];
    assert_eq!(service.label, "logs");
    assert_eq!(service.ranking, Some(5));
    assert_eq!(service.category.as_deref(), Some("System/Diagnostics"));
    assert_eq!(service.origin, "webdeck");
    assert_eq!(config.i18n["de"]["logs.title"], "Protokolle");
}

/// Missing sections use defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert!(config.console.default_label.is_none());
    assert_eq!(config.console.default_category, "Main");
    assert_eq!(config.console.locale, "en");
    assert_eq!(config.console.log_level, "info");
    assert_eq!(config.console.plugins.len(), 3);
    assert!(config.directory.services.is_empty());
    assert!(config.i18n.is_empty());
}

#[test]
fn unknown_field_in_console_is_rejected() {
    let toml = r#"
[console]
lcoale = "de"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("lcoale"),
        "error should mention the unknown key, got: {err_str}"
    );
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[logging]
level = "debug"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn diagnostic_suggests_valid_key() {
    let toml = r#"
[console]
lcoale = "de"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_suggestion = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "lcoale"
                && suggestion.as_deref() == Some("locale")
                && valid_keys.contains("default_category")
        })
    });
    assert!(has_suggestion, "expected an UnknownKey suggestion, got: {errors:?}");
}

#[test]
fn diagnostic_reports_invalid_type() {
    let toml = r#"
[[directory.services]]
label = "logs"
handler = "echo"
ranking = "high"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string ranking");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn diagnostic_reports_missing_key() {
    let toml = r#"
[[console.plugins]]
label = "status"
"#;

    let errors = load_and_validate_str(toml).expect_err("factory is required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key.ends_with("factory"))),
        "got: {errors:?}"
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "lcoale".to_string(),
        suggestion: Some("locale".to_string()),
        valid_keys: "default_label, locale".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("should have help").to_string();
    assert!(help.contains("did you mean `locale`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("lcoale"));
}

#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[console]
log_level = "chatty"
"#;
    let errors = load_and_validate_str(toml).expect_err("bad log level");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
}

#[test]
#[serial]
fn local_file_and_env_are_layered() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "webdeck.toml",
            r#"
[console]
locale = "fr"
default_category = "Local"
"#,
        )?;
        jail.set_env("WEBDECK_CONSOLE_LOCALE", "de");
        jail.set_env("WEBDECK_CONSOLE_DEFAULT_LABEL", "status");

        let config: WebdeckConfig = load_config()?;
        assert_eq!(config.console.locale, "de");
        assert_eq!(config.console.default_category, "Local");
        assert_eq!(config.console.default_label.as_deref(), Some("status"));
        Ok(())
    });
}

#[test]
#[serial]
fn env_keys_keep_their_underscores() {
    Jail::expect_with(|jail| {
        jail.set_env("WEBDECK_CONSOLE_DISABLED_PLUGINS", r#"["licenses", "status"]"#);

        let config = load_config()?;
        assert_eq!(config.console.disabled_plugins, vec!["licenses", "status"]);
        Ok(())
    });
}

#[test]
#[serial]
fn explicit_path_is_validated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deck.toml");
    std::fs::write(
        &path,
        r#"
[[console.plugins]]
factory = "status"
label = ""
"#,
    )
    .expect("write config");

    let errors = load_and_validate_path(&path).expect_err("empty label");
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("console.plugins[0].label")));
}

#[test]
#[serial]
fn missing_explicit_path_falls_back_to_defaults() {
    let config = load_and_validate_path(std::path::Path::new("/nonexistent/webdeck.toml"))
        .expect("missing file should be skipped");
    assert_eq!(config.console.default_category, "Main");
}
