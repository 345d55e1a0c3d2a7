use clap::Parser;

use super::*;

#[test]
fn mode_defaults_to_development() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.mode, Mode::Development);
    assert!(!settings.mode.is_production());
}

#[test]
fn only_the_literal_production_string_selects_production() {
    assert_eq!(Mode::from("production"), Mode::Production);
    for other in ["Production", "PRODUCTION", "prod", "staging", "test", ""] {
        assert_eq!(Mode::from(other), Mode::Development, "value: {other:?}");
    }
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings {
        mode: Some("production".to_string()),
        ..RawSettings::default()
    };
    raw.logging.level = Some("info".to_string());

    let overrides = Overrides {
        mode: Some("development".to_string()),
        log_level: Some("debug".to_string()),
        ..Overrides::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.mode, Mode::Development);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = Overrides {
        log_json: Some(true),
        ..Overrides::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loudest".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn components_directory_flows_through_overrides() {
    let mut raw = RawSettings::default();
    let overrides = Overrides {
        components_directory: Some(PathBuf::from("/srv/components")),
        ..Overrides::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.components.directory.as_deref(),
        Some(std::path::Path::new("/srv/components"))
    );
}

#[test]
fn bare_invocation_has_no_subcommand() {
    let args = CliArgs::parse_from(["ponte"]);
    assert!(args.command.is_none());
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "ponte",
        "render",
        "--component",
        "/srv/components/Hello.hbs",
        "--props",
        r#"{"name":"Svelte"}"#,
        "--mode",
        "production",
    ]);

    match args.command.expect("render command") {
        Command::Render(render) => {
            assert_eq!(render.component, "/srv/components/Hello.hbs");
            assert_eq!(render.props.as_deref(), Some(r#"{"name":"Svelte"}"#));
            assert!(render.props_file.is_none());
            assert_eq!(render.overrides.mode.as_deref(), Some("production"));
        }
        Command::Serve(_) => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_serve_arguments() {
    let args = CliArgs::parse_from(["ponte", "serve", "--components-directory", "/srv/components"]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(
                serve.overrides.components_directory.as_deref(),
                Some(std::path::Path::new("/srv/components"))
            );
        }
        Command::Render(_) => panic!("wrong command parsed"),
    }
}
