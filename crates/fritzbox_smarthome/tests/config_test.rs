use std::fs;

use fritzbox_smarthome::agent::Protocol;
use fritzbox_smarthome::config::ConfigError;
use fritzbox_smarthome::config::PresentPolicy;
use fritzbox_smarthome::config::Warning;
use fritzbox_smarthome::format_diagnostics;
use fritzbox_smarthome::Config;
use fritzbox_smarthome::Diagnostic;
use fritzbox_smarthome::LogLevel;
use tempfile::TempDir;

/// Strip ANSI escape sequences so rendered reports are comparable.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c2 in chars.by_ref() {
                if c2 == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("fritzbox_smarthome.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[logging]
level = "debug"

[logging.overrides]
"fritzbox_smarthome::discovery" = "trace"

[params]
present = "crit"
showHFunit = true

[params.hkr]
hkr_bat_always = false

[params.hkr.hkr_warn]
hkr_diff_soll = 3
hkr_flag_battery = true

[params.hkr.hkr_crit]
hkr_bat_below = 15.5

[params.humidity.humidity_warn]
higher_than = 65

[agent]
password = "secret"
protocol = "https"
port = 443
"#,
    );

    let (config, diagnostics, _) = Config::from_file(&path).unwrap();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(
        config.logging.overrides.get("fritzbox_smarthome::discovery"),
        Some(&LogLevel::Trace)
    );

    let params = &config.params;
    assert_eq!(params.present, PresentPolicy::Crit);
    assert!(params.show_hanfun_units);
    assert!(!params.hkr.battery_always);
    assert_eq!(params.hkr.warn.diff_soll, 3.0);
    assert_eq!(params.hkr.warn.battery_below, 50.0);
    assert!(params.hkr.warn.flag_battery);
    assert_eq!(params.hkr.crit.diff_soll, 10.0);
    assert_eq!(params.hkr.crit.battery_below, 15.5);
    assert!(params.hkr.crit.flag_error);
    assert_eq!(params.humidity.warn.higher_than, 65.0);
    assert_eq!(params.humidity.warn.lower_than, 40.0);

    let agent = config.agent.unwrap();
    assert_eq!(agent.username, "smarthome");
    assert_eq!(agent.protocol, Protocol::Https);
    assert_eq!(agent.port, 443);
}

#[test]
fn test_empty_config_warns() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "# nothing configured yet\n");

    let (config, diagnostics, _) = Config::from_file(&path).unwrap();
    assert_eq!(config.params, Default::default());
    assert!(config.agent.is_none());
    assert!(matches!(
        diagnostics.as_slice(),
        [Diagnostic::Warning(Warning::EmptyConfig { .. })]
    ));

    let rendered = format_diagnostics(&diagnostics, None);
    assert!(rendered.starts_with("Warning: Config file '"));
    assert!(rendered.contains("is empty and has no effect"));
}

#[test]
fn test_unrecognized_present_points_at_value() {
    let dir = TempDir::new().unwrap();
    let content = "[params]\npresent = \"unknown\"\n";
    let path = write_config(&dir, content);

    let (config, diagnostics, source) = Config::from_file(&path).unwrap();
    assert_eq!(
        config.params.present,
        PresentPolicy::Unrecognized("unknown".to_string())
    );
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_warning());

    let source = source.unwrap();
    assert_eq!(source.file_path, path);
    assert_eq!(source.content, content);
    let rendered = strip_ansi(&format_diagnostics(&diagnostics, Some(&source)));
    assert!(rendered.contains("'params.present': unrecognized choice 'unknown'"));
    assert!(rendered.contains("defined here"));
    assert!(rendered.contains("present = \"unknown\""));
}

/// Line drawn under the source line containing `needle`.
fn label_line(rendered: &str, needle: &str) -> String {
    let lines: Vec<&str> = rendered.lines().collect();
    let at = lines
        .iter()
        .position(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("no source line with {:?} in:\n{}", needle, rendered));
    lines[at + 1].to_string()
}

#[test]
fn test_fallback_span_after_umlauts() {
    let render = |comment: &str| {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, &format!("{}\n[params]\npresent = \"x\"\n", comment));
        let (_, diagnostics, source) = Config::from_file(&path).unwrap();
        strip_ansi(&format_diagnostics(&diagnostics, source.as_ref()))
    };

    let with_umlauts = render("# Heizung Gästezimmer, Küche, Bäder, Flur über der Tür");
    let without = render("# Heizung Gastezimmer, Kuche, Bader, Flur uber der Tur");

    assert!(with_umlauts.contains("defined here"), "{}", with_umlauts);
    assert_eq!(
        label_line(&with_umlauts, "present = \"x\""),
        label_line(&without, "present = \"x\""),
        "{}",
        with_umlauts
    );
}

#[test]
fn test_invalid_values_are_reported_together() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[params.humidity.humidity_crit]
higher_than = 120

[params.hkr.hkr_warn]
hkr_diff_soll = -1

[agent]
protocol = "ftp"
"#,
    );

    let err = Config::from_file(&path).unwrap_err();
    let rendered = match err {
        ConfigError::Invalid(rendered) => strip_ansi(&rendered),
        other => panic!("expected validation failure, got {:?}", other),
    };

    assert!(rendered.contains("params.humidity.humidity_crit.higher_than"));
    assert!(rendered.contains("humidity threshold must be between 0 and 100, got 120"));
    assert!(rendered.contains("temperature deviation must not be negative, got -1"));
    assert!(rendered.contains("expected http or https, got 'ftp'"));
    assert!(rendered.contains("Error: Validation error in 'agent.password': password is required"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_file(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
    assert!(err.to_string().starts_with("Failed to read '"));
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[params\npresent = \"ok\"\n");

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse '"));
}
