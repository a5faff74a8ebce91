use std::fs;

use diskview::analyzer::MAX_INITIAL_CAPACITY;
use diskview::config::{self, AppConfig};
use tempfile::NamedTempFile;

fn write_temp_config(content: &str) -> NamedTempFile {
    let temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    fs::write(temp_file.path(), content).unwrap();
    temp_file
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.static_files.dir, "static");
    assert_eq!(config.analyzer.initial_capacity, 128_000);
    let security = config.security.unwrap();
    assert_eq!(security.enable_hsts, Some(false));
    assert!(security.csp.is_none());
}

#[test]
fn test_defaults_pass_validation() {
    assert!(config::validate(&AppConfig::default()).is_ok());
}

#[test]
fn test_config_from_file() {
    let file = write_temp_config(
        r#"
[server]
host = "0.0.0.0"
port = 9000

[static_files]
dir = "/srv/diskview/ui"

[analyzer]
initial_capacity = 1024
"#,
    );

    let config = config::load_from(Some(file.path().to_str().unwrap())).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.static_files.dir, "/srv/diskview/ui");
    assert_eq!(config.analyzer.initial_capacity, 1024);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_temp_config(
        r#"
[server]
port = 3000
"#,
    );

    let config = config::load_from(Some(file.path().to_str().unwrap())).unwrap();

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.static_files.dir, "static");
}

#[test]
fn test_invalid_server_port() {
    let file = write_temp_config(
        r#"
[server]
port = 0
"#,
    );

    let result = config::load_from(Some(file.path().to_str().unwrap()));

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("invalid server.port"));
}

#[test]
fn test_oversized_capacity_hint_rejected() {
    let file = write_temp_config(
        r#"
[analyzer]
initial_capacity = 20000000
"#,
    );

    let result = config::load_from(Some(file.path().to_str().unwrap()));

    let err = result.unwrap_err().to_string();
    assert!(err.contains("analyzer.initial_capacity"), "unexpected error: {}", err);
}

#[test]
fn test_capacity_hint_at_limit_accepted() {
    let mut config = AppConfig::default();
    config.analyzer.initial_capacity = MAX_INITIAL_CAPACITY;
    assert!(config::validate(&config).is_ok());

    config.analyzer.initial_capacity = MAX_INITIAL_CAPACITY + 1;
    assert!(config::validate(&config).is_err());
}

#[test]
fn test_empty_static_dir_rejected() {
    let mut config = AppConfig::default();
    config.static_files.dir = "  ".to_string();

    assert!(config::validate(&config).is_err());
}

#[test]
fn test_missing_override_file_is_ignored() {
    let config = config::load_from(Some("/definitely/not/here/diskview-custom")).unwrap();
    assert_eq!(config.server.port, 8080);
}
