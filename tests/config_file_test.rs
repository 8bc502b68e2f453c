// Integration test for configuration file support

use logroute::{Level, LogRouteConfig, LogRouteError, Registry};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logroute.toml");

    let toml_content = r#"
        level = "WARNING"

        [routes]
        default = "/var/log/default.log"
        "test.other" = "/var/log/other.log"

        [rotation]
        interval_days = 14
        backup_count = 4
        utc = true
    "#;

    fs::write(&config_path, toml_content).unwrap();

    let config = LogRouteConfig::from_file(&config_path).unwrap();
    assert_eq!(config.level, Level::Warning);
    assert_eq!(config.rotation.interval_days, 14);

    let router = config.build_router().unwrap();
    assert_eq!(router.resolve("test.other.a"), Path::new("/var/log/other.log"));
    assert_eq!(router.rotation().interval, Duration::from_secs(14 * 24 * 60 * 60));
    assert_eq!(router.rotation().backup_count, 4);
    assert!(router.rotation().utc);
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logroute.json");

    let json_content = r#"
        {
            "routes": {
                "default": "/var/log/default.log",
                "app.network": "/var/log/network.log"
            },
            "rotation": { "interval_days": 7 }
        }
    "#;

    fs::write(&config_path, json_content).unwrap();

    let router = LogRouteConfig::from_file(&config_path)
        .unwrap()
        .build_router()
        .unwrap();
    assert_eq!(
        router.resolve("app.network.client"),
        Path::new("/var/log/network.log")
    );
    assert_eq!(router.resolve("app"), Path::new("/var/log/default.log"));
}

#[test]
fn test_missing_default_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logroute.toml");

    fs::write(
        &config_path,
        r#"
        [routes]
        "test.other" = "/var/log/other.log"
        "#,
    )
    .unwrap();

    let result = LogRouteConfig::from_file(&config_path);
    assert!(matches!(result, Err(LogRouteError::MissingDefaultRoute)));
}

#[test]
fn test_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logroute.toml");

    fs::write(&config_path, "routes = [").unwrap();

    let result = LogRouteConfig::from_file(&config_path);
    assert!(matches!(result, Err(LogRouteError::InvalidConfig(_))));
}

#[test]
fn test_invalid_level() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logroute.toml");

    fs::write(
        &config_path,
        r#"
        level = "LOUD"

        [routes]
        default = "/var/log/default.log"
        "#,
    )
    .unwrap();

    let result = LogRouteConfig::from_file(&config_path);
    assert!(matches!(result, Err(LogRouteError::InvalidConfig(_))));
}

#[test]
fn test_config_routes_into_tempdir() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logroute.toml");
    let log_dir = temp_dir.path().join("logs");

    let toml_content = format!(
        r#"
        [routes]
        default = "{dir}/default.log"
        "svc.api" = "{dir}/api.log"
        "#,
        dir = log_dir.display()
    );
    fs::write(&config_path, toml_content).unwrap();

    let config = LogRouteConfig::from_file(&config_path).unwrap();
    let router = config.build_router().unwrap();
    let registry = Registry::new();

    let api = router.get_logger(&registry, "svc.api.v1", config.level).unwrap();
    logroute::info!(api, "request served").unwrap();

    let content = fs::read_to_string(log_dir.join("api.log")).unwrap();
    assert!(content.contains("svc.api.v1 ===> request served"));
}
