//! Configuration file loading tests

use sessiongate::config::ConfigManager;
use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
[server]
bind_addr = "0.0.0.0:9000"
shutdown_timeout = "5s"

[auth]
argon2_memory_kib = 8192
argon2_iterations = 3
session_header = "X-Session"

[images]
max_bytes = 2048
allowed_types = ["image/png"]
upload_requires_admin = true

[directory]
default_take = 5
max_take = 10

[monitoring]
log_level = "debug"
metrics_enabled = false
"#,
    );

    let config = ConfigManager::load_from_file(file.path()).unwrap();

    assert_eq!(config.server.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.server.shutdown_timeout, Duration::from_secs(5));
    assert_eq!(config.auth.argon2_memory_kib, 8192);
    assert_eq!(config.auth.argon2_iterations, 3);
    assert_eq!(config.auth.argon2_parallelism, 1);
    assert_eq!(config.auth.session_header, "X-Session");
    assert_eq!(config.images.max_bytes, 2048);
    assert_eq!(config.images.allowed_types, vec!["image/png".to_string()]);
    assert!(config.images.upload_requires_admin);
    assert_eq!(config.directory.default_take, 5);
    assert_eq!(config.directory.max_take, 10);
    assert_eq!(config.monitoring.log_level, "debug");
    assert!(!config.monitoring.metrics_enabled);
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_config("[server]\nbind_addr = \"127.0.0.1:9100\"\n");

    let config = ConfigManager::load_from_file(file.path()).unwrap();

    assert_eq!(config.server.bind_addr.port(), 9100);
    assert_eq!(config.auth.session_header, "SessionID");
    assert_eq!(config.images.max_bytes, 1024 * 1024);
    assert!(config.monitoring.metrics_enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_files_are_rejected() {
    let malformed = write_config("[server\nbind_addr = ");
    assert!(ConfigManager::load_from_file(malformed.path()).is_err());

    let bad_header = write_config("[auth]\nsession_header = \"not a header\"\n");
    assert!(ConfigManager::load_from_file(bad_header.path()).is_err());

    let bad_paging = write_config("[directory]\ndefault_take = 50\nmax_take = 10\n");
    assert!(ConfigManager::load_from_file(bad_paging.path()).is_err());

}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigManager::load_from_file(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.server.bind_addr.port(), 8080);
    assert_eq!(config.directory.max_take, 100);
}
