//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::path::Path;

/// Largest image upload the server can be configured to accept
const MAX_IMAGE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            config
                .validate()
                .with_context(|| "Configuration validation failed")?;

            tracing::info!("Configuration loaded and validated successfully");
            Ok(config)
        } else {
            tracing::warn!("Configuration file not found at {}, using defaults", path.display());
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Override fields from `SESSIONGATE_*` variables supplied by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_addr) = lookup("SESSIONGATE_BIND_ADDR") {
            self.server.bind_addr = bind_addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid SESSIONGATE_BIND_ADDR: {}", bind_addr))?;
        }

        if let Some(timeout) = lookup("SESSIONGATE_SHUTDOWN_TIMEOUT") {
            self.server.shutdown_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid SESSIONGATE_SHUTDOWN_TIMEOUT: {}", timeout))?;
        }

        if let Some(max_bytes) = lookup("SESSIONGATE_MAX_IMAGE_BYTES") {
            self.images.max_bytes = max_bytes
                .parse::<usize>()
                .with_context(|| format!("Invalid SESSIONGATE_MAX_IMAGE_BYTES: {}", max_bytes))?;
        }

        if let Some(log_level) = lookup("SESSIONGATE_LOG_LEVEL") {
            self.monitoring.log_level = log_level;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_server_config()
            .with_context(|| "Server configuration validation failed")?;

        self.validate_auth_config()
            .with_context(|| "Authentication configuration validation failed")?;

        self.validate_image_config()
            .with_context(|| "Image configuration validation failed")?;

        self.validate_directory_config()
            .with_context(|| "Directory configuration validation failed")?;

        self.validate_monitoring_config()
            .with_context(|| "Monitoring configuration validation failed")?;

        Ok(())
    }

    fn validate_server_config(&self) -> Result<()> {
        if self.server.shutdown_timeout.as_secs() > 600 {
            bail!("shutdown_timeout cannot exceed 10 minutes");
        }
        Ok(())
    }

    fn validate_auth_config(&self) -> Result<()> {
        if self.auth.argon2_iterations == 0 {
            bail!("argon2_iterations must be greater than 0");
        }

        if self.auth.argon2_parallelism == 0 {
            bail!("argon2_parallelism must be greater than 0");
        }

        if self.auth.argon2_memory_kib < self.auth.argon2_parallelism.saturating_mul(8) {
            bail!("argon2_memory_kib must be at least 8 * argon2_parallelism");
        }

        if let Err(e) = argon2::Params::new(
            self.auth.argon2_memory_kib,
            self.auth.argon2_iterations,
            self.auth.argon2_parallelism,
            None,
        ) {
            bail!("Invalid Argon2 parameters: {}", e);
        }

        let header = self.auth.session_header.as_str();
        if header.is_empty() {
            bail!("session_header must not be empty");
        }

        if axum::http::HeaderName::from_bytes(header.as_bytes()).is_err() {
            bail!("session_header '{}' is not a valid header name", header);
        }

        Ok(())
    }

    fn validate_image_config(&self) -> Result<()> {
        if self.images.max_bytes == 0 {
            bail!("images.max_bytes must be greater than 0");
        }

        if self.images.max_bytes > MAX_IMAGE_BYTES_LIMIT {
            bail!("images.max_bytes cannot exceed 16MB");
        }

        if self.images.allowed_types.is_empty() {
            bail!("images.allowed_types must list at least one content type");
        }

        for (i, content_type) in self.images.allowed_types.iter().enumerate() {
            if !content_type.contains('/') {
                bail!("Allowed image type {} ('{}') is not a MIME type", i, content_type);
            }
        }

        Ok(())
    }

    fn validate_directory_config(&self) -> Result<()> {
        if self.directory.max_take == 0 {
            bail!("directory.max_take must be greater than 0");
        }

        if self.directory.default_take > self.directory.max_take {
            bail!("directory.default_take cannot exceed directory.max_take");
        }

        Ok(())
    }

    fn validate_monitoring_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.monitoring.log_level.as_str()) {
            bail!("monitoring.log_level must be one of: {}", valid_log_levels.join(", "));
        }

        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli_args(
        &mut self,
        bind: Option<&str>,
        port: Option<u16>,
        max_image_bytes: Option<usize>,
    ) {
        if let Some(bind_str) = bind {
            if let Ok(addr) = bind_str.parse::<SocketAddr>() {
                self.server.bind_addr = addr;
                tracing::info!("CLI override: bind address set to {}", addr);
            } else {
                tracing::warn!("Invalid bind address provided: {}", bind_str);
            }
        }

        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
            tracing::info!("CLI override: port set to {}", port);
        }

        if let Some(max_bytes) = max_image_bytes {
            self.images.max_bytes = max_bytes;
            tracing::info!("CLI override: max image size set to {} bytes", max_bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [images]
            max_bytes = 2048
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_addr.port(), 9000);
        assert_eq!(config.server.shutdown_timeout, Duration::from_secs(30));
        assert_eq!(config.images.max_bytes, 2048);
        assert_eq!(config.images.allowed_types.len(), 3);
        assert_eq!(config.auth.session_header, "SessionID");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SESSIONGATE_BIND_ADDR", "127.0.0.1:9999"),
            ("SESSIONGATE_SHUTDOWN_TIMEOUT", "5s"),
            ("SESSIONGATE_MAX_IMAGE_BYTES", "4096"),
            ("SESSIONGATE_LOG_LEVEL", "debug"),
        ]);

        let mut config = Config::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.bind_addr.port(), 9999);
        assert_eq!(config.server.shutdown_timeout, Duration::from_secs(5));
        assert_eq!(config.images.max_bytes, 4096);
        assert_eq!(config.monitoring.log_level, "debug");
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = Config::default();
        let result = config.apply_env(|key| {
            (key == "SESSIONGATE_MAX_IMAGE_BYTES").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.auth.argon2_memory_kib = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.session_header = "Session ID".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.images.allowed_types.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.directory.default_take = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.monitoring.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_parallelism_is_rejected() {
        let mut config = Config::default();
        config.auth.argon2_parallelism = u32::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.argon2_parallelism = u32::MAX / 4;
        config.auth.argon2_memory_kib = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.merge_with_cli_args(Some("0.0.0.0:7000"), Some(7001), Some(512));

        assert_eq!(config.server.bind_addr, "0.0.0.0:7001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.images.max_bytes, 512);

        config.merge_with_cli_args(Some("not-an-address"), None, None);
        assert_eq!(config.server.bind_addr.port(), 7001);
    }
}
