//! Configuration Types

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub images: ImageConfig,
    pub directory: DirectoryConfig,
    pub monitoring: MonitoringConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Credential hashing and session header configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
    /// Request header carrying the session id
    pub session_header: String,
}

/// Image upload rules
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageConfig {
    pub max_bytes: usize,
    pub allowed_types: Vec<String>,
    pub upload_requires_admin: bool,
}

/// User directory paging
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub default_take: usize,
    pub max_take: usize,
}

/// Monitoring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: 19 * 1024,
            argon2_iterations: 2,
            argon2_parallelism: 1,
            session_header: "SessionID".to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            allowed_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/gif".to_string(),
            ],
            upload_requires_admin: false,
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_take: 20,
            max_take: 100,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
