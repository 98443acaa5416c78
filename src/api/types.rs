//! API Types

use crate::auth::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: SystemTime,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: SystemTime::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: SystemTime::now(),
        }
    }
}

/// Login and registration request
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: SessionId,
}

/// Password change or reset request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current: Option<String>,
    pub new: Option<String>,
}

/// Query parameters for the user directory
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub query: Option<String>,
    pub take: Option<usize>,
    pub skip: Option<usize>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub checks: HashMap<String, CheckResult>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Individual health check result
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: Option<String>,
}
