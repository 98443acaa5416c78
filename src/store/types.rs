//! Data Store Types

use crate::auth::CredentialRecord;
use bytes::Bytes;
use serde::Serialize;
use std::time::SystemTime;
use thiserror::Error;
use uuid::Uuid;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("'{0}' already exists")]
    Duplicate(String),
}

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub username: String,
    #[serde(skip_serializing)]
    pub credential: CredentialRecord,
    pub is_admin: bool,
    pub image_url: Option<String>,
    pub created_at: SystemTime,
}

/// An uploaded image
#[derive(Debug, Clone)]
pub struct Image {
    pub id: Uuid,
    pub content_type: String,
    pub data: Bytes,
    pub uploaded_by: String,
    pub created_at: SystemTime,
}

impl Image {
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            id: self.id,
            content_type: self.content_type.clone(),
            size: self.data.len(),
            uploaded_by: self.uploaded_by.clone(),
            created_at: self.created_at,
        }
    }
}

/// Image metadata without the payload
#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub id: Uuid,
    pub content_type: String,
    pub size: usize,
    pub uploaded_by: String,
    pub created_at: SystemTime,
}

/// A message addressed to one account
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub owner: String,
    pub text: String,
    pub created_at: SystemTime,
}
