//! In-memory data store

use super::{Account, Image, Notification, StoreError};
use crate::auth::{AccountStore, CredentialRecord};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;
use tracing::{debug, info};
use uuid::Uuid;

/// Accounts, images and notifications held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<String, Account>>,
    images: RwLock<HashMap<Uuid, Image>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account.
    ///
    /// The very first account becomes an administrator.
    pub fn create_account(&self, username: &str, credential: CredentialRecord) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write();

        if accounts.contains_key(username) {
            return Err(StoreError::Duplicate(username.to_string()));
        }

        let account = Account {
            username: username.to_string(),
            credential,
            is_admin: accounts.is_empty(),
            image_url: None,
            created_at: SystemTime::now(),
        };
        accounts.insert(username.to_string(), account.clone());

        info!(
            "Registered account '{}'{}",
            username,
            if account.is_admin { " as administrator" } else { "" }
        );
        Ok(account)
    }

    pub fn get_account(&self, username: &str) -> Option<Account> {
        self.accounts.read().get(username).cloned()
    }

    /// Accounts whose username contains `query`, ordered by username
    pub fn directory(&self, query: Option<&str>, skip: usize, take: usize) -> Vec<Account> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        self.accounts
            .read()
            .values()
            .filter(|a| query.map_or(true, |q| a.username.contains(q)))
            .skip(skip)
            .take(take)
            .cloned()
            .collect()
    }

    /// Set the profile image URL; `None` when the account does not exist
    pub fn set_image_url(&self, username: &str, image_url: String) -> Option<Account> {
        let mut accounts = self.accounts.write();
        let account = accounts.get_mut(username)?;
        account.image_url = Some(image_url);
        Some(account.clone())
    }

    pub fn add_image(&self, content_type: &str, data: Bytes, uploaded_by: &str) -> Image {
        let image = Image {
            id: Uuid::new_v4(),
            content_type: content_type.to_string(),
            data,
            uploaded_by: uploaded_by.to_string(),
            created_at: SystemTime::now(),
        };
        self.images.write().insert(image.id, image.clone());
        debug!("Stored image {} ({} bytes)", image.id, image.data.len());
        image
    }

    pub fn get_image(&self, id: &Uuid) -> Option<Image> {
        self.images.read().get(id).cloned()
    }

    /// Queue a notification for `owner`
    pub fn notify(&self, owner: &str, text: impl Into<String>) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            text: text.into(),
            created_at: SystemTime::now(),
        };
        self.notifications.write().push(notification.clone());
        notification
    }

    /// Notifications of `owner`, oldest first
    pub fn notifications_for(&self, owner: &str) -> Vec<Notification> {
        self.notifications
            .read()
            .iter()
            .filter(|n| n.owner == owner)
            .cloned()
            .collect()
    }

    /// Delete one of `owner`'s notifications; foreign or unknown ids are left alone
    pub fn delete_notification(&self, owner: &str, id: &Uuid) -> usize {
        let mut notifications = self.notifications.write();
        let before = notifications.len();
        notifications.retain(|n| !(n.owner == owner && n.id == *id));
        before - notifications.len()
    }

    pub fn delete_all_notifications(&self, owner: &str) -> usize {
        let mut notifications = self.notifications.write();
        let before = notifications.len();
        notifications.retain(|n| n.owner != owner);
        before - notifications.len()
    }
}

impl AccountStore for MemoryStore {
    fn get_credential(&self, account_id: &str) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self
            .accounts
            .read()
            .get(account_id)
            .map(|a| a.credential.clone()))
    }

    fn set_credential(&self, account_id: &str, record: CredentialRecord) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write();
        match accounts.get_mut(account_id) {
            Some(account) => {
                account.credential = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
