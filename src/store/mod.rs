//! Data Store Module
//!
//! Storage for accounts, images and notifications.

pub mod memory;
pub mod types;

pub use memory::MemoryStore;
pub use types::{Account, Image, ImageInfo, Notification, StoreError};
