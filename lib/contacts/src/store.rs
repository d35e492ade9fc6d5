//! The contact persistence boundary.
//!
//! The store holds one row per phone number. `insert_if_absent` must be
//! atomic with respect to concurrent callers targeting the same phone:
//! two racing creates yield exactly one success. The Postgres
//! implementation lives in the agent binary; the in-memory store here
//! backs tests and local development.

use crate::contact::{Contact, ContactUpdate};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Trait for contact storage.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Fetches a contact by phone number.
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Contact>, StoreError>;

    /// Inserts a contact unless the phone already exists.
    ///
    /// Returns true if the contact was inserted, false if the phone was
    /// already present. The check and insert are one logical unit.
    async fn insert_if_absent(&self, contact: &Contact) -> Result<bool, StoreError>;

    /// Updates the provided fields of an existing contact.
    ///
    /// Returns the updated contact, or `None` if no contact with that
    /// phone exists.
    async fn update_fields(
        &self,
        phone: &str,
        update: &ContactUpdate,
    ) -> Result<Option<Contact>, StoreError>;
}

/// In-memory contact store.
///
/// The single mutex makes check-then-insert atomic, matching the
/// isolation the persistent store guarantees at the row level.
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: Mutex<HashMap<String, Contact>>,
}

impl MemoryContactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.lock().expect("store lock poisoned").len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Contact>, StoreError> {
        let contacts = self.contacts.lock().expect("store lock poisoned");
        Ok(contacts.get(phone).cloned())
    }

    async fn insert_if_absent(&self, contact: &Contact) -> Result<bool, StoreError> {
        let mut contacts = self.contacts.lock().expect("store lock poisoned");
        if contacts.contains_key(&contact.phone) {
            return Ok(false);
        }
        contacts.insert(contact.phone.clone(), contact.clone());
        Ok(true)
    }

    async fn update_fields(
        &self,
        phone: &str,
        update: &ContactUpdate,
    ) -> Result<Option<Contact>, StoreError> {
        let mut contacts = self.contacts.lock().expect("store lock poisoned");
        match contacts.get_mut(phone) {
            Some(contact) => {
                update.apply_to(contact);
                Ok(Some(contact.clone()))
            }
            None => Ok(None),
        }
    }
}

/// A store that fails every call, for exercising degraded paths.
#[derive(Debug, Default)]
pub struct FailingContactStore;

#[async_trait]
impl ContactStore for FailingContactStore {
    async fn get_by_phone(&self, _phone: &str) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::Unavailable {
            reason: "store offline".to_string(),
        })
    }

    async fn insert_if_absent(&self, _contact: &Contact) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable {
            reason: "store offline".to_string(),
        })
    }

    async fn update_fields(
        &self,
        _phone: &str,
        _update: &ContactUpdate,
    ) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::Unavailable {
            reason: "store offline".to_string(),
        })
    }
}
