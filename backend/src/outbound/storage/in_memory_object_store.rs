//! In-memory [`ObjectStore`] used by tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::domain::ObjectKey;
use crate::domain::ports::{ObjectStore, ObjectStoreError};

/// Keeps uploaded objects in a map and addresses them under a base URL.
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<ObjectKey, Vec<u8>>>,
    public_base: Url,
}

impl InMemoryObjectStore {
    pub fn new(public_base: Url) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            public_base,
        }
    }

    /// Bytes stored under `key`, if any.
    pub fn object(&self, key: &ObjectKey) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<Url, ObjectStoreError> {
        let url = key
            .url_under(&self.public_base)
            .ok_or_else(|| ObjectStoreError::addressing(format!("{key}: base cannot carry a path")))?;
        self.objects
            .lock()
            .map_err(|_| ObjectStoreError::unavailable("object map poisoned"))?
            .insert(key.clone(), bytes);
        Ok(url)
    }
}
