//! Port for binary object storage (profile images).

use async_trait::async_trait;
use url::Url;

use crate::domain::ObjectKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum ObjectStoreError {
        /// Backing storage could not be reached or written.
        Unavailable { message: String } => "object store unavailable: {message}",
        /// The store could not produce a public URL for the object.
        Addressing { message: String } => "object store addressing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous object, and return
    /// its public URL.
    async fn upload(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<Url, ObjectStoreError>;
}
