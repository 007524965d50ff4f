//! Filesystem-backed [`ObjectStore`] rooted in a `cap_std` directory.
//!
//! Objects are written under the root by key, staged to a temporary file and
//! renamed into place so readers never observe a partial image. Public URLs
//! append the key's percent-encoded segments to a configured base URL.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::domain::ObjectKey;
use crate::domain::ports::{ObjectStore, ObjectStoreError};

/// Object store writing into a sandboxed upload directory.
#[derive(Clone)]
pub struct LocalObjectStore {
    root: Arc<Dir>,
    public_base: Url,
}

impl LocalObjectStore {
    /// Open (creating if needed) `root` and serve objects under `public_base`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::Unavailable`] when the directory cannot be
    /// created or opened, and [`ObjectStoreError::Addressing`] when
    /// `public_base` cannot carry a path.
    pub fn open(root: impl AsRef<Path>, public_base: Url) -> Result<Self, ObjectStoreError> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|err| io_error(root, &err))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| io_error(root, &err))?;
        Self::from_dir(dir, public_base)
    }

    /// Wrap an already opened directory.
    pub fn from_dir(dir: Dir, public_base: Url) -> Result<Self, ObjectStoreError> {
        Ok(Self {
            root: Arc::new(dir),
            public_base: addressable(public_base)?,
        })
    }

    fn public_url(&self, key: &ObjectKey) -> Result<Url, ObjectStoreError> {
        key.url_under(&self.public_base)
            .ok_or_else(|| ObjectStoreError::addressing(format!("{key}: base cannot carry a path")))
    }
}

fn addressable(base: Url) -> Result<Url, ObjectStoreError> {
    if base.cannot_be_a_base() {
        return Err(ObjectStoreError::addressing(format!(
            "{base} cannot be used as a base URL"
        )));
    }
    Ok(base)
}

fn io_error(path: &Path, err: &io::Error) -> ObjectStoreError {
    ObjectStoreError::unavailable(format!("{}: {err}", path.display()))
}

fn write_atomically(root: &Dir, key: &ObjectKey, bytes: &[u8]) -> io::Result<()> {
    let relative: PathBuf = key.segments().collect();
    if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
        root.create_dir_all(parent)?;
    }
    let staging = PathBuf::from(format!(".upload-{}", Uuid::new_v4().simple()));
    root.write(&staging, bytes)?;
    root.rename(&staging, root, &relative).inspect_err(|_| {
        if let Err(err) = root.remove_file(&staging) {
            warn!(path = %staging.display(), error = %err, "failed to remove staged upload");
        }
    })
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<Url, ObjectStoreError> {
        let url = self.public_url(key)?;
        let root = Arc::clone(&self.root);
        let owned_key = key.clone();
        tokio::task::spawn_blocking(move || write_atomically(&root, &owned_key, &bytes))
            .await
            .map_err(|err| ObjectStoreError::unavailable(format!("upload task failed: {err}")))?
            .map_err(|err| io_error(Path::new(key.as_str()), &err))?;
        Ok(url)
    }
}
