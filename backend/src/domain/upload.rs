//! Profile image uploads and public user lookups.

use std::fmt;

use url::Url;

use crate::domain::{UserId, Username};

/// Reasons an upload filename is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UploadFilenameError {
    #[error("filename must not be empty")]
    Empty,
    #[error("filename must be a single path segment")]
    NotSingleSegment,
    #[error("filename must not contain control characters")]
    ControlCharacter,
}

/// Filename supplied with an upload, restricted to one safe path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFilename(String);

impl UploadFilename {
    pub fn new(raw: impl Into<String>) -> Result<Self, UploadFilenameError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UploadFilenameError::Empty);
        }
        if raw.chars().any(char::is_control) {
            return Err(UploadFilenameError::ControlCharacter);
        }
        if raw.contains(['/', '\\']) || raw == "." || raw == ".." || raw.contains("..") {
            return Err(UploadFilenameError::NotSingleSegment);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Bytes and filename received for a profile image.
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ProfileImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for ProfileImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImageUpload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Key of an object in the object store, always relative and `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Key for a user's profile image: `profile/{user_id}/{filename}`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ObjectKey, UploadFilename, UserId};
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// let name = UploadFilename::new("me.png").expect("safe filename");
    /// let key = ObjectKey::profile_image(&id, &name);
    /// assert_eq!(key.as_str(), "profile/3fa85f64-5717-4562-b3fc-2c963f66afa6/me.png");
    /// ```
    pub fn profile_image(user_id: &UserId, filename: &UploadFilename) -> Self {
        Self(format!("profile/{user_id}/{}", filename.as_str()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path segments of the key, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Address of the object beneath `base`.
    ///
    /// Each segment is percent-encoded, so characters such as `#`, `?` or `%`
    /// in a filename stay part of the path. Returns `None` when `base` cannot
    /// carry a path.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ObjectKey, UploadFilename, UserId};
    /// use url::Url;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// let name = UploadFilename::new("me#1.png").expect("safe filename");
    /// let base = Url::parse("https://cdn.example.com/uploads/").expect("base");
    /// let url = ObjectKey::profile_image(&id, &name).url_under(&base).expect("url");
    /// assert_eq!(
    ///     url.path(),
    ///     "/uploads/profile/3fa85f64-5717-4562-b3fc-2c963f66afa6/me%231.png"
    /// );
    /// assert!(url.fragment().is_none());
    /// ```
    pub fn url_under(&self, base: &Url) -> Option<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(self.segments());
        Some(url)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Criteria for the public user lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    ById(UserId),
    ByUsername(Username),
}
