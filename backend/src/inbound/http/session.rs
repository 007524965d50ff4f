//! Session cookie transport.
//!
//! The session identifier travels in an HTTP-only cookie whose value is
//! signed with the configured key. Handlers never see the cookie encoding:
//! they receive an optional [`SessionId`] through the [`SessionCookie`]
//! extractor and hand new identifiers back to [`SessionCookieConfig::issue`].

use std::time::Duration;

use actix_web::cookie::{Cookie, CookieJar, Key, SameSite, time};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{DEFAULT_SESSION_TTL, Error, SessionId};
use crate::inbound::http::session_config::SessionSettings;

/// Cookie name used when none is configured.
pub const DEFAULT_COOKIE_NAME: &str = "qid";

/// How session cookies are named, signed and scoped.
#[derive(Clone)]
pub struct SessionCookieConfig {
    name: String,
    key: Key,
    secure: bool,
    same_site: SameSite,
    max_age: Duration,
}

impl SessionCookieConfig {
    /// Secure, `SameSite=Lax` cookie named [`DEFAULT_COOKIE_NAME`].
    pub fn new(key: Key) -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_owned(),
            key,
            secure: true,
            same_site: SameSite::Lax,
            max_age: DEFAULT_SESSION_TTL,
        }
    }

    pub fn from_settings(settings: SessionSettings) -> Self {
        Self::new(settings.key)
            .with_secure(settings.cookie_secure)
            .with_same_site(settings.same_site)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Cookie lifetime; keep equal to the session TTL.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signed cookie carrying `session_id`.
    pub fn issue(&self, session_id: &SessionId) -> Result<Cookie<'static>, Error> {
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key)
            .add(self.template(session_id.as_str().to_owned()));
        jar.get(&self.name)
            .cloned()
            .ok_or_else(|| Error::internal("session cookie was not signed"))
    }

    /// Cookie instructing the browser to drop the session.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.template(String::new());
        cookie.make_removal();
        cookie
    }

    /// Verified session identifier from the request, if any.
    ///
    /// Unsigned, tampered or malformed values are treated as absent.
    pub fn read(&self, req: &HttpRequest) -> Option<SessionId> {
        let raw = req.cookie(&self.name)?;
        let mut jar = CookieJar::new();
        jar.add_original(raw);
        let Some(verified) = jar.signed(&self.key).get(&self.name) else {
            debug!(cookie = %self.name, "session cookie failed signature check");
            return None;
        };
        match SessionId::parse(verified.value()) {
            Ok(id) => Some(id),
            Err(error) => {
                debug!(error = %error, "signed session cookie holds a malformed id");
                None
            }
        }
    }

    fn template(&self, value: String) -> Cookie<'static> {
        let max_age = time::Duration::try_from(self.max_age).unwrap_or(time::Duration::MAX);
        Cookie::build(self.name.clone(), value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age)
            .finish()
    }
}

/// Session identifier presented by the caller, if it verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie(pub Option<SessionId>);

impl FromRequest for SessionCookie {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<SessionCookieConfig>>() {
            Some(config) => Ok(Self(config.read(req))),
            None => Err(Error::internal("session cookie configuration missing").into()),
        };
        ready(result)
    }
}
