//! Toggle parsing shared by the session settings.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, SessionConfigError};

pub(super) const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
pub(super) const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// One environment toggle and its debug-build fallback.
pub(super) struct Toggle<T> {
    pub(super) name: &'static str,
    pub(super) expected: &'static str,
    pub(super) debug_default: T,
}

impl<T: std::fmt::Debug> Toggle<T> {
    /// Parse `raw`, falling back to the debug default or failing in release.
    pub(super) fn resolve(
        self,
        raw: Option<String>,
        mode: BuildMode,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        let Some(value) = raw else {
            if mode.is_debug() {
                warn!(name = self.name, default = ?self.debug_default, "toggle not set; using default");
                return Ok(self.debug_default);
            }
            return Err(SessionConfigError::MissingEnv { name: self.name });
        };
        if let Some(parsed) = parse(&value) {
            return Ok(parsed);
        }
        if mode.is_debug() {
            warn!(
                name = self.name,
                value = %value,
                default = ?self.debug_default,
                "invalid toggle; using default"
            );
            return Ok(self.debug_default);
        }
        Err(SessionConfigError::InvalidEnv {
            name: self.name,
            value,
            expected: self.expected,
        })
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub(super) fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
