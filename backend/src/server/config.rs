//! Server settings loaded via OrthoConfig.
//!
//! Values come from `INSTACLONE_*` environment variables, configuration
//! files or command-line flags. Unset adapters fall back to in-memory
//! implementations at wiring time.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use backend::domain::DEFAULT_SESSION_TTL;
use backend::inbound::http::session::DEFAULT_COOKIE_NAME;
use backend::outbound::hashing::Argon2Settings;

const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Route under which the upload directory is served when no external base
/// is configured.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Invalid combinations detected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid public upload base '{value}': {source}")]
    PublicUploadBase {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("session TTL must be at least one second")]
    ZeroSessionTtl,
    #[error("session cookie name must not be empty")]
    EmptyCookieName,
}

/// Deployment settings for the identity server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INSTACLONE")]
pub struct AppSettings {
    /// Listen port.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Listen interface; defaults to all IPv4 interfaces.
    pub host: Option<IpAddr>,
    /// PostgreSQL connection string for the user store.
    pub database_url: Option<String>,
    /// Redis connection string for the session store.
    pub redis_url: Option<String>,
    /// Directory receiving profile image uploads.
    pub upload_dir: Option<PathBuf>,
    /// Public URL prefix under which `upload_dir` is served. Defaults to
    /// this server's own uploads route on `localhost`.
    pub public_upload_base: Option<String>,
    pub cookie_name: Option<String>,
    pub session_ttl_seconds: Option<u64>,
    pub argon2_memory_kib: Option<u32>,
    pub argon2_iterations: Option<u32>,
    pub argon2_parallelism: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(host, self.port)
    }

    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn redis_url(&self) -> Option<&str> {
        non_blank(self.redis_url.as_deref())
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    pub fn public_upload_base(&self) -> Result<Url, SettingsError> {
        let value = match non_blank(self.public_upload_base.as_deref()) {
            Some(value) => value.to_owned(),
            None => format!("http://localhost:{}{UPLOADS_ROUTE}/", self.port),
        };
        Url::parse(&value).map_err(|source| SettingsError::PublicUploadBase { value, source })
    }

    pub fn cookie_name(&self) -> Result<&str, SettingsError> {
        match self.cookie_name.as_deref() {
            None => Ok(DEFAULT_COOKIE_NAME),
            Some(name) if name.trim().is_empty() => Err(SettingsError::EmptyCookieName),
            Some(name) => Ok(name),
        }
    }

    /// Session lifetime; sessions never renew, so this bounds their age.
    pub fn session_ttl(&self) -> Result<Duration, SettingsError> {
        match self.session_ttl_seconds {
            None => Ok(DEFAULT_SESSION_TTL),
            Some(0) => Err(SettingsError::ZeroSessionTtl),
            Some(seconds) => Ok(Duration::from_secs(seconds)),
        }
    }

    pub fn argon2(&self) -> Argon2Settings {
        let defaults = Argon2Settings::default();
        Argon2Settings {
            memory_kib: self.argon2_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.argon2_iterations.unwrap_or(defaults.iterations),
            parallelism: self.argon2_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const DEFAULT_PORT: u16 = 8080;

    const VARS: [&str; 11] = [
        "INSTACLONE_PORT",
        "INSTACLONE_HOST",
        "INSTACLONE_DATABASE_URL",
        "INSTACLONE_REDIS_URL",
        "INSTACLONE_UPLOAD_DIR",
        "INSTACLONE_PUBLIC_UPLOAD_BASE",
        "INSTACLONE_COOKIE_NAME",
        "INSTACLONE_SESSION_TTL_SECONDS",
        "INSTACLONE_ARGON2_MEMORY_KIB",
        "INSTACLONE_ARGON2_ITERATIONS",
        "INSTACLONE_ARGON2_PARALLELISM",
    ];

    fn load_with(overrides: &[(&'static str, &str)]) -> AppSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        AppSettings::load_from_iter([OsString::from("instaclone-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);
        assert_eq!(
            settings.bind_addr(),
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
        );
        assert!(settings.database_url().is_none());
        assert!(settings.redis_url().is_none());
        assert_eq!(settings.upload_dir(), PathBuf::from(DEFAULT_UPLOAD_DIR));
        assert_eq!(settings.cookie_name().expect("name"), DEFAULT_COOKIE_NAME);
        assert_eq!(settings.session_ttl().expect("ttl"), DEFAULT_SESSION_TTL);
        assert_eq!(settings.argon2(), Argon2Settings::default());
        assert_eq!(
            settings.public_upload_base().expect("base").as_str(),
            "http://localhost:8080/uploads/"
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("INSTACLONE_HOST", "127.0.0.1"),
            ("INSTACLONE_PORT", "9000"),
            ("INSTACLONE_DATABASE_URL", "postgres://db/instaclone"),
            ("INSTACLONE_REDIS_URL", "redis://cache:6379"),
            ("INSTACLONE_COOKIE_NAME", "sid"),
            ("INSTACLONE_SESSION_TTL_SECONDS", "3600"),
            ("INSTACLONE_ARGON2_ITERATIONS", "3"),
        ]);
        assert_eq!(
            settings.bind_addr(),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.database_url(), Some("postgres://db/instaclone"));
        assert_eq!(settings.redis_url(), Some("redis://cache:6379"));
        assert_eq!(settings.cookie_name().expect("name"), "sid");
        assert_eq!(
            settings.session_ttl().expect("ttl"),
            Duration::from_secs(3600)
        );
        assert_eq!(settings.argon2().iterations, 3);
    }

    #[rstest]
    fn default_upload_base_follows_the_port() {
        let settings = load_with(&[("INSTACLONE_PORT", "9100")]);
        assert_eq!(
            settings.public_upload_base().expect("base").as_str(),
            "http://localhost:9100/uploads/"
        );
    }

    #[rstest]
    fn explicit_upload_base_wins() {
        let settings = load_with(&[
            ("INSTACLONE_PORT", "9100"),
            ("INSTACLONE_PUBLIC_UPLOAD_BASE", "https://cdn.example.com/u/"),
        ]);
        assert_eq!(
            settings.public_upload_base().expect("base").as_str(),
            "https://cdn.example.com/u/"
        );
    }

    #[rstest]
    fn blank_urls_select_in_memory_adapters() {
        let settings = load_with(&[
            ("INSTACLONE_DATABASE_URL", "  "),
            ("INSTACLONE_REDIS_URL", ""),
        ]);
        assert!(settings.database_url().is_none());
        assert!(settings.redis_url().is_none());
    }

    #[rstest]
    #[case(&[("INSTACLONE_SESSION_TTL_SECONDS", "0")])]
    #[case(&[("INSTACLONE_COOKIE_NAME", " ")])]
    #[case(&[("INSTACLONE_PUBLIC_UPLOAD_BASE", "not a url")])]
    fn invalid_values_are_reported(#[case] overrides: &[(&'static str, &str)]) {
        let settings = load_with(overrides);
        let failed = settings.session_ttl().is_err()
            || settings.cookie_name().is_err()
            || settings.public_upload_base().is_err();
        assert!(failed, "expected a settings error for {overrides:?}");
    }
}
