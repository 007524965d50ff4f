//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path()
        .to_str()
        .expect("temporary path should be valid UTF-8")
        .to_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

struct ReleaseEnv {
    key: NamedTempFile,
    vars: HashMap<&'static str, String>,
}

impl ReleaseEnv {
    fn with(mut self, name: &'static str, value: &str) -> Self {
        self.vars.insert(name, value.to_owned());
        self
    }

    fn without(mut self, name: &'static str) -> Self {
        self.vars.remove(name);
        self
    }

    fn settings(&self, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
        session_settings_from_env(&mock_env(self.vars.clone()), mode)
    }
}

#[fixture]
fn release_env() -> ReleaseEnv {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let vars = HashMap::from([
        (KEY_FILE_ENV, path_of(&key)),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Lax".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    ReleaseEnv { key, vars }
}

#[rstest]
fn release_accepts_complete_settings(release_env: ReleaseEnv) {
    let settings = release_env
        .settings(BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_each_toggle(release_env: ReleaseEnv, #[case] name: &'static str) {
    let err = release_env
        .without(name)
        .settings(BuildMode::Release)
        .err()
        .expect("missing toggle rejected");
    assert!(matches!(err, SessionConfigError::MissingEnv { name: missing } if missing == name));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_malformed_toggles(
    release_env: ReleaseEnv,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let err = release_env
        .with(name, value)
        .settings(BuildMode::Release)
        .err()
        .expect("malformed toggle rejected");
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: invalid, .. } if invalid == name));
}

#[rstest]
fn release_rejects_insecure_same_site_none(release_env: ReleaseEnv) {
    let err = release_env
        .with(COOKIE_SECURE_ENV, "0")
        .with(SAMESITE_ENV, "None")
        .settings(BuildMode::Release)
        .err()
        .expect("SameSite=None without Secure rejected");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_env: ReleaseEnv) {
    let err = release_env
        .with(ALLOW_EPHEMERAL_ENV, "yes")
        .settings(BuildMode::Release)
        .err()
        .expect("ephemeral key rejected");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_keys(release_env: ReleaseEnv) {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let err = release_env
        .with(KEY_FILE_ENV, &path_of(&short))
        .settings(BuildMode::Release)
        .err()
        .expect("short key rejected");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_unreadable_key(release_env: ReleaseEnv) {
    let err = release_env
        .with(KEY_FILE_ENV, "/nonexistent/instaclone/session_key")
        .settings(BuildMode::Release)
        .err()
        .expect("missing key file rejected");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_defaults_when_nothing_is_set() {
    let settings = session_settings_from_env(
        &mock_env(HashMap::from([(
            KEY_FILE_ENV,
            "/nonexistent/instaclone/session_key".to_owned(),
        )])),
        BuildMode::Debug,
    )
    .expect("debug settings fall back to defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_tolerates_malformed_values(release_env: ReleaseEnv) {
    let settings = release_env
        .with(COOKIE_SECURE_ENV, "perhaps")
        .with(SAMESITE_ENV, "whatever")
        .settings(BuildMode::Debug)
        .expect("debug settings tolerate bad values");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn key_file_drives_signing_key(release_env: ReleaseEnv) {
    let first = release_env
        .settings(BuildMode::Release)
        .expect("settings load");
    let second = release_env
        .settings(BuildMode::Release)
        .expect("settings reload");
    assert_eq!(
        key_fingerprint(&first.key),
        key_fingerprint(&second.key),
        "keys derived from {:?} should match",
        release_env.key.path()
    );
}

#[rstest]
#[case("Y", Some(true))]
#[case(" false ", Some(false))]
#[case("2", None)]
fn bool_parsing(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
