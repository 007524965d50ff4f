//! Non-secret identifier for the active cookie signing key.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Lowercase hex of the first eight bytes of SHA-256 over the signing key.
///
/// Logged at startup so operators can tell which key a replica loaded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use backend::inbound::http::session_config::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::generate());
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_material_gives_same_fingerprint() {
        let first = Key::derive_from(&[b'k'; 64]);
        let second = Key::derive_from(&[b'k'; 64]);
        assert_eq!(key_fingerprint(&first), key_fingerprint(&second));
    }

    #[rstest]
    fn fingerprint_is_short_lowercase_hex() {
        let fingerprint = key_fingerprint(&Key::generate());
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(
            fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[rstest]
    fn distinct_keys_are_distinguishable() {
        let first = Key::derive_from(&[b'a'; 64]);
        let second = Key::derive_from(&[b'b'; 64]);
        assert_ne!(key_fingerprint(&first), key_fingerprint(&second));
    }
}
