use std::fmt;

use sha2::{Digest, Sha256};

/// A one-way digest of a password.
///
/// The plaintext is never stored. Two digests are compared by equality, so
/// the digest of a given password is always the same (no salt).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wraps a digest that was computed elsewhere, e.g. loaded from a
    /// provisioning file.
    #[must_use]
    pub const fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    /// The digest rendered as lowercase hexadecimal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// The digest is not secret, but it has no business showing up in logs.
impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Compute the SHA-256 digest of a password.
///
/// The password is hashed as UTF-8 bytes and the result is rendered as 64
/// lowercase hexadecimal characters.
#[must_use]
pub fn hash_password(password: &str) -> PasswordDigest {
    let hash = Sha256::digest(password.as_bytes());
    PasswordDigest(format!("{hash:x}"))
}

/// Check a candidate password against a stored digest.
///
/// A mismatch simply yields `false`.
#[must_use]
pub fn verify_password(password: &str, stored: &PasswordDigest) -> bool {
    hash_password(password) == *stored
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("yulo"; "ascii")]
    #[test_case(""; "empty")]
    #[test_case("pässwörd ✓"; "non ascii")]
    #[test_case("correct horse battery staple"; "with spaces")]
    fn password_verifies_against_its_own_digest(password: &str) {
        let digest = hash_password(password);
        assert!(verify_password(password, &digest));
    }

    #[test]
    fn different_password_does_not_verify() {
        let digest = hash_password("bengbeng");
        assert!(!verify_password("bengbeng ", &digest));
        assert!(!verify_password("BENGBENG", &digest));
    }

    #[test]
    fn digest_is_deterministic_hex() {
        let digest = hash_password("abc");
        assert_eq!(
            digest.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest, hash_password("abc"));
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let digest = hash_password("NoliMeTangere");
        assert_ne!(digest.as_str(), "NoliMeTangere");
        assert_eq!(digest.as_str().len(), 64);
    }

    #[test]
    fn provisioned_digest_compares_equal() {
        let provisioned = PasswordDigest::from_hex(hash_password("yulo").to_string());
        assert!(verify_password("yulo", &provisioned));
    }

    #[test]
    fn debug_output_hides_digest() {
        let digest = hash_password("yulo");
        assert_eq!(format!("{digest:?}"), "PasswordDigest(..)");
    }
}
