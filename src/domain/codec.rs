use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::domain::access::{self, Principal};

/// A reversible transform applied to report descriptions.
///
/// This obscures a description at rest; it is an encoding, not encryption,
/// and its output must not be treated as secret.
pub trait DescriptionCodec: Send + Sync {
    /// Encode the given text.
    fn encode(&self, text: &str) -> String;

    /// Reverse [`DescriptionCodec::encode`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input was not produced by `encode`.
    fn decode(&self, encoded: &str) -> Result<String, DecodeError>;
}

/// Standard base64 over the UTF-8 bytes of the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl DescriptionCodec for Base64Codec {
    fn encode(&self, text: &str) -> String {
        STANDARD.encode(text.as_bytes())
    }

    fn decode(&self, encoded: &str) -> Result<String, DecodeError> {
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|_| DecodeError::InvalidEncoding)?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// Errors that can occur when reversing the description transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The text is not in the codec's encoded form.
    #[error("text is not validly encoded")]
    InvalidEncoding,
    /// The decoded bytes are not valid UTF-8.
    #[error("decoded text is not valid UTF-8")]
    InvalidUtf8,
}

/// Permission checks and the description transform, behind one handle.
///
/// Defaults to [`Base64Codec`]. Swap the codec with
/// [`SecurityManager::with_codec`].
pub struct SecurityManager {
    codec: Box<dyn DescriptionCodec>,
}

impl SecurityManager {
    /// Create a security manager with the default codec.
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(Base64Codec)
    }

    /// Create a security manager with a custom description codec.
    #[must_use]
    pub fn with_codec(codec: impl DescriptionCodec + 'static) -> Self {
        Self {
            codec: Box::new(codec),
        }
    }

    /// Returns whether the principal may perform the named action.
    ///
    /// See [`access::check_permission`].
    #[must_use]
    pub fn check_permission<P: Principal + ?Sized>(&self, principal: &P, action: &str) -> bool {
        access::check_permission(principal, action)
    }

    /// Apply the description transform.
    #[must_use]
    pub fn encrypt_data(&self, text: &str) -> String {
        self.codec.encode(text)
    }

    /// Reverse the description transform.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if `encoded` is not in the codec's output
    /// format.
    pub fn decrypt_data(&self, encoded: &str) -> Result<String, DecodeError> {
        self.codec.decode(encoded)
    }
}

impl Default for SecurityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecurityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityManager").finish_non_exhaustive()
    }
}
