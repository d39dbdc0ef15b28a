//! The dictionary key shared by an artifact and its generated source.
use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};

/// Length of a dictionary key in bytes.
pub const KEY_LEN: usize = 32;

/// A 32-byte preset dictionary.
///
/// Externally a key is always written as unpadded standard base64. It is not a
/// secret: it sits verbatim in the generated source next to the artifact it opens.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key([u8; KEY_LEN]);

/// An error decoding a [`Key`] from text.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key is not valid unpadded base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("key must decode to {KEY_LEN} bytes, got {0}")]
    Length(usize),
}

impl Key {
    /// Wraps raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh key from the thread-local CSPRNG.
    ///
    /// # Panics
    /// Panics if the operating system cannot seed the generator.
    #[cfg(feature = "build")]
    #[must_use]
    pub fn generate() -> Self {
        use rand::RngCore;

        let mut bytes = [0; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encodes the key as unpadded standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD_NO_PAD.encode(self.0)
    }

    /// Decodes a key from unpadded standard base64.
    ///
    /// # Errors
    /// Fails on malformed base64 or a decoded length other than [`KEY_LEN`].
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let bytes = STANDARD_NO_PAD.decode(encoded)?;
        let len = bytes.len();
        bytes.try_into().map(Self).map_err(|_| KeyError::Length(len))
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.to_base64()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_is_unpadded() {
        let encoded = Key::from_bytes([0; KEY_LEN]).to_base64();
        assert_eq!(encoded.len(), 43);
        assert!(!encoded.ends_with('='));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let key = Key::from_bytes(std::array::from_fn(|i| i as u8));
        assert_eq!(key.to_base64().parse::<Key>().unwrap(), key);
    }

    #[test]
    fn rejects_padding() {
        let padded = format!("{}=", Key::from_bytes([7; KEY_LEN]));
        assert!(matches!(Key::from_base64(&padded), Err(KeyError::Encoding(_))));
    }

    #[test]
    fn rejects_wrong_length() {
        let short = STANDARD_NO_PAD.encode([1u8; 16]);
        assert!(matches!(Key::from_base64(&short), Err(KeyError::Length(16))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Key::from_base64("not base64!").is_err());
    }

    #[cfg(feature = "build")]
    #[test]
    fn generated_keys_decode_to_32_bytes() {
        for _ in 0..32 {
            let encoded = Key::generate().to_base64();
            let decoded = STANDARD_NO_PAD.decode(&encoded).unwrap();
            assert_eq!(decoded.len(), KEY_LEN);
        }
    }

    #[cfg(feature = "build")]
    #[test]
    fn generated_keys_differ() {
        assert_ne!(Key::generate(), Key::generate());
    }
}
