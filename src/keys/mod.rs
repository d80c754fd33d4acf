/// Key types for BWT authentication and verification
///
/// This module provides a type-safe abstraction over the key material the
/// built-in algorithms accept:
/// - Symmetric secrets (for the HMAC algorithms), used on both sides
/// - Ed25519 seeds (authentication) and public keys (verification)
/// - Opaque custom keys for algorithms registered by applications
///
/// Keys only carry bytes; size checks are the algorithm's job so that a
/// wrong-length key surfaces as an algorithm error.
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::AlgorithmError;

/// A key that can be used to verify a token's tag
#[derive(Clone)]
pub enum Key {
    /// Shared secret for HMAC algorithms
    Symmetric(SymmetricKey),

    /// Raw Ed25519 public key bytes
    Ed25519(Vec<u8>),

    /// Key material for a custom algorithm
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an Ed25519 public key from raw bytes
    pub fn ed25519(public_key: impl Into<Vec<u8>>) -> Self {
        Key::Ed25519(public_key.into())
    }

    /// Wrap key material for a custom algorithm
    pub fn custom<T: Any + Send + Sync>(key: T) -> Self {
        Key::Custom(Arc::new(key))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "symmetric",
            Key::Ed25519(_) => "Ed25519 public",
            Key::Custom(_) => "custom",
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self, algorithm: &str) -> Result<&SymmetricKey, AlgorithmError> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(mismatch(algorithm, "symmetric", self.key_type())),
        }
    }

    /// Get as Ed25519 public key bytes or return error
    pub fn as_ed25519(&self, algorithm: &str) -> Result<&[u8], AlgorithmError> {
        match self {
            Key::Ed25519(bytes) => Ok(bytes),
            _ => Err(mismatch(algorithm, "Ed25519 public", self.key_type())),
        }
    }

    /// Downcast custom key material or return error
    pub fn as_custom<T: Any>(&self, algorithm: &str) -> Result<&T, AlgorithmError> {
        match self {
            Key::Custom(key) => key
                .downcast_ref::<T>()
                .ok_or_else(|| mismatch(algorithm, std::any::type_name::<T>(), "custom")),
            _ => Err(mismatch(
                algorithm,
                std::any::type_name::<T>(),
                self.key_type(),
            )),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Symmetric(key) => f.debug_tuple("Symmetric").field(key).finish(),
            Key::Ed25519(bytes) => f.debug_tuple("Ed25519").field(bytes).finish(),
            Key::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A key that can be used to authenticate (sign) a token
#[derive(Clone)]
pub enum PrivateKey {
    /// Shared secret for HMAC algorithms
    Symmetric(SymmetricKey),

    /// Raw Ed25519 secret seed bytes
    Ed25519(Vec<u8>),

    /// Key material for a custom algorithm
    Custom(Arc<dyn Any + Send + Sync>),
}

impl PrivateKey {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        PrivateKey::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an Ed25519 private key from its secret seed
    pub fn ed25519(seed: impl Into<Vec<u8>>) -> Self {
        PrivateKey::Ed25519(seed.into())
    }

    /// Wrap key material for a custom algorithm
    pub fn custom<T: Any + Send + Sync>(key: T) -> Self {
        PrivateKey::Custom(Arc::new(key))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            PrivateKey::Symmetric(_) => "symmetric",
            PrivateKey::Ed25519(_) => "Ed25519 private",
            PrivateKey::Custom(_) => "custom",
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self, algorithm: &str) -> Result<&SymmetricKey, AlgorithmError> {
        match self {
            PrivateKey::Symmetric(key) => Ok(key),
            _ => Err(mismatch(algorithm, "symmetric", self.key_type())),
        }
    }

    /// Get as Ed25519 seed bytes or return error
    pub fn as_ed25519(&self, algorithm: &str) -> Result<&[u8], AlgorithmError> {
        match self {
            PrivateKey::Ed25519(bytes) => Ok(bytes),
            _ => Err(mismatch(algorithm, "Ed25519 private", self.key_type())),
        }
    }

    /// Downcast custom key material or return error
    pub fn as_custom<T: Any>(&self, algorithm: &str) -> Result<&T, AlgorithmError> {
        match self {
            PrivateKey::Custom(key) => key
                .downcast_ref::<T>()
                .ok_or_else(|| mismatch(algorithm, std::any::type_name::<T>(), "custom")),
            _ => Err(mismatch(
                algorithm,
                std::any::type_name::<T>(),
                self.key_type(),
            )),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrivateKey::Symmetric(_) => "PrivateKey::Symmetric(..)",
            PrivateKey::Ed25519(_) => "PrivateKey::Ed25519(..)",
            PrivateKey::Custom(_) => "PrivateKey::Custom(..)",
        })
    }
}

fn mismatch(algorithm: &str, expected: &'static str, actual: &'static str) -> AlgorithmError {
    AlgorithmError::InvalidKeyType {
        algorithm: algorithm.to_string(),
        expected,
        actual,
    }
}

/// Symmetric key for HMAC algorithms
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}
