use std::fmt;

use crate::error::AlgorithmError;
use crate::keys::{Key, PrivateKey};

/// Core algorithm trait that all BWT authentication algorithms implement
///
/// An algorithm is stateless. It binds the token context (the `BWT_<NAME>`
/// prefix) and the encoded claims body into a tag, and checks such a tag.
/// Different algorithm families (HMAC, EdDSA, application-defined) implement
/// this trait and are made available to parsers through an
/// [`AlgorithmRegistry`](super::AlgorithmRegistry).
pub trait Algorithm: Send + Sync {
    /// The algorithm identifier (e.g., "HS256", "EDDSA")
    fn name(&self) -> &str;

    /// Compute the authentication tag over `context ‖ body`
    fn auth(&self, context: &str, body: &[u8], key: &PrivateKey)
        -> Result<Vec<u8>, AlgorithmError>;

    /// Check an authentication tag over `context ‖ body`
    ///
    /// # Arguments
    /// * `context` - The token prefix (`BWT_<NAME>`)
    /// * `body` - The encoded claims bytes
    /// * `key` - The key to use for verification
    /// * `tag` - The raw tag bytes
    fn verify(
        &self,
        context: &str,
        body: &[u8],
        key: &Key,
        tag: &[u8],
    ) -> Result<(), AlgorithmError>;
}

impl fmt::Debug for dyn Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Algorithm").field(&self.name()).finish()
    }
}

/// Type alias for shared algorithm trait objects
pub type SharedAlgorithm = std::sync::Arc<dyn Algorithm>;
