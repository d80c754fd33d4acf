mod registry;
mod traits;

pub mod eddsa;
pub mod hmac;

pub use eddsa::EdDSA;
pub use hmac::{HS256, HS384, HS512};
pub use registry::AlgorithmRegistry;
pub use traits::{Algorithm, SharedAlgorithm};

use crate::utils::base64url;

use sha3::{Digest, Sha3_256};

/// Compute the key identifier for an algorithm and its public key material
///
/// The identifier is `base64url(SHA3-256(alg ‖ key))`. It tells a verifier
/// which key to fetch and is not secret.
pub fn key_id(algorithm: &str, public_key_material: &[u8]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(algorithm.as_bytes());
    hasher.update(public_key_material);
    base64url::encode_bytes(hasher.finalize())
}
