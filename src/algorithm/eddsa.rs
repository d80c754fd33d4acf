//! Signature algorithm (pure Ed25519)

use crate::algorithm::Algorithm;
use crate::error::AlgorithmError;
use crate::keys::{Key, PrivateKey};

use ed25519_dalek::{
    Signature, Signer, SigningKey, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};

const NAME: &str = "EDDSA";

/// EDDSA algorithm (Ed25519)
///
/// Expects [`PrivateKey::Ed25519`] holding the 32-byte secret seed for
/// authentication and [`Key::Ed25519`] holding the 32-byte public key for
/// verification. The message is `context ‖ body` with no pre-hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdDSA;

impl EdDSA {
    /// Derive the raw public key for a secret seed
    pub fn public_key(seed: &[u8]) -> Result<[u8; PUBLIC_KEY_LENGTH], AlgorithmError> {
        Ok(signing_key(seed)?.verifying_key().to_bytes())
    }
}

impl Algorithm for EdDSA {
    fn name(&self) -> &str {
        NAME
    }

    fn auth(
        &self,
        context: &str,
        body: &[u8],
        key: &PrivateKey,
    ) -> Result<Vec<u8>, AlgorithmError> {
        let signing_key = signing_key(key.as_ed25519(NAME)?)?;
        let signature = signing_key.sign(&message(context, body));
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(
        &self,
        context: &str,
        body: &[u8],
        key: &Key,
        tag: &[u8],
    ) -> Result<(), AlgorithmError> {
        let public_key = key.as_ed25519(NAME)?;
        let public_key: &[u8; PUBLIC_KEY_LENGTH] =
            public_key.try_into().map_err(|_| invalid_key(format!(
                "expected {PUBLIC_KEY_LENGTH} public key bytes, got {}",
                public_key.len()
            )))?;
        let verifying_key =
            VerifyingKey::from_bytes(public_key).map_err(|e| invalid_key(e.to_string()))?;

        let tag: &[u8; SIGNATURE_LENGTH] =
            tag.try_into().map_err(|_| AlgorithmError::TagInvalid {
                expected: SIGNATURE_LENGTH,
                actual: tag.len(),
            })?;
        let signature = Signature::from_bytes(tag);

        verifying_key
            .verify(&message(context, body), &signature)
            .map_err(|_| AlgorithmError::WrongTag)
    }
}

fn signing_key(seed: &[u8]) -> Result<SigningKey, AlgorithmError> {
    let seed: &[u8; SECRET_KEY_LENGTH] = seed.try_into().map_err(|_| {
        invalid_key(format!(
            "expected {SECRET_KEY_LENGTH} secret key bytes, got {}",
            seed.len()
        ))
    })?;
    Ok(SigningKey::from_bytes(seed))
}

fn message(context: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(context.len() + body.len());
    message.extend_from_slice(context.as_bytes());
    message.extend_from_slice(body);
    message
}

fn invalid_key(reason: String) -> AlgorithmError {
    AlgorithmError::InvalidKey {
        algorithm: NAME.to_string(),
        reason,
    }
}
