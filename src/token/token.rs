//! The token model and its wire encoding

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use super::raw::{split, RawToken};
use crate::algorithm::{Algorithm, AlgorithmRegistry, SharedAlgorithm};
use crate::claims::ClaimsMap;
use crate::error::{Error, Result, UnverifiableError};
use crate::keys::PrivateKey;
use crate::limits::MAX_TOKEN_LENGTH;
use crate::utils::base64url;

/// Token type, the first half of every prefix
pub const TYPE: &str = "BWT";

/// A BWT: an algorithm, a set of claims and the tag binding them
///
/// The wire form is `BWT_<ALG>.<claims>.<tag>`, where `<claims>` is the
/// base64url encoded MessagePack map of the claims and `<tag>` the base64url
/// encoded output of the algorithm over the prefix and the claims bytes.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use bwt::{ClaimsMap, PrivateKey, Token, HS256};
///
/// let claims = ClaimsMap::new().with("sub", "user123");
/// let mut token = Token::new(Arc::new(HS256), claims);
/// let wire = token.authenticate(&PrivateKey::symmetric(b"secret".to_vec()))?;
/// assert!(wire.starts_with("BWT_HS256."));
/// ```
pub struct Token<C = ClaimsMap> {
    algorithm: SharedAlgorithm,
    claims: C,
    tag: Vec<u8>,
}

impl<C> Token<C> {
    /// Create an unauthenticated token
    pub fn new(algorithm: SharedAlgorithm, claims: C) -> Self {
        Self {
            algorithm,
            claims,
            tag: Vec::new(),
        }
    }

    /// The algorithm the token is authenticated with
    pub fn algorithm(&self) -> &dyn Algorithm {
        self.algorithm.as_ref()
    }

    /// Shared handle to the algorithm
    pub fn shared_algorithm(&self) -> &SharedAlgorithm {
        &self.algorithm
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    pub fn claims_mut(&mut self) -> &mut C {
        &mut self.claims
    }

    pub fn into_claims(self) -> C {
        self.claims
    }

    /// Raw tag bytes; empty until the token is authenticated or parsed
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    pub(crate) fn set_tag(&mut self, tag: Vec<u8>) {
        self.tag = tag;
    }

    /// The token prefix, `BWT_<ALG>`
    ///
    /// The prefix is the context every tag is computed over.
    pub fn prefix(&self) -> String {
        format!("{TYPE}_{}", self.algorithm.name())
    }
}

impl<C: Serialize> Token<C> {
    /// Encode the claims as a MessagePack map
    pub fn body(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(&self.claims).map_err(Error::Encoding)
    }

    /// Compute the tag and return the wire form of the token
    ///
    /// The tag is stored on the token as well. Fails with
    /// [`Error::TokenTooLarge`] when the wire form would exceed the length a
    /// [`Parser`](crate::Parser) accepts; the token is left untouched then.
    pub fn authenticate(&mut self, key: &PrivateKey) -> Result<String> {
        let body = self.body()?;
        let prefix = self.prefix();

        let tag = self
            .algorithm
            .auth(&prefix, &body, key)
            .map_err(Error::Authentication)?;
        let wire = format!(
            "{prefix}.{}.{}",
            base64url::encode_bytes(&body),
            base64url::encode_bytes(&tag)
        );
        if wire.len() > MAX_TOKEN_LENGTH {
            debug!(
                algorithm = %self.algorithm.name(),
                size = wire.len(),
                "authenticated token exceeds maximum length"
            );
            return Err(Error::TokenTooLarge {
                size: wire.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        trace!(
            algorithm = %self.algorithm.name(),
            body_len = body.len(),
            "authenticated token"
        );
        self.tag = tag;
        Ok(wire)
    }
}

impl<C: DeserializeOwned> Token<C> {
    /// Parse a token without checking its tag
    ///
    /// Resolves the algorithm from `registry` and decodes the claims. The tag
    /// part is left encoded in the returned [`RawToken`]. Never trust claims
    /// obtained this way without verifying the tag.
    pub fn parse_unverified(
        token: &str,
        registry: &AlgorithmRegistry,
    ) -> Result<(Self, RawToken)> {
        let parts = split(token)?;

        let algorithm = registry.get(parts.algorithm).ok_or_else(|| {
            debug!(algorithm = %parts.algorithm, "unknown algorithm");
            UnverifiableError::UnknownAlgorithm(parts.algorithm.to_string())
        })?;

        let raw = parts.decode()?;
        let claims = raw.claims::<C>()?;

        Ok((Self::new(algorithm, claims), raw))
    }
}

impl<C: Clone> Clone for Token<C> {
    fn clone(&self) -> Self {
        Self {
            algorithm: self.algorithm.clone(),
            claims: self.claims.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for Token<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("algorithm", &self.algorithm.name())
            .field("claims", &self.claims)
            .field("tag_len", &self.tag.len())
            .finish()
    }
}
