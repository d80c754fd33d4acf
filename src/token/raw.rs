//! Structural decoding of the wire form, without any registry or key

use serde::de::DeserializeOwned;
use tracing::trace;

use super::token::TYPE;
use crate::error::{FormatError, Result};
use crate::limits::MAX_TOKEN_LENGTH;
use crate::utils::base64url;

/// A token split into its parts, with the claims bytes decoded
///
/// Useful for diagnostics: nothing in it has been checked against a key, and
/// the algorithm name is exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    prefix: String,
    algorithm: String,
    body: Vec<u8>,
    tag: String,
}

impl RawToken {
    /// Split and decode a token without resolving its algorithm
    pub fn decode_unverified(token: &str) -> Result<Self> {
        Ok(split(token)?.decode()?)
    }

    /// The prefix as written, `BWT_<alg>`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The algorithm name as written
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The MessagePack encoded claims
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The still encoded tag part
    pub fn encoded_tag(&self) -> &str {
        &self.tag
    }

    /// Decode the tag part
    pub fn tag(&self) -> Result<Vec<u8>> {
        base64url::decode_bytes(&self.tag)
            .map_err(|source| FormatError::Base64 { part: "tag", source }.into())
    }

    /// Decode the claims into `C`
    pub fn claims<C: DeserializeOwned>(&self) -> Result<C> {
        rmp_serde::from_slice(&self.body).map_err(|e| FormatError::Claims(e).into())
    }
}

/// The three parts of a token, borrowed from the input
pub(crate) struct Parts<'a> {
    pub(crate) prefix: &'a str,
    pub(crate) algorithm: &'a str,
    pub(crate) body: &'a str,
    pub(crate) tag: &'a str,
}

impl Parts<'_> {
    /// Decode the claims part
    pub(crate) fn decode(self) -> std::result::Result<RawToken, FormatError> {
        let body = base64url::decode_bytes(self.body).map_err(|source| FormatError::Base64 {
            part: "claims",
            source,
        })?;

        Ok(RawToken {
            prefix: self.prefix.to_string(),
            algorithm: self.algorithm.to_string(),
            body,
            tag: self.tag.to_string(),
        })
    }
}

/// Split a token into its parts and check the prefix
pub(crate) fn split(token: &str) -> std::result::Result<Parts<'_>, FormatError> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(FormatError::TooLarge {
            size: token.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let mut parts = token.split('.');
    let (Some(prefix), Some(body), Some(tag), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(FormatError::PartCount(token.split('.').count()));
    };

    let algorithm = match prefix.split_once('_') {
        Some((typ, alg)) if typ == TYPE && !alg.is_empty() => alg,
        _ => return Err(FormatError::InvalidPrefix),
    };

    trace!(algorithm = %algorithm, len = token.len(), "split token");
    Ok(Parts {
        prefix,
        algorithm,
        body,
        tag,
    })
}
