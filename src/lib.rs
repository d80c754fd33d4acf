//! # bwt - Binary Web Tokens
//!
//! > Compact, authenticated claim tokens with a MessagePack payload.
//!
//! A BWT carries a set of claims between two parties, like a signed web token,
//! but encodes the claims as a MessagePack map instead of JSON and leaves the
//! authentication algorithm pluggable.
//!
//! ## Wire Format
//!
//! ```text
//! BWT_<ALG>.<base64url(msgpack(claims))>.<base64url(tag)>
//! ```
//!
//! The tag is computed by the algorithm over the prefix (`BWT_<ALG>`) followed
//! by the raw claims bytes. Base64url is used without padding.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bwt::*;
//!
//! // Issue
//! let claims = ClaimsMap::new()
//!     .with("sub", "user123")
//!     .with("exp", now + 3600);
//! let wire = Token::new(Arc::new(HS256), claims)
//!     .authenticate(&PrivateKey::symmetric(b"secret".to_vec()))?;
//!
//! // Verify
//! let parser = Parser::default().with_validator(
//!     Validator::builder().leeway(30).expiration(true).build(),
//! );
//! let token = parser.parse(&wire, Some(&Key::symmetric(b"secret".to_vec())))?;
//! assert_eq!(token.claims().subject()?, Some("user123"));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! wire string
//!     │ split, resolve algorithm, decode claims      -> TokenMalformed / TokenUnverifiable
//!     ▼
//! Token<C> (unverified)
//!     │ KeyResolver::resolve                         -> TokenUnverifiable
//!     ▼
//! Key
//!     │ Algorithm::verify(prefix, claims bytes, tag) -> TokenTagInvalid
//!     ▼
//! Token<C> (verified)
//!     │ Validator::validate                          -> TokenInvalidClaims
//!     ▼
//! Token<C>
//! ```
//!
//! ## Algorithms
//!
//! Algorithms are looked up by case-insensitive name in an explicit
//! [`AlgorithmRegistry`] owned by the [`Parser`]:
//!
//! - **HMAC over SHA-3**: `HS256`, `HS384`, `HS512` (symmetric secret)
//! - **Ed25519**: `EDDSA` (32-byte seed / 32-byte public key)
//!
//! Applications add their own algorithms by implementing [`Algorithm`] and
//! registering them; [`Key::Custom`] and [`PrivateKey::Custom`] carry their
//! key material.
//!
//! ## Claims
//!
//! Claims are any serde type implementing [`Claims`]. [`RegisteredClaims`] is a
//! fixed record of the well-known claims, [`ClaimsMap`] an open map. Claim
//! accessors tell an absent claim (`Ok(None)`) apart from one with the wrong
//! type (`Err(ClaimError::WrongType)`).
//!
//! ## Validation
//!
//! A [`Validator`] runs every configured rule and reports all failures at once
//! in [`ValidationErrors`]. Build one with [`Validator::builder`] or from a
//! deserialized [`ValidationConfig`]:
//!
//! ```ignore
//! let config: ValidationConfig = serde_json::from_str(r#"{
//!     "leeway": 30,
//!     "expiration": "required",
//!     "issuer": { "value": "https://auth.example.com", "required": true }
//! }"#)?;
//! let parser = Parser::default().with_validator(Validator::from_config(&config));
//! ```
//!
//! ## Logging
//!
//! Pipeline stages and registry changes emit `tracing` events at `debug` and
//! `trace` level. Key material and tag bytes are never logged.

// Core modules
pub mod error;
pub mod utils;

mod limits;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;

// Token types
pub mod token;

// Parser (main public API)
pub mod parser;

// ============================================================================
// PUBLIC API
// ============================================================================

// Issuing and parsing
pub use parser::{KeyResolver, Parser};
pub use token::{RawToken, Token};

// Algorithms and keys
pub use algorithm::{
    key_id, Algorithm, AlgorithmRegistry, EdDSA, SharedAlgorithm, HS256, HS384, HS512,
};
pub use keys::{Key, PrivateKey, SymmetricKey};

// Claims and validation
pub use claims::{
    ClaimResult, Claims, ClaimsMap, RegisteredClaims, ValidationConfig, ValidationContext,
    Validator, ValidatorBuilder,
};

// Errors
pub use error::{
    AlgorithmError, BoxError, ClaimError, Error, ErrorKind, FormatError, Result,
    UnverifiableError, ValidationErrors,
};
