//! Parse, verify and validate tokens
//!
//! [`Parser`] runs the receiving side of the pipeline:
//!
//! 1. Split the token, resolve its algorithm from the registry and decode the
//!    claims ([`Token::parse_unverified`])
//! 2. Decode the tag
//! 3. Ask the [`KeyResolver`] for the verification key; it sees the decoded
//!    but unverified token, so it can pick a key by `kid`
//! 4. Verify the tag over the prefix and the claims bytes as received
//! 5. Run the [`Validator`], if one is configured
//!
//! Each stage maps its failure to one [`Error`] variant that wraps the cause.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::algorithm::AlgorithmRegistry;
use crate::claims::{Claims, ClaimsMap, Validator};
use crate::error::{BoxError, Error, FormatError, Result, UnverifiableError};
use crate::keys::Key;
use crate::limits::MAX_TOKEN_LENGTH;
use crate::token::Token;

/// Supplies the verification key for a decoded, not yet verified token
///
/// Implemented for closures `Fn(&Token<C>) -> Result<Key, BoxError>` and for
/// [`Key`] itself, which resolves to a clone of that key for every token.
pub trait KeyResolver<C> {
    fn resolve(&self, token: &Token<C>) -> std::result::Result<Key, BoxError>;
}

impl<C, F> KeyResolver<C> for F
where
    F: Fn(&Token<C>) -> std::result::Result<Key, BoxError>,
{
    fn resolve(&self, token: &Token<C>) -> std::result::Result<Key, BoxError> {
        self(token)
    }
}

impl<C> KeyResolver<C> for Key {
    fn resolve(&self, _token: &Token<C>) -> std::result::Result<Key, BoxError> {
        Ok(self.clone())
    }
}

/// Token parser
///
/// Holds the algorithm registry it resolves names against and the validator
/// it runs on verified claims. A parser is immutable; share it freely.
///
/// # Example
///
/// ```ignore
/// use bwt::{Key, Parser};
///
/// let parser = Parser::default();
/// let token = parser.parse(&wire, Some(&Key::symmetric(b"secret".to_vec())))?;
/// println!("subject: {:?}", token.claims().get_str("sub")?);
/// ```
#[derive(Clone)]
pub struct Parser {
    registry: Arc<AlgorithmRegistry>,
    validator: Option<Validator>,
    max_token_length: usize,
}

impl Default for Parser {
    /// Parser over the built-in algorithms with a default [`Validator`]
    fn default() -> Self {
        Self::new(Arc::new(AlgorithmRegistry::with_builtin()))
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("registry", &self.registry)
            .field("validator", &self.validator)
            .field("max_token_length", &self.max_token_length)
            .finish()
    }
}

impl Parser {
    /// Create a parser over `registry` with a default [`Validator`]
    pub fn new(registry: Arc<AlgorithmRegistry>) -> Self {
        Self {
            registry,
            validator: Some(Validator::default()),
            max_token_length: MAX_TOKEN_LENGTH,
        }
    }

    /// Validate claims with `validator`
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Skip claims validation entirely, including the claims' self check
    pub fn without_validation(mut self) -> Self {
        self.validator = None;
        self
    }

    /// Reject tokens longer than `max` bytes
    ///
    /// The limit can only be lowered below the built-in maximum of 64KB.
    pub fn max_token_length(mut self, max: usize) -> Self {
        self.max_token_length = max.min(MAX_TOKEN_LENGTH);
        self
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Parse into a [`ClaimsMap`]
    pub fn parse(
        &self,
        token: &str,
        resolver: Option<&dyn KeyResolver<ClaimsMap>>,
    ) -> Result<Token<ClaimsMap>> {
        self.parse_with_claims(token, resolver)
    }

    /// Parse, verify and validate a token with claims of type `C`
    ///
    /// # Errors
    ///
    /// - [`Error::TokenMalformed`] - the token is not in the wire format, or
    ///   its claims or tag do not decode
    /// - [`Error::TokenUnverifiable`] - unknown algorithm, no resolver, or the
    ///   resolver failed
    /// - [`Error::TokenTagInvalid`] - the key or tag was rejected by the
    ///   algorithm
    /// - [`Error::TokenInvalidClaims`] - one or more validation rules failed
    pub fn parse_with_claims<C>(
        &self,
        token: &str,
        resolver: Option<&dyn KeyResolver<C>>,
    ) -> Result<Token<C>>
    where
        C: DeserializeOwned + Claims,
    {
        if token.len() > self.max_token_length {
            return Err(FormatError::TooLarge {
                size: token.len(),
                max: self.max_token_length,
            }
            .into());
        }

        let (mut parsed, raw) = Token::<C>::parse_unverified(token, &self.registry)?;
        parsed.set_tag(raw.tag()?);

        let Some(resolver) = resolver else {
            debug!("no key resolver provided");
            return Err(UnverifiableError::NoKeyResolver.into());
        };
        let key = resolver.resolve(&parsed).map_err(|err| {
            debug!(error = %err, "key resolution failed");
            UnverifiableError::KeyResolution(err)
        })?;

        parsed
            .algorithm()
            .verify(&parsed.prefix(), raw.body(), &key, parsed.tag())
            .map_err(|err| {
                debug!(
                    algorithm = %parsed.algorithm().name(),
                    error = %err,
                    "tag verification failed"
                );
                Error::TokenTagInvalid(err)
            })?;
        trace!(algorithm = %parsed.algorithm().name(), "tag verified");

        if let Some(validator) = &self.validator {
            validator
                .validate(parsed.claims())
                .map_err(Error::TokenInvalidClaims)?;
        }

        Ok(parsed)
    }
}
