//! Error types for BWT processing
//!
//! Every stage of the pipeline wraps the cause it observed instead of
//! discarding it, so callers can walk [`std::error::Error::source`] down to the
//! specific failure (for example the single validation rule that rejected a
//! token). Use [`Error::kind`] to branch on the failure class.

use std::fmt;

use thiserror::Error;

/// Boxed error returned by key resolvers and custom hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// BWT Errors
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Parsing Errors
    // ============================================================================
    #[error("token is malformed: {0}")]
    TokenMalformed(#[source] FormatError),

    #[error("token is unverifiable: {0}")]
    TokenUnverifiable(#[source] UnverifiableError),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    #[error("token tag is invalid: {0}")]
    TokenTagInvalid(#[source] AlgorithmError),

    #[error("token has invalid claims: {0}")]
    TokenInvalidClaims(#[source] ValidationErrors),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("failed to encode claims: {0}")]
    Encoding(#[source] rmp_serde::encode::Error),

    #[error("failed to authenticate token: {0}")]
    Authentication(#[source] AlgorithmError),

    #[error("authenticated token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },
}

/// Failure class of an [`Error`], flattened across the wrapping layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structural violation of the wire format
    Malformed,
    /// Structurally sound, but no algorithm or key is available to check it
    Unverifiable,
    /// Tag fails the algorithm's structural precondition (length)
    TagInvalid,
    /// Tag is well-formed but does not authenticate the token
    WrongTag,
    /// One or more validation rules failed
    InvalidClaims,
    /// Key fails the algorithm's type or size precondition
    InvalidKey,
    /// Claims could not be serialized into a parseable token
    Encoding,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TokenMalformed(_) => ErrorKind::Malformed,
            Error::TokenUnverifiable(_) => ErrorKind::Unverifiable,
            Error::TokenTagInvalid(err) | Error::Authentication(err) => err.kind(),
            Error::TokenInvalidClaims(_) => ErrorKind::InvalidClaims,
            Error::Encoding(_) | Error::TokenTooLarge { .. } => ErrorKind::Encoding,
        }
    }

    /// Validation failures, if the token was rejected by the validator
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::TokenInvalidClaims(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::TokenMalformed(err)
    }
}

impl From<UnverifiableError> for Error {
    fn from(err: UnverifiableError) -> Self {
        Error::TokenUnverifiable(err)
    }
}

/// Structural problems with a token string
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("token too large: {size} bytes (maximum: {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("expected three parts separated by '.', found {0}")]
    PartCount(usize),

    #[error("invalid prefix: expected 'BWT_<ALGORITHM>'")]
    InvalidPrefix,

    #[error("base64url decoding of the {part} failed: {source}")]
    Base64 {
        part: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("claims decoding failed: {0}")]
    Claims(#[source] rmp_serde::decode::Error),
}

/// Reasons a structurally valid token cannot be checked
#[derive(Error, Debug)]
pub enum UnverifiableError {
    #[error("algorithm '{0}' is not registered")]
    UnknownAlgorithm(String),

    #[error("no key resolver was provided")]
    NoKeyResolver,

    #[error("key resolution failed: {0}")]
    KeyResolution(#[source] BoxError),
}

/// Errors reported by [`Algorithm`](crate::algorithm::Algorithm) implementations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("{algorithm} expects a {expected} key, got {actual}")]
    InvalidKeyType {
        algorithm: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid {algorithm} key: {reason}")]
    InvalidKey { algorithm: String, reason: String },

    #[error("auth tag is invalid: expected {expected} bytes, got {actual}")]
    TagInvalid { expected: usize, actual: usize },

    #[error("auth tag is wrong")]
    WrongTag,
}

impl AlgorithmError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AlgorithmError::InvalidKeyType { .. } | AlgorithmError::InvalidKey { .. } => {
                ErrorKind::InvalidKey
            }
            AlgorithmError::TagInvalid { .. } => ErrorKind::TagInvalid,
            AlgorithmError::WrongTag => ErrorKind::WrongTag,
        }
    }
}

/// A single failed claim check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("token is missing required claim '{0}'")]
    MissingClaim(&'static str),

    #[error("claim '{claim}' has the wrong type: expected {expected}")]
    WrongType {
        claim: String,
        expected: &'static str,
    },

    #[error("token is expired: expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    Expired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("token used before issued: issued at {issued_at} (now: {now}, leeway: {leeway}s)")]
    UsedBeforeIssued {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("token is not valid yet: not before {not_before} (now: {now}, leeway: {leeway}s)")]
    NotValidYet {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("token has invalid audience: expected '{expected}', found {found:?}")]
    InvalidAudience {
        expected: String,
        found: Vec<String>,
    },

    #[error("token has invalid issuer: expected '{expected}', found '{found}'")]
    InvalidIssuer { expected: String, found: String },

    #[error("token has invalid subject: expected '{expected}', found '{found}'")]
    InvalidSubject { expected: String, found: String },

    #[error("{0}")]
    Custom(String),
}

impl ClaimError {
    /// Convenience constructor for custom rule failures
    pub fn custom(message: impl Into<String>) -> Self {
        ClaimError::Custom(message.into())
    }
}

/// Every claim check that failed during one validation, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ClaimError>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: ClaimError) {
        self.errors.push(error);
    }

    /// Whether no check failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed checks
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the failed checks in rule order
    pub fn iter(&self) -> std::slice::Iter<'_, ClaimError> {
        self.errors.iter()
    }

    /// Whether any failed check satisfies the predicate
    pub fn any(&self, predicate: impl Fn(&ClaimError) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }

    /// Consume into the underlying list
    pub fn into_vec(self) -> Vec<ClaimError> {
        self.errors
    }

    pub(crate) fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors
            .first()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ClaimError;
    type IntoIter = std::slice::Iter<'a, ClaimError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ClaimError;
    type IntoIter = std::vec::IntoIter<ClaimError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Result type alias for BWT operations
pub type Result<T> = std::result::Result<T, Error>;
