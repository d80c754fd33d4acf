//! Claims carried by a token
//!
//! [`Claims`] is the accessor contract the validator works against.
//! [`RegisteredClaims`] is a fixed record of the well-known claims and
//! [`ClaimsMap`] is an open map where the well-known keys are interpreted by
//! convention next to any application-specific keys.

mod map;
mod registered;
pub mod validator;

pub use map::ClaimsMap;
pub use registered::RegisteredClaims;
pub use validator::{
    Clock, ExpectedClaim, Requirement, Rule, SystemClock, ValidationConfig, ValidationContext,
    Validator, ValidatorBuilder,
};

use crate::error::ClaimError;

/// Key identifier (`kid`)
pub const KEY_ID: &str = "kid";
/// Expiration time (`exp`)
pub const EXPIRATION_TIME: &str = "exp";
/// Issued at (`iat`)
pub const ISSUED_AT: &str = "iat";
/// Not before (`nbf`)
pub const NOT_BEFORE: &str = "nbf";
/// Issuer (`iss`)
pub const ISSUER: &str = "iss";
/// Subject (`sub`)
pub const SUBJECT: &str = "sub";
/// Audience (`aud`)
pub const AUDIENCE: &str = "aud";

/// Outcome of reading a claim
///
/// `Ok(None)` means the claim is absent, `Err(ClaimError::WrongType)` means it
/// is present with a shape the accessor cannot interpret.
pub type ClaimResult<T> = std::result::Result<Option<T>, ClaimError>;

/// Accessors for the well-known claims
///
/// Times are Unix timestamps in seconds.
pub trait Claims {
    /// Key identifier (kid) - names the key a verifier should use
    fn key_id(&self) -> ClaimResult<&str>;
    /// Expiration Time (exp) - the token must not be accepted at or after this time
    fn expiration_time(&self) -> ClaimResult<i64>;
    /// Issued At (iat) - the time at which the token was issued
    fn issued_at(&self) -> ClaimResult<i64>;
    /// Not Before (nbf) - the token must not be accepted before this time
    fn not_before(&self) -> ClaimResult<i64>;
    /// Issuer (iss) - the principal that issued the token
    fn issuer(&self) -> ClaimResult<&str>;
    /// Subject (sub) - the principal that is the subject of the token
    fn subject(&self) -> ClaimResult<&str>;
    /// Audience (aud) - the recipients the token is intended for
    fn audience(&self) -> ClaimResult<Vec<&str>>;

    /// Application-specific self check, run by the [`Validator`] after its rules
    fn validate(&self) -> Result<(), ClaimError> {
        Ok(())
    }
}
