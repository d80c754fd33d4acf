//! Claims validation
//!
//! A [`Validator`] is an ordered list of [`Rule`]s plus a leeway window and a
//! [`Clock`]. Every rule runs on every call, so a single validation reports
//! every violated rule at once. The current time is read from the clock at
//! most once per call and shared by all rules through the
//! [`ValidationContext`], which lives only for that call; a `Validator` is
//! immutable and can be shared between threads.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Claims, AUDIENCE, EXPIRATION_TIME, ISSUED_AT, ISSUER, NOT_BEFORE, SUBJECT};
use crate::error::{ClaimError, ValidationErrors};

/// Source of the current Unix time in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now(&self) -> i64 {
        self()
    }
}

/// Per-call validation state handed to every rule
pub struct ValidationContext<'a> {
    clock: &'a dyn Clock,
    leeway: u64,
    now: OnceCell<i64>,
}

impl<'a> ValidationContext<'a> {
    fn new(clock: &'a dyn Clock, leeway: u64) -> Self {
        Self {
            clock,
            leeway,
            now: OnceCell::new(),
        }
    }

    /// Current time; the clock is read on first use only
    pub fn now(&self) -> i64 {
        *self.now.get_or_init(|| self.clock.now())
    }

    /// Leeway in seconds
    pub fn leeway(&self) -> u64 {
        self.leeway
    }

    /// Current time minus the leeway
    pub fn past(&self) -> i64 {
        self.now().saturating_sub(self.leeway_secs())
    }

    /// Current time plus the leeway
    pub fn future(&self) -> i64 {
        self.now().saturating_add(self.leeway_secs())
    }

    fn leeway_secs(&self) -> i64 {
        i64::try_from(self.leeway).unwrap_or(i64::MAX)
    }
}

/// A claim check
pub type Rule =
    Arc<dyn Fn(&ValidationContext<'_>, &dyn Claims) -> Result<(), ClaimError> + Send + Sync>;

/// Validates already decoded claims
#[derive(Clone)]
pub struct Validator {
    leeway: u64,
    clock: Arc<dyn Clock>,
    rules: Vec<Rule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            leeway: 0,
            clock: Arc::new(SystemClock),
            rules: Vec::new(),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("leeway", &self.leeway)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Validator without rules; only the claims' own self check runs
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a validator
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Build the validator described by a configuration
    pub fn from_config(config: &ValidationConfig) -> Self {
        ValidatorBuilder::from_config(config).build()
    }

    /// Leeway in seconds
    pub fn leeway(&self) -> u64 {
        self.leeway
    }

    /// Number of configured rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run every rule, then the claims' self check
    ///
    /// Returns all failures in rule order; the self check comes last.
    pub fn validate(&self, claims: &dyn Claims) -> Result<(), ValidationErrors> {
        let ctx = ValidationContext::new(self.clock.as_ref(), self.leeway);
        let mut errors = ValidationErrors::default();

        for rule in &self.rules {
            if let Err(err) = rule(&ctx, claims) {
                errors.push(err);
            }
        }

        if let Err(err) = claims.validate() {
            errors.push(err);
        }

        if !errors.is_empty() {
            debug!(failures = errors.len(), "claims validation failed");
        }
        errors.into_result()
    }
}

/// Builder for [`Validator`]
#[derive(Default)]
pub struct ValidatorBuilder {
    leeway: u64,
    clock: Option<Arc<dyn Clock>>,
    rules: Vec<Rule>,
}

impl ValidatorBuilder {
    /// Builder preloaded with the rules a configuration describes
    pub fn from_config(config: &ValidationConfig) -> Self {
        let mut builder = Self::default().leeway(config.leeway);

        if let Some(required) = config.expiration.check() {
            builder = builder.expiration(required);
        }
        if let Some(required) = config.issued_at.check() {
            builder = builder.issued_at(required);
        }
        if let Some(required) = config.not_before.check() {
            builder = builder.not_before(required);
        }
        if let Some(aud) = &config.audience {
            builder = builder.audience(aud.required, aud.value.clone());
        }
        if let Some(iss) = &config.issuer {
            builder = builder.issuer(iss.required, iss.value.clone());
        }
        if let Some(sub) = &config.subject {
            builder = builder.subject(sub.required, sub.value.clone());
        }
        builder
    }

    /// Set the leeway window in seconds
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Replace the wall clock
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        self.clock = Some(clock);
        self
    }

    /// Check the expiration time: `now - leeway < exp`
    pub fn expiration(self, required: bool) -> Self {
        self.push(expiration_rule(required))
    }

    /// Check the issued-at time: `iat <= now + leeway`
    pub fn issued_at(self, required: bool) -> Self {
        self.push(issued_at_rule(required))
    }

    /// Check the not-before time: `nbf <= now + leeway`
    pub fn not_before(self, required: bool) -> Self {
        self.push(not_before_rule(required))
    }

    /// Require `audience` among the token's audiences
    pub fn audience(self, required: bool, audience: impl Into<String>) -> Self {
        self.push(audience_rule(required, audience.into()))
    }

    /// Require the issuer to equal `issuer`
    pub fn issuer(self, required: bool, issuer: impl Into<String>) -> Self {
        self.push(issuer_rule(required, issuer.into()))
    }

    /// Require the subject to equal `subject`
    pub fn subject(self, required: bool, subject: impl Into<String>) -> Self {
        self.push(subject_rule(required, subject.into()))
    }

    /// Add a custom rule
    pub fn rule<F>(self, rule: F) -> Self
    where
        F: Fn(&ValidationContext<'_>, &dyn Claims) -> Result<(), ClaimError>
            + Send
            + Sync
            + 'static,
    {
        self.push(rule_fn(rule))
    }

    fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            leeway: self.leeway,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            rules: self.rules,
        }
    }
}

// ============================================================================
// Standard rules
// ============================================================================

fn rule_fn<F>(f: F) -> Rule
where
    F: Fn(&ValidationContext<'_>, &dyn Claims) -> Result<(), ClaimError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Expiration rule
pub fn expiration_rule(required: bool) -> Rule {
    rule_fn(move |ctx, claims| {
        let Some(exp) = claims.expiration_time()? else {
            return missing(required, EXPIRATION_TIME);
        };
        if ctx.past() < exp {
            Ok(())
        } else {
            Err(ClaimError::Expired {
                expired_at: exp,
                now: ctx.now(),
                leeway: ctx.leeway(),
            })
        }
    })
}

/// Issued-at rule
pub fn issued_at_rule(required: bool) -> Rule {
    rule_fn(move |ctx, claims| {
        let Some(iat) = claims.issued_at()? else {
            return missing(required, ISSUED_AT);
        };
        if iat <= ctx.future() {
            Ok(())
        } else {
            Err(ClaimError::UsedBeforeIssued {
                issued_at: iat,
                now: ctx.now(),
                leeway: ctx.leeway(),
            })
        }
    })
}

/// Not-before rule
pub fn not_before_rule(required: bool) -> Rule {
    rule_fn(move |ctx, claims| {
        let Some(nbf) = claims.not_before()? else {
            return missing(required, NOT_BEFORE);
        };
        if nbf <= ctx.future() {
            Ok(())
        } else {
            Err(ClaimError::NotValidYet {
                not_before: nbf,
                now: ctx.now(),
                leeway: ctx.leeway(),
            })
        }
    })
}

/// Audience rule; an audience list of only empty strings counts as absent
pub fn audience_rule(required: bool, expected: String) -> Rule {
    rule_fn(move |_, claims| {
        let aud = claims.audience()?.unwrap_or_default();

        let mut matched = false;
        let mut non_empty = false;
        for a in &aud {
            // every entry is compared
            matched |= constant_time_eq(a.as_bytes(), expected.as_bytes());
            non_empty |= !a.is_empty();
        }

        if !non_empty {
            return missing(required, AUDIENCE);
        }
        if matched {
            Ok(())
        } else {
            Err(ClaimError::InvalidAudience {
                expected: expected.clone(),
                found: aud.iter().map(|a| a.to_string()).collect(),
            })
        }
    })
}

/// Issuer rule
pub fn issuer_rule(required: bool, expected: String) -> Rule {
    rule_fn(move |_, claims| match claims.issuer()? {
        None | Some("") => missing(required, ISSUER),
        Some(iss) if iss == expected => Ok(()),
        Some(iss) => Err(ClaimError::InvalidIssuer {
            expected: expected.clone(),
            found: iss.to_string(),
        }),
    })
}

/// Subject rule
pub fn subject_rule(required: bool, expected: String) -> Rule {
    rule_fn(move |_, claims| match claims.subject()? {
        None | Some("") => missing(required, SUBJECT),
        Some(sub) if sub == expected => Ok(()),
        Some(sub) => Err(ClaimError::InvalidSubject {
            expected: expected.clone(),
            found: sub.to_string(),
        }),
    })
}

fn missing(required: bool, claim: &'static str) -> Result<(), ClaimError> {
    if required {
        Err(ClaimError::MissingClaim(claim))
    } else {
        Ok(())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Whether a time check runs, and whether the claim must be present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// The claim is not checked
    #[default]
    Skip,
    /// The claim is checked when present
    Optional,
    /// The claim must be present and valid
    Required,
}

impl Requirement {
    fn check(self) -> Option<bool> {
        match self {
            Requirement::Skip => None,
            Requirement::Optional => Some(false),
            Requirement::Required => Some(true),
        }
    }
}

/// Expected value for a string claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedClaim {
    pub value: String,
    #[serde(default)]
    pub required: bool,
}

impl ExpectedClaim {
    pub fn required(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            required: true,
        }
    }

    pub fn optional(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            required: false,
        }
    }
}

/// Declarative validator configuration
///
/// ```ignore
/// let config: ValidationConfig = serde_json::from_str(r#"{
///     "leeway": 30,
///     "expiration": "required",
///     "audience": { "value": "api", "required": true }
/// }"#)?;
/// let validator = Validator::from_config(&config);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Leeway window in seconds
    pub leeway: u64,
    pub expiration: Requirement,
    pub issued_at: Requirement,
    pub not_before: Requirement,
    pub audience: Option<ExpectedClaim>,
    pub issuer: Option<ExpectedClaim>,
    pub subject: Option<ExpectedClaim>,
}
