use serde::{Deserialize, Serialize};

use super::{ClaimResult, Claims};

/// The well-known claims as a fixed record
///
/// Each field is optional and omitted from the encoding when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,

    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,

    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<String>>,
}

impl Claims for RegisteredClaims {
    fn key_id(&self) -> ClaimResult<&str> {
        Ok(self.key_id.as_deref())
    }

    fn expiration_time(&self) -> ClaimResult<i64> {
        Ok(self.expiration_time)
    }

    fn issued_at(&self) -> ClaimResult<i64> {
        Ok(self.issued_at)
    }

    fn not_before(&self) -> ClaimResult<i64> {
        Ok(self.not_before)
    }

    fn issuer(&self) -> ClaimResult<&str> {
        Ok(self.issuer.as_deref())
    }

    fn subject(&self) -> ClaimResult<&str> {
        Ok(self.subject.as_deref())
    }

    fn audience(&self) -> ClaimResult<Vec<&str>> {
        Ok(self
            .audience
            .as_ref()
            .map(|aud| aud.iter().map(String::as_str).collect()))
    }
}
