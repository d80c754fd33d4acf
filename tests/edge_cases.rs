//! Edge case tests for BWT parsing
//!
//! Structural problems must surface as `TokenMalformed`, problems with the
//! algorithm or key as `TokenUnverifiable`, and nothing may panic.

use std::sync::Arc;

use bwt::utils::base64url;
use bwt::*;

const SECRET: &[u8] = b"secret";

fn create_valid_token() -> String {
    Token::new(
        Arc::new(HS256),
        ClaimsMap::new().with("iss", "test").with("sub", "user"),
    )
    .authenticate(&PrivateKey::symmetric(SECRET.to_vec()))
    .unwrap()
}

fn parse(token: &str) -> Result<Token> {
    Parser::default().parse(token, Some(&Key::symmetric(SECRET.to_vec())))
}

fn assert_malformed(token: &str) {
    let result = parse(token);
    assert!(
        matches!(result, Err(Error::TokenMalformed(_))),
        "expected malformed for {token:?}, got {result:?}"
    );
}

// ============================================================================
// Token Format Edge Cases
// ============================================================================

#[test]
fn test_valid_token_parses() {
    assert!(parse(&create_valid_token()).is_ok());
}

#[test]
fn test_empty_token() {
    assert!(matches!(
        parse(""),
        Err(Error::TokenMalformed(FormatError::PartCount(1)))
    ));
}

#[test]
fn test_single_dot() {
    assert!(matches!(
        parse("."),
        Err(Error::TokenMalformed(FormatError::PartCount(2)))
    ));
}

#[test]
fn test_two_parts() {
    assert_malformed("BWT_HS256.gA");
}

#[test]
fn test_four_parts() {
    let token = format!("{}.extra", create_valid_token());
    assert!(matches!(
        parse(&token),
        Err(Error::TokenMalformed(FormatError::PartCount(4)))
    ));
}

#[test]
fn test_empty_tag_part() {
    // three parts, the tag decodes to zero bytes and fails the length check
    let valid = create_valid_token();
    let (head, _) = valid.rsplit_once('.').unwrap();
    let err = parse(&format!("{head}.")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagInvalid);
}

// ============================================================================
// Prefix Edge Cases
// ============================================================================

#[test]
fn test_prefix_variants() {
    let valid = create_valid_token();
    let (_, rest) = valid.split_once('.').unwrap();

    for prefix in ["", "BWT", "BWT_", "JWT_HS256", "bwt_HS256", "BWTHS256", " BWT_HS256"] {
        let token = format!("{prefix}.{rest}");
        assert!(
            matches!(
                parse(&token),
                Err(Error::TokenMalformed(FormatError::InvalidPrefix))
            ),
            "prefix {prefix:?} must be rejected"
        );
    }
}

#[test]
fn test_algorithm_name_is_case_insensitive() {
    let valid = create_valid_token();
    let token = valid.replacen("BWT_HS256", "BWT_hs256", 1);
    // the tag binds the canonical prefix, so the lower-case spelling verifies
    assert!(parse(&token).is_ok());
}

#[test]
fn test_long_unknown_algorithm_name() {
    let valid = create_valid_token();
    let (_, rest) = valid.split_once('.').unwrap();
    let token = format!("BWT_{}.{rest}", "A".repeat(1000));
    assert!(matches!(
        parse(&token),
        Err(Error::TokenUnverifiable(UnverifiableError::UnknownAlgorithm(ref name))) if name.len() == 1000
    ));
}

#[test]
fn test_unknown_algorithm() {
    let valid = create_valid_token();
    let token = valid.replacen("BWT_HS256", "BWT_NONE", 1);
    let err = parse(&token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unverifiable);
    assert!(matches!(
        err,
        Error::TokenUnverifiable(UnverifiableError::UnknownAlgorithm(ref name)) if name == "NONE"
    ));
}

// ============================================================================
// Encoding Edge Cases
// ============================================================================

#[test]
fn test_invalid_base64_claims() {
    for claims in ["!!!", "gA==", "g+A", "a"] {
        let token = format!("BWT_HS256.{claims}.AA");
        assert!(
            matches!(
                parse(&token),
                Err(Error::TokenMalformed(FormatError::Base64 { part: "claims", .. }))
            ),
            "claims part {claims:?} must be rejected"
        );
    }
}

#[test]
fn test_invalid_base64_tag() {
    let valid = create_valid_token();
    let (head, _) = valid.rsplit_once('.').unwrap();
    assert!(matches!(
        parse(&format!("{head}.not/base64")),
        Err(Error::TokenMalformed(FormatError::Base64 { part: "tag", .. }))
    ));
}

#[test]
fn test_claims_not_msgpack() {
    let token = format!("BWT_HS256.{}.AA", base64url::encode_bytes([0xc1, 0x00]));
    assert!(matches!(
        parse(&token),
        Err(Error::TokenMalformed(FormatError::Claims(_)))
    ));
}

#[test]
fn test_claims_not_a_map() {
    let body = rmp_serde::to_vec(&vec![1, 2, 3]).unwrap();
    let token = format!("BWT_HS256.{}.AA", base64url::encode_bytes(body));
    assert_malformed(&token);
}

#[test]
fn test_truncated_claims() {
    let body = rmp_serde::to_vec_named(&ClaimsMap::new().with("sub", "user")).unwrap();
    let token = format!(
        "BWT_HS256.{}.AA",
        base64url::encode_bytes(&body[..body.len() - 2])
    );
    assert_malformed(&token);
}

#[test]
fn test_empty_claims_map() {
    let token = Token::new(Arc::new(HS256), ClaimsMap::new())
        .authenticate(&PrivateKey::symmetric(SECRET.to_vec()))
        .unwrap();
    let parsed = parse(&token).unwrap();
    assert!(parsed.claims().is_empty());
}

#[test]
fn test_unicode_claims() {
    let claims = ClaimsMap::new()
        .with("sub", "ユーザー")
        .with("name", "Zoë 🦀");
    let token = Token::new(Arc::new(HS256), claims.clone())
        .authenticate(&PrivateKey::symmetric(SECRET.to_vec()))
        .unwrap();
    assert_eq!(parse(&token).unwrap().claims(), &claims);
}

// ============================================================================
// Size Limits
// ============================================================================

#[test]
fn test_oversized_token() {
    let token = format!("BWT_HS256.{}.AA", "A".repeat(70 * 1024));
    assert!(matches!(
        parse(&token),
        Err(Error::TokenMalformed(FormatError::TooLarge { .. }))
    ));
}

#[test]
fn test_largest_issuable_token_is_parseable() {
    let key = PrivateKey::symmetric(SECRET.to_vec());
    let issue = |size: usize| {
        Token::new(
            Arc::new(HS256),
            ClaimsMap::new().with("data", "x".repeat(size)),
        )
        .authenticate(&key)
    };

    // largest payload authenticate still accepts
    let (mut ok, mut too_big) = (0, 64 * 1024);
    assert!(issue(ok).is_ok());
    assert!(issue(too_big).is_err());
    while too_big - ok > 1 {
        let mid = (ok + too_big) / 2;
        if issue(mid).is_ok() {
            ok = mid;
        } else {
            too_big = mid;
        }
    }

    let token = issue(ok).unwrap();
    let parsed = parse(&token).unwrap();
    assert_eq!(parsed.claims().get_str("data").unwrap().map(str::len), Some(ok));

    let err = issue(too_big).unwrap_err();
    assert!(matches!(err, Error::TokenTooLarge { max, .. } if max == 64 * 1024));
}

#[test]
fn test_raw_decoding_without_registry() {
    let valid = create_valid_token();
    let raw = RawToken::decode_unverified(&valid).unwrap();
    assert_eq!(raw.algorithm(), "HS256");
    assert_eq!(raw.tag().unwrap().len(), 32);

    let claims: ClaimsMap = raw.claims().unwrap();
    assert_eq!(claims.get_str("sub").unwrap(), Some("user"));
}
