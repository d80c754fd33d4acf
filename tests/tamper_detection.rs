//! Tests verifying that modified tokens are rejected
//!
//! Any change to the prefix, the claims bytes or the tag must make
//! verification fail, and key confusion between algorithm families must be
//! reported as a key error rather than accepted.

use std::sync::Arc;

use bwt::utils::base64url;
use bwt::*;

const SECRET: &[u8] = b"tamper-test-secret";
const SEED: [u8; 32] = [3u8; 32];

fn hs256_token() -> String {
    Token::new(
        Arc::new(HS256),
        ClaimsMap::new().with("sub", "user123").with("admin", false),
    )
    .authenticate(&PrivateKey::symmetric(SECRET.to_vec()))
    .unwrap()
}

fn eddsa_token() -> String {
    Token::new(Arc::new(EdDSA), ClaimsMap::new().with("sub", "user123"))
        .authenticate(&PrivateKey::ed25519(SEED))
        .unwrap()
}

fn hmac_key() -> Key {
    Key::symmetric(SECRET.to_vec())
}

fn eddsa_key() -> Key {
    Key::ed25519(EdDSA::public_key(&SEED).unwrap())
}

fn parts(token: &str) -> (String, String, String) {
    let mut it = token.split('.').map(str::to_string);
    (it.next().unwrap(), it.next().unwrap(), it.next().unwrap())
}

// ============================================================================
// Claims tampering
// ============================================================================

#[test]
fn test_modified_claims_are_rejected() {
    for (token, key) in [(hs256_token(), hmac_key()), (eddsa_token(), eddsa_key())] {
        let (prefix, _, tag) = parts(&token);
        let forged = rmp_serde::to_vec_named(&ClaimsMap::new().with("sub", "admin")).unwrap();
        let forged = format!("{prefix}.{}.{tag}", base64url::encode_bytes(forged));

        let err = Parser::default().parse(&forged, Some(&key)).unwrap_err();
        assert!(
            matches!(err, Error::TokenTagInvalid(AlgorithmError::WrongTag)),
            "{err:?}"
        );
    }
}

#[test]
fn test_every_flipped_claims_byte_is_detected() {
    let token = hs256_token();
    let (prefix, body, tag) = parts(&token);
    let body = base64url::decode_bytes(&body).unwrap();

    for i in 0..body.len() {
        let mut forged = body.clone();
        forged[i] ^= 0x01;
        let forged = format!("{prefix}.{}.{tag}", base64url::encode_bytes(forged));

        // either the claims no longer decode or the tag no longer matches
        let err = Parser::default()
            .parse(&forged, Some(&hmac_key()))
            .unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::WrongTag | ErrorKind::Malformed),
            "byte {i}: {err:?}"
        );
    }
}

#[test]
fn test_reencoded_claims_must_match_bytes_on_the_wire() {
    // same claims, different encoding: the tag covers the bytes, not the values
    let token = hs256_token();
    let (prefix, _, tag) = parts(&token);
    let reordered = rmp_serde::to_vec_named(&serde_json::json!({
        "admin": false,
        "sub": "user123",
        "extra": null,
    }))
    .unwrap();
    let forged = format!("{prefix}.{}.{tag}", base64url::encode_bytes(reordered));

    assert!(Parser::default()
        .parse(&forged, Some(&hmac_key()))
        .is_err());
}

// ============================================================================
// Tag tampering
// ============================================================================

#[test]
fn test_modified_tag_is_rejected() {
    for (token, key) in [(hs256_token(), hmac_key()), (eddsa_token(), eddsa_key())] {
        let (prefix, body, tag) = parts(&token);
        let mut tag = base64url::decode_bytes(&tag).unwrap();
        let last = tag.len() - 1;
        tag[last] ^= 0x80;
        let forged = format!("{prefix}.{body}.{}", base64url::encode_bytes(tag));

        let err = Parser::default().parse(&forged, Some(&key)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongTag);
    }
}

#[test]
fn test_truncated_and_extended_tags_are_invalid() {
    for (token, key) in [(hs256_token(), hmac_key()), (eddsa_token(), eddsa_key())] {
        let (prefix, body, tag) = parts(&token);
        let tag = base64url::decode_bytes(&tag).unwrap();

        let short = format!(
            "{prefix}.{body}.{}",
            base64url::encode_bytes(&tag[..tag.len() - 1])
        );
        let mut long = tag.clone();
        long.push(0);
        let long = format!("{prefix}.{body}.{}", base64url::encode_bytes(long));

        for forged in [short, long] {
            let err = Parser::default().parse(&forged, Some(&key)).unwrap_err();
            assert!(
                matches!(err, Error::TokenTagInvalid(AlgorithmError::TagInvalid { .. })),
                "{err:?}"
            );
        }
    }
}

// ============================================================================
// Prefix / algorithm substitution
// ============================================================================

#[test]
fn test_algorithm_substitution_is_rejected() {
    // an HMAC tag relabelled as EdDSA
    let token = hs256_token();
    let forged = token.replacen("BWT_HS256", "BWT_EDDSA", 1);
    let err = Parser::default()
        .parse(&forged, Some(&eddsa_key()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagInvalid);

    // the public key handed to an HMAC verifier as a secret
    let token = eddsa_token();
    let forged = token.replacen("BWT_EDDSA", "BWT_HS512", 1);
    let err = Parser::default()
        .parse(&forged, Some(&eddsa_key()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);
}

#[test]
fn test_key_confusion_is_a_key_error() {
    let err = Parser::default()
        .parse(&hs256_token(), Some(&eddsa_key()))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TokenTagInvalid(AlgorithmError::InvalidKeyType { .. })
    ));

    let err = Parser::default()
        .parse(&eddsa_token(), Some(&hmac_key()))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TokenTagInvalid(AlgorithmError::InvalidKeyType { .. })
    ));
}

#[test]
fn test_wrong_length_ed25519_key() {
    let err = Parser::default()
        .parse(&eddsa_token(), Some(&Key::ed25519(vec![0u8; 31])))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TokenTagInvalid(AlgorithmError::InvalidKey { .. })
    ));

    let err = Token::new(Arc::new(EdDSA), ClaimsMap::new())
        .authenticate(&PrivateKey::ed25519(vec![0u8; 64]))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Authentication(AlgorithmError::InvalidKey { .. })
    ));
}

#[test]
fn test_other_ed25519_key_is_wrong_tag() {
    let other = Key::ed25519(EdDSA::public_key(&[4u8; 32]).unwrap());
    let err = Parser::default()
        .parse(&eddsa_token(), Some(&other))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongTag);
}
