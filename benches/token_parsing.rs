//! Token parsing performance benchmarks
//!
//! Benchmarks authentication and the parsing pipeline with different claims
//! sizes and algorithms.

use std::sync::Arc;

use bwt::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const SECRET: &[u8] = b"test-secret-key";
const SEED: [u8; 32] = [11u8; 32];

/// Helpers to generate test tokens of different sizes
mod helpers {
    use super::*;

    pub fn claims_with_size(payload_size: usize) -> ClaimsMap {
        let claims = ClaimsMap::new()
            .with("sub", "user123")
            .with("iss", "https://example.com")
            .with("iat", 1_516_239_022)
            .with("exp", 9_999_999_999i64);
        let extra = payload_size.saturating_sub(64);
        if extra > 0 {
            claims.with("data", "x".repeat(extra))
        } else {
            claims
        }
    }

    pub fn hs256_token(payload_size: usize) -> String {
        Token::new(Arc::new(HS256), claims_with_size(payload_size))
            .authenticate(&PrivateKey::symmetric(SECRET.to_vec()))
            .unwrap()
    }

    pub fn eddsa_token(payload_size: usize) -> String {
        Token::new(Arc::new(EdDSA), claims_with_size(payload_size))
            .authenticate(&PrivateKey::ed25519(SEED))
            .unwrap()
    }
}

fn bench_parsing_by_size(c: &mut Criterion) {
    let parser = Parser::default();
    let key = Key::symmetric(SECRET.to_vec());

    let mut group = c.benchmark_group("parse_by_size");
    for size in [64, 256, 1024, 4096, 16384] {
        let token = helpers::hs256_token(size);
        group.throughput(Throughput::Bytes(token.len() as u64));
        group.bench_function(format!("size_{size}"), |b| {
            b.iter(|| parser.parse(black_box(&token), Some(&key)))
        });
    }
    group.finish();
}

fn bench_parsing_stages(c: &mut Criterion) {
    let registry = AlgorithmRegistry::with_builtin();
    let token = helpers::hs256_token(256);
    let key = Key::symmetric(SECRET.to_vec());

    let mut group = c.benchmark_group("parse_stages");

    group.bench_function("decode_unverified", |b| {
        b.iter(|| RawToken::decode_unverified(black_box(&token)))
    });

    group.bench_function("parse_unverified", |b| {
        b.iter(|| Token::<ClaimsMap>::parse_unverified(black_box(&token), &registry))
    });

    let typed = Parser::default().without_validation();
    group.bench_function("verify_registered_claims", |b| {
        b.iter(|| typed.parse_with_claims::<RegisteredClaims>(black_box(&token), Some(&key)))
    });

    let validating = Parser::default().with_validator(
        Validator::builder()
            .leeway(60)
            .expiration(true)
            .issued_at(true)
            .issuer(true, "https://example.com")
            .subject(true, "user123")
            .build(),
    );
    group.bench_function("verify_and_validate", |b| {
        b.iter(|| validating.parse(black_box(&token), Some(&key)))
    });

    group.finish();
}

fn bench_algorithms(c: &mut Criterion) {
    let parser = Parser::default();
    let mut group = c.benchmark_group("algorithms");

    let hs256 = helpers::hs256_token(256);
    let hmac_key = Key::symmetric(SECRET.to_vec());
    group.bench_function("HS256_parse", |b| {
        b.iter(|| parser.parse(black_box(&hs256), Some(&hmac_key)))
    });

    let eddsa = helpers::eddsa_token(256);
    let eddsa_key = Key::ed25519(EdDSA::public_key(&SEED).unwrap());
    group.bench_function("EDDSA_parse", |b| {
        b.iter(|| parser.parse(black_box(&eddsa), Some(&eddsa_key)))
    });

    let claims = helpers::claims_with_size(256);
    group.bench_function("HS256_authenticate", |b| {
        let key = PrivateKey::symmetric(SECRET.to_vec());
        b.iter(|| Token::new(Arc::new(HS256), black_box(claims.clone())).authenticate(&key))
    });
    group.bench_function("EDDSA_authenticate", |b| {
        let key = PrivateKey::ed25519(SEED);
        b.iter(|| Token::new(Arc::new(EdDSA), black_box(claims.clone())).authenticate(&key))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing_by_size,
    bench_parsing_stages,
    bench_algorithms
);
criterion_main!(benches);
