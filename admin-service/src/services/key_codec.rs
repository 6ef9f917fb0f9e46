//! API-key secret generation, hashing and header extraction.
//!
//! Secrets look like `crs_<32 lowercase hex chars>`: 128 bits from the OS
//! CSPRNG behind a fixed tag that makes leaked keys easy to recognise. Only
//! the SHA-256 hex digest of a secret is ever stored.

use axum::http::{header, HeaderMap};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Literal tag every generated secret starts with.
pub const SECRET_PREFIX: &str = "crs_";

/// Number of random bytes behind the prefix.
pub const SECRET_RANDOM_BYTES: usize = 16;

/// Dedicated API-key header, checked before `Authorization`.
pub const API_KEY_HEADER: &str = "x-api-key";

const BEARER_PREFIX: &str = "Bearer ";

/// Generate a fresh plaintext secret.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_RANDOM_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", SECRET_PREFIX, hex::encode(bytes))
}

/// Deterministic lookup digest of a secret (SHA-256, lowercase hex).
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Pull a candidate credential out of the request headers.
///
/// `X-API-Key` wins over `Authorization: Bearer`. The value is not checked
/// for well-formedness; empty or non-UTF-8 values count as absent.
pub fn extract_credential(headers: &HeaderMap) -> Option<&str> {
    let from_api_key_header = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    if from_api_key_header.is_some() {
        return from_api_key_header;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::collections::HashSet;

    fn is_well_formed(secret: &str) -> bool {
        secret
            .strip_prefix(SECRET_PREFIX)
            .is_some_and(|rest| {
                rest.len() == SECRET_RANDOM_BYTES * 2
                    && rest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
            })
    }

    #[test]
    fn generated_secrets_have_the_expected_shape() {
        for _ in 0..100 {
            let secret = generate_secret();
            assert!(is_well_formed(&secret), "malformed secret: {}", secret);
        }
    }

    #[test]
    fn generated_secrets_do_not_repeat() {
        let secrets: HashSet<String> = (0..10_000).map(|_| generate_secret()).collect();
        assert_eq!(secrets.len(), 10_000);
    }

    #[test]
    fn hashing_is_deterministic_and_hex_encoded() {
        let secret = generate_secret();
        let digest = hash_secret(&secret);
        assert_eq!(digest, hash_secret(&secret));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, hash_secret(&generate_secret()));
    }

    #[test]
    fn hashing_matches_known_sha256_vector() {
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn api_key_header_takes_priority_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));
        assert_eq!(extract_credential(&headers), Some("from-header"));
    }

    #[test]
    fn bearer_token_is_used_when_api_key_header_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer crs_abc"));
        assert_eq!(extract_credential(&headers), Some("crs_abc"));
    }

    #[test]
    fn non_bearer_schemes_and_empty_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_credential(&headers), None);

        headers.insert(API_KEY_HEADER, HeaderValue::from_static(""));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_credential(&headers), None);

        assert_eq!(extract_credential(&HeaderMap::new()), None);
    }

    #[test]
    fn empty_api_key_header_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static(""));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer crs_fallback"));
        assert_eq!(extract_credential(&headers), Some("crs_fallback"));
    }
}
