use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha512};

/// Session tokens are only ever stored hashed.
pub fn hash_token(token: &str) -> String {
    let hashed_token = Sha512::digest(token.as_bytes());
    BASE64_URL_SAFE_NO_PAD.encode(hashed_token)
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

#[test]
fn token_hash_is_deterministic() {
    let token = "UaKN-h7_eD5LlKt8ba4P376G0LGvW3JmccCDMUaPaQk";
    assert_eq!(hash_token(token), hash_token(token));
    assert_ne!(hash_token(token), hash_token("another"));
    // 64 bytes of SHA-512 without padding
    assert_eq!(hash_token(token).len(), 86);
}

#[test]
fn generated_tokens_differ() {
    let a = generate_token();
    let b = generate_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 43);
}
