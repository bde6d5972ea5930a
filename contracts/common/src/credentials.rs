//! Password hashing and random credential generation.
//!
//! Hashes are `SHA-256(salt || password)` with a per-credential 16-byte salt
//! from the host PRNG. Generation helpers must run inside a contract
//! invocation because they draw from the host PRNG.

use crate::CommonError;
use soroban_sdk::{contracttype, Bytes, BytesN, Env, String};

pub const MIN_PASSWORD_LEN: u32 = 8;
pub const MAX_PASSWORD_LEN: u32 = 128;
pub const MAX_GENERATED_LEN: u32 = 32;

const ALPHANUMERIC: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Stored form of a password. The plaintext is never persisted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PasswordHash {
    pub salt: BytesN<16>,
    pub digest: BytesN<32>,
}

fn salted_digest(env: &Env, salt: &BytesN<16>, password: &String) -> BytesN<32> {
    let mut buf = Bytes::from_array(env, &salt.to_array());
    buf.append(&password.to_bytes());
    env.crypto().sha256(&buf).into()
}

/// Rejects passwords outside the accepted length range.
pub fn validate_password(password: &String) -> Result<(), CommonError> {
    let len = password.len();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(CommonError::InvalidInput);
    }
    Ok(())
}

pub fn hash_password(env: &Env, password: &String) -> PasswordHash {
    let mut salt = [0u8; 16];
    env.prng().fill(&mut salt);
    let salt = BytesN::from_array(env, &salt);
    let digest = salted_digest(env, &salt, password);
    PasswordHash { salt, digest }
}

pub fn verify_password(env: &Env, password: &String, stored: &PasswordHash) -> bool {
    let candidate = salted_digest(env, &stored.salt, password);
    constant_time_eq(&candidate.to_array(), &stored.digest.to_array())
}

/// Compares two digests without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Random `[A-Za-z0-9]` password of `len` characters (capped at
/// [`MAX_GENERATED_LEN`]).
pub fn generate_password(env: &Env, len: u32) -> String {
    let len = len.min(MAX_GENERATED_LEN) as usize;
    let mut buf = [0u8; MAX_GENERATED_LEN as usize];
    for slot in buf.iter_mut().take(len) {
        let idx = env.prng().gen_range::<u64>(0..ALPHANUMERIC.len() as u64);
        *slot = ALPHANUMERIC[idx as usize];
    }
    String::from_bytes(env, &buf[..len])
}

/// Fills `out` with random ASCII decimal digits.
pub fn fill_random_digits(env: &Env, out: &mut [u8]) {
    for slot in out.iter_mut() {
        *slot = b'0' + env.prng().gen_range::<u64>(0..10) as u8;
    }
}

pub fn is_alphanumeric(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| ALPHANUMERIC.contains(b))
}
