//! Commit-reveal over HMAC-SHA256.
//!
//! The committed message is the decimal string of the secret value and the
//! HMAC key is 16 fresh random bytes per commitment, so the digest can be
//! shown before the counterpart acts and checked by anyone after the reveal.

use hmac::{Hmac, Mac};
use serde::{Serialize, Serializer};
use sha2::Sha256;
use std::fmt;

use crate::error::{EngineError, Result};
use crate::random::RandomSource;

type HmacSha256 = Hmac<Sha256>;

pub const KEY_LEN: usize = 16;
pub const DIGEST_LEN: usize = 32;

/// Per-commitment HMAC key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}..)", hex::encode_upper(&self.0[..4]))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// HMAC-SHA256(key, decimal(value))
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitmentDigest([u8; DIGEST_LEN]);

impl CommitmentDigest {
    pub fn compute(key: &Key, value: i64) -> Result<Self> {
        Ok(Self(mac(key, value)?.finalize().into_bytes().into()))
    }

    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Recompute the HMAC from a revealed key and value and compare in
    /// constant time.
    pub fn verify(&self, key: &Key, value: i64) -> bool {
        mac(key, value).is_ok_and(|mac| mac.verify_slice(&self.0).is_ok())
    }
}

fn mac(key: &Key, value: i64) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| EngineError::KeyRejected { len: KEY_LEN })?;
    mac.update(value.to_string().as_bytes());
    Ok(mac)
}

impl fmt::Debug for CommitmentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentDigest({}..)", hex::encode_upper(&self.0[..8]))
    }
}

impl fmt::Display for CommitmentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl Serialize for CommitmentDigest {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// A value the holder is bound to but has not disclosed.
///
/// Only the digest is reachable until [`Commitment::reveal`] consumes it.
pub struct Commitment {
    value: i64,
    key: Key,
    digest: CommitmentDigest,
}

impl Commitment {
    /// Draw a fresh key and a secret in `0..=max_value`, and bind them.
    pub fn commit(rng: &mut impl RandomSource, max_value: i64) -> Result<Self> {
        let key = Key::random(rng);
        let value = rng.uniform(max_value)?;
        let digest = CommitmentDigest::compute(&key, value)?;
        tracing::debug!(%digest, max_value, "committed");
        Ok(Self { value, key, digest })
    }

    pub fn digest(&self) -> CommitmentDigest {
        self.digest
    }

    pub(crate) fn matches(&self, value: i64) -> bool {
        self.value == value
    }

    pub fn reveal(self) -> Reveal {
        Reveal {
            value: self.value,
            key: self.key,
            digest: self.digest,
        }
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Disclosed value and key, alongside the digest they must reproduce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Reveal {
    pub value: i64,
    pub key: Key,
    pub digest: CommitmentDigest,
}

impl Reveal {
    pub fn verify(&self) -> bool {
        self.digest.verify(&self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRandom, SystemRandom};

    #[test]
    fn revealed_values_reproduce_the_digest() {
        let commitment = Commitment::commit(&mut SystemRandom, 5).unwrap();
        let digest = commitment.digest();
        let reveal = commitment.reveal();

        assert!((0..=5).contains(&reveal.value));
        assert_eq!(
            CommitmentDigest::compute(&reveal.key, reveal.value).unwrap(),
            digest
        );
        assert!(reveal.verify());
    }

    #[test]
    fn wrong_value_fails_verification() {
        let key = Key::random(&mut SystemRandom);
        let digest = CommitmentDigest::compute(&key, 3).unwrap();
        assert!(!digest.verify(&key, 4));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let key1 = Key::random(&mut SystemRandom);
        let key2 = Key::random(&mut SystemRandom);
        let digest = CommitmentDigest::compute(&key1, 1).unwrap();
        assert!(!digest.verify(&key2, 1));
    }

    #[test]
    fn known_answer() {
        // HMAC-SHA256(key = 00 01 .. 0F, "42")
        let key = Key::from_bytes(std::array::from_fn(|i| i as u8));
        let digest = CommitmentDigest::compute(&key, 42).unwrap();
        assert_eq!(
            digest.to_string(),
            "6174F5393F8FE29F35687CFF7BDAB8EA27899F4EF092E0A7A78A0357AB816D3A"
        );
        assert_ne!(digest, CommitmentDigest::compute(&key, -42).unwrap());
    }

    #[test]
    fn hex_is_uppercase_and_full_width() {
        let key = Key::from_bytes([0xab; KEY_LEN]);
        assert_eq!(key.to_string(), "AB".repeat(KEY_LEN));

        let digest = CommitmentDigest::compute(&key, 0).unwrap().to_string();
        assert_eq!(digest.len(), DIGEST_LEN * 2);
        assert_eq!(digest, digest.to_uppercase());
    }

    #[test]
    fn extreme_values_commit_and_verify() {
        let key = Key::from_bytes([0; KEY_LEN]);
        for value in [i64::MIN, -1, 0, i64::MAX] {
            let digest = CommitmentDigest::compute(&key, value);
            assert!(matches!(digest, Ok(d) if d.verify(&key, value)));
        }
    }

    #[test]
    fn fresh_key_per_commitment() {
        let mut rng = SeededRandom::from_seed(1);
        let a = Commitment::commit(&mut rng, 1).unwrap().reveal();
        let b = Commitment::commit(&mut rng, 1).unwrap().reveal();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn debug_does_not_leak_the_secret() {
        let key = Key::from_bytes([0x11; KEY_LEN]);
        let commitment = Commitment {
            value: 123456,
            key,
            digest: CommitmentDigest::compute(&key, 123456).unwrap(),
        };
        let shown = format!("{:?}", commitment);
        assert!(!shown.contains("123456"));
        assert!(!shown.contains(&key.to_string()));
    }
}
