use engine::{Commitment, CommitmentDigest, EngineError, Key, RandomSource, SeededRandom};
use proptest::prelude::*;

proptest! {
    #[test]
    fn digest_recomputes_from_any_key_and_value(key in any::<[u8; 16]>(), value in any::<i64>()) {
        let key = Key::from_bytes(key);
        let digest = CommitmentDigest::compute(&key, value).unwrap();
        prop_assert!(digest.verify(&key, value));
        prop_assert_eq!(CommitmentDigest::compute(&key, value).unwrap(), digest);
    }

    #[test]
    fn uniform_stays_in_range(max in 0i64..10_000, seed in any::<u64>()) {
        let mut rng = SeededRandom::from_seed(seed);
        for _ in 0..8 {
            let v = rng.uniform(max).unwrap();
            prop_assert!((0..=max).contains(&v));
        }
    }

    #[test]
    fn uniform_rejects_negative(max in i64::MIN..0) {
        let mut rng = SeededRandom::from_seed(0);
        prop_assert_eq!(rng.uniform(max), Err(EngineError::InvalidRange { max_value: max }));
    }

    #[test]
    fn commit_then_reveal_is_sound(max in 0i64..500, seed in any::<u64>()) {
        let mut rng = SeededRandom::from_seed(seed);
        let commitment = Commitment::commit(&mut rng, max).unwrap();
        let shown = commitment.digest();
        let reveal = commitment.reveal();
        prop_assert!((0..=max).contains(&reveal.value));
        prop_assert_eq!(CommitmentDigest::compute(&reveal.key, reveal.value).unwrap(), shown);
    }
}

#[test]
fn commit_with_negative_bound_fails() {
    let err = Commitment::commit(&mut SeededRandom::from_seed(1), -3).unwrap_err();
    assert_eq!(err, EngineError::InvalidRange { max_value: -3 });
}

#[test]
fn tampered_reveal_is_detected() {
    let mut reveal = Commitment::commit(&mut SeededRandom::from_seed(2), 5)
        .unwrap()
        .reveal();
    reveal.value = (reveal.value + 1) % 6;
    assert!(!reveal.verify());
}
