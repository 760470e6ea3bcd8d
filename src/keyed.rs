//! Keyed deterministic randomness.
//!
//! Every stochastic decision in the pipeline is a pure function of a key
//! string built from stable identifiers (`system_id`, `object_id`, catalog id)
//! plus a purpose tag. There is no RNG state: the same key gives the same
//! answer in any process, on any machine, in any iteration order.

use sha2::{Digest, Sha256};

/// Leading 32 bits (big-endian) of SHA-256 over the key.
pub fn hash32(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Uniform value in `[0, 1)`.
pub fn probability_for(key: &str) -> f64 {
    hash32(key) as f64 / 4_294_967_296.0
}

/// Pick a label from `(label, weight)` pairs by cumulative weight.
///
/// Uses a salted key so the choice is independent of `probability_for(key)`
/// on the same key. Arithmetic is integer-only.
pub fn choose_weighted<T: Copy>(key: &str, options: &[(T, u32)]) -> T {
    let total: u64 = options.iter().map(|(_, w)| *w as u64).sum();
    if total == 0 {
        return options[0].0;
    }

    let salted = format!("{}:choice", key);
    let r = (hash32(&salted) as u64 * total) >> 32;

    let mut acc = 0u64;
    for (label, weight) in options {
        acc += *weight as u64;
        if r < acc {
            return *label;
        }
    }
    options[options.len() - 1].0
}

/// Bounded integer in `low..=high`.
pub fn jitter(key: &str, low: i32, high: i32) -> i32 {
    if high <= low {
        return low;
    }
    let span = (high as i64 - low as i64 + 1) as u64;
    let offset = (hash32(key) as u64 * span) >> 32;
    (low as i64 + offset as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash32_is_stable() {
        // SHA-256("abc") = ba7816bf...
        assert_eq!(hash32("abc"), 0xba78_16bf);
        assert_eq!(hash32("0:1:artifact"), hash32("0:1:artifact"));
        assert_ne!(hash32("0:1:artifact"), hash32("0:2:artifact"));
    }

    #[test]
    fn test_probability_range() {
        for i in 0..2000 {
            let p = probability_for(&format!("probe:{}", i));
            assert!((0.0..1.0).contains(&p));
        }
    }

    #[test]
    fn test_jitter_bounds_inclusive() {
        let mut seen_low = false;
        let mut seen_high = false;
        for i in 0..2000 {
            let v = jitter(&format!("j:{}", i), -1, 2);
            assert!((-1..=2).contains(&v));
            seen_low |= v == -1;
            seen_high |= v == 2;
        }
        assert!(seen_low && seen_high);
        assert_eq!(jitter("anything", 4, 4), 4);
    }

    #[test]
    fn test_choose_weighted_respects_weights() {
        let options = [("a", 90u32), ("b", 10u32), ("never", 0u32)];
        let mut a = 0;
        for i in 0..5000 {
            match choose_weighted(&format!("w:{}", i), &options) {
                "a" => a += 1,
                "b" => {}
                other => panic!("zero-weight option chosen: {}", other),
            }
        }
        let share = a as f64 / 5000.0;
        assert!((0.87..0.93).contains(&share), "share was {}", share);
    }

    #[test]
    fn test_choose_weighted_single_option() {
        assert_eq!(choose_weighted("k", &[(7u8, 3u32)]), 7);
    }
}
