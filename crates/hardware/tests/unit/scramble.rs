//! Index Scrambler Unit Tests.
//!
//! Verifies the keyed 40-bit permutation behind the randomized LLC:
//! encrypt/decrypt are mutually inverse bijections on `[0, 2^40)`,
//! construction is deterministic in the seed, and the round keys are
//! masked and retained.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ceaser_core::common::addr::LINE_ADDR_MASK;
use ceaser_core::common::ConfigError;
use ceaser_core::scramble::AddressScrambler;

/// Builds the default-parameter scrambler (seed 0, keys 100..400).
fn default_scrambler() -> AddressScrambler {
    AddressScrambler::new(0, &[100, 200, 300, 400]).expect("4 keys are valid")
}

// ══════════════════════════════════════════════════════════
// 1. Bijection
// ══════════════════════════════════════════════════════════

/// Round trip over 1000 random 40-bit values, both directions.
#[test]
fn round_trip_is_identity() {
    let phi = default_scrambler();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..1000 {
        let line = rng.gen::<u64>() & LINE_ADDR_MASK;
        assert_eq!(phi.decrypt(phi.encrypt(line)), line);
        assert_eq!(phi.encrypt(phi.decrypt(line)), line);
    }
}

/// Edge values of the 40-bit domain round-trip too.
#[test]
fn round_trip_domain_edges() {
    let phi = default_scrambler();
    for line in [0, 1, LINE_ADDR_MASK, LINE_ADDR_MASK - 1, 1 << 39] {
        assert_eq!(phi.decrypt(phi.encrypt(line)), line);
    }
}

/// Scrambled lines never leave the 40-bit space.
#[test]
fn output_stays_in_line_space() {
    let phi = default_scrambler();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..1000 {
        let line = rng.gen::<u64>() & LINE_ADDR_MASK;
        assert_eq!(phi.encrypt(line) >> 40, 0, "ciphertext exceeds 40 bits");
        assert_eq!(phi.decrypt(line) >> 40, 0, "plaintext exceeds 40 bits");
    }
}

/// Distinct inputs produce distinct outputs (injectivity on a sample).
#[test]
fn distinct_inputs_distinct_outputs() {
    let phi = default_scrambler();
    let mut outputs = HashSet::new();

    for line in 0..1000u64 {
        assert!(
            outputs.insert(phi.encrypt(line)),
            "two lines scrambled to the same index"
        );
    }
}

// ══════════════════════════════════════════════════════════
// 2. Determinism
// ══════════════════════════════════════════════════════════

/// The same (seed, keys) pair always yields the same mapping.
#[test]
fn construction_is_deterministic() {
    let a = default_scrambler();
    let b = default_scrambler();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let line = rng.gen::<u64>() & LINE_ADDR_MASK;
        assert_eq!(a.encrypt(line), b.encrypt(line));
    }
}

/// Different seeds produce observably different mappings.
#[test]
fn different_seed_changes_mapping() {
    let a = AddressScrambler::new(0, &[100, 200, 300, 400]).unwrap();
    let b = AddressScrambler::new(1, &[100, 200, 300, 400]).unwrap();

    let diverges = (0..100u64).any(|line| a.encrypt(line) != b.encrypt(line));
    assert!(diverges, "seeds 0 and 1 built identical tables");
}

// ══════════════════════════════════════════════════════════
// 3. Keys
// ══════════════════════════════════════════════════════════

/// Keys are masked to their low 20 bits and retained in order.
#[test]
fn keys_masked_and_retained() {
    let phi = AddressScrambler::new(0, &[100, 0xFFFF_FFFF, 0x12_3456, 400]).unwrap();
    assert_eq!(phi.round_keys(), &[100, 0x000F_FFFF, 0x02_3456, 400]);
}

/// A key vector of the wrong length is rejected.
#[test]
fn wrong_key_count_rejected() {
    match AddressScrambler::new(0, &[1, 2, 3]) {
        Err(ConfigError::KeyVectorLength(3)) => {}
        other => panic!("expected KeyVectorLength(3), got {:?}", other.err()),
    }

    assert!(AddressScrambler::new(0, &[]).is_err());
    assert!(AddressScrambler::new(0, &[1, 2, 3, 4, 5]).is_err());
}

/// Keys do not influence the mapping (randomization is seed-driven).
#[test]
fn keys_do_not_change_mapping() {
    let a = AddressScrambler::new(0, &[100, 200, 300, 400]).unwrap();
    let b = AddressScrambler::new(0, &[1, 2, 3, 4]).unwrap();

    for line in 0..100u64 {
        assert_eq!(a.encrypt(line), b.encrypt(line));
    }
}
