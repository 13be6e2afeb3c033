//! Set-Associative Level Unit Tests.
//!
//! Exercises one cache level in isolation: lookup with MRU promotion,
//! fill, LRU victim selection, invalidation with age repair, and the
//! dense-age invariant after every mutation.
//!
//! The test geometry is 4 sets × 4 ways (set_bits = 2, way_bits = 2):
//! set index = line & 3, tag = line >> 2. Lines 1, 5, 9, 13, 17 all map
//! to set 1 with distinct tags.

use ceaser_core::cache::CacheLevel;
use ceaser_core::config::CacheConfig;

use crate::common::harness::assert_age_permutation;

/// Builds the small deterministic test level.
fn test_level() -> CacheLevel {
    CacheLevel::new(&CacheConfig {
        set_bits: 2,
        way_bits: 2,
    })
}

// ══════════════════════════════════════════════════════════
// 1. Lookup
// ══════════════════════════════════════════════════════════

/// A lookup on an empty level misses and changes nothing.
#[test]
fn cold_touch_misses() {
    let mut level = test_level();
    assert!(!level.touch(1), "empty level must miss");
    assert!(level.valid_lines().is_empty(), "miss must not allocate");
}

/// A filled line hits on the next lookup.
#[test]
fn fill_then_touch_hits() {
    let mut level = test_level();
    level.fill(1);
    assert!(level.touch(1), "filled line must hit");
}

/// `contains_line` observes residency without promoting the line.
#[test]
fn contains_does_not_promote() {
    let mut level = test_level();
    level.fill(1);
    level.fill(5);
    // Line 1 is now the LRU of set 1.
    assert_eq!(level.lru_line(1), 1);

    assert!(level.contains_line(1));
    assert_eq!(
        level.lru_line(1),
        1,
        "contains_line must not update LRU state"
    );
}

// ══════════════════════════════════════════════════════════
// 2. LRU Ordering
// ══════════════════════════════════════════════════════════

/// Filling a set keeps ages dense and makes the first line the victim.
#[test]
fn fill_keeps_ages_dense() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
        assert_age_permutation(&level);
    }
    assert_eq!(level.lru_line(1), 1, "first fill must be the LRU");
}

/// Touching a line moves it to MRU and shifts the victim.
#[test]
fn touch_promotes_to_mru() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
    }

    // Promote the current LRU.
    assert!(level.touch(1));
    assert_age_permutation(&level);
    assert_eq!(level.lru_line(1), 5, "second-oldest line becomes the LRU");

    assert!(level.touch(9));
    assert_eq!(level.lru_line(1), 5);
}

/// Re-touching the MRU line is a no-op on the ages.
#[test]
fn touch_mru_is_noop() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
    }

    let before = level.set_ages(1);
    assert!(level.touch(13), "13 was the last fill, must hit");
    assert_eq!(
        level.set_ages(1),
        before,
        "promoting the MRU must not reshuffle ages"
    );
}

/// LRU state follows an interleaved access history.
#[test]
fn lru_follows_access_history() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
    }
    level.touch(1);
    level.touch(5);
    // Recency order (MRU first): 5, 1, 13, 9.
    assert_eq!(level.lru_line(1), 9);

    assert!(level.invalidate(9));
    assert_eq!(level.lru_line(1), 13);
}

// ══════════════════════════════════════════════════════════
// 3. Occupancy
// ══════════════════════════════════════════════════════════

/// `free_way` reports a slot until the set fills up.
#[test]
fn free_way_tracks_occupancy() {
    let mut level = test_level();
    for line in [1, 5, 9] {
        level.fill(line);
        assert!(level.free_way(1).is_some());
    }
    level.fill(13);
    assert!(level.free_way(1).is_none(), "full set has no free way");
    assert!(level.free_way(0).is_some(), "other sets stay empty");
}

/// Different sets never interact.
#[test]
fn sets_are_independent() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
    }
    level.fill(2);
    level.fill(6);

    assert_eq!(level.lru_line(1), 1);
    assert_eq!(level.lru_line(2), 2);
    assert!(level.touch(2));
    assert_eq!(level.lru_line(2), 6);
    assert_eq!(level.lru_line(1), 1, "set 1 unaffected by set 2 traffic");
}

/// `valid_lines` reports exactly the resident lines.
#[test]
fn valid_lines_reports_residents() {
    let mut level = test_level();
    for line in [1, 5, 2, 7] {
        level.fill(line);
    }
    let mut lines = level.valid_lines();
    lines.sort_unstable();
    assert_eq!(lines, vec![1, 2, 5, 7]);
}

// ══════════════════════════════════════════════════════════
// 4. Invalidation
// ══════════════════════════════════════════════════════════

/// Removing a middle-aged line re-densifies the remaining ages.
#[test]
fn invalidate_repairs_ages() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
    }

    assert!(level.invalidate(5));
    assert_age_permutation(&level);
    assert_eq!(level.set_ages(1).len(), 3);
    assert!(!level.contains_line(5));
    assert_eq!(level.lru_line(1), 1, "LRU unchanged by removing a newer line");
}

/// Invalidating an absent line reports `false` and changes nothing.
#[test]
fn invalidate_absent_is_silent() {
    let mut level = test_level();
    for line in [1, 5] {
        level.fill(line);
    }

    let before = level.valid_lines();
    let ages_before = level.set_ages(1);
    assert!(!level.invalidate(9), "line 9 was never filled");
    assert_eq!(level.valid_lines(), before);
    assert_eq!(level.set_ages(1), ages_before);
}

/// A freed slot is reusable by the next fill.
#[test]
fn invalidate_then_fill_reuses_slot() {
    let mut level = test_level();
    for line in [1, 5, 9, 13] {
        level.fill(line);
    }

    assert!(level.invalidate(9));
    assert!(level.free_way(1).is_some());

    level.fill(17);
    assert_age_permutation(&level);
    assert!(level.contains_line(17));
    assert!(level.free_way(1).is_none());
}

/// Evicting the only line of a set leaves it cleanly empty.
#[test]
fn invalidate_only_line_empties_set() {
    let mut level = test_level();
    level.fill(3);
    assert!(level.invalidate(3));
    assert!(level.set_ages(3).is_empty());
    assert!(level.valid_lines().is_empty());
}

// ══════════════════════════════════════════════════════════
// 5. Geometry
// ══════════════════════════════════════════════════════════

/// Set and tag decomposition matches the configured geometry.
#[test]
fn set_and_tag_decomposition() {
    let level = test_level();
    assert_eq!(level.sets(), 4);
    assert_eq!(level.ways(), 4);
    assert_eq!(level.set_of(0b1101), 0b01);
    assert_eq!(level.tag_of(0b1101), 0b11);
}

/// A direct-mapped level (way_bits = 0) still obeys the LRU contract.
#[test]
fn direct_mapped_level() {
    let mut level = CacheLevel::new(&CacheConfig {
        set_bits: 2,
        way_bits: 0,
    });
    level.fill(1);
    assert!(level.touch(1));
    assert!(level.free_way(1).is_none());
    assert_eq!(level.lru_line(1), 1, "sole resident is its own victim");
}
