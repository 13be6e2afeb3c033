//! Keyed index scrambling for the randomized LLC.
//!
//! The last-level cache does not index its sets with the low bits of the
//! physical line address. Instead every line address passes through a
//! keyed, invertible 40-bit permutation before lookup, so the mapping
//! from lines to LLC sets is unpredictable without the construction
//! parameters. This module implements that permutation as a fixed-depth
//! substitution-permutation network:
//! 1. **Substitution:** Per round, five independent 8-bit S-boxes cover
//!    the 40-bit line address one byte lane each.
//! 2. **Permutation:** Per round, a 40-bit P-box relocates every bit.
//! 3. **Inversion:** Inverse S/P tables are precomputed so evicted
//!    ciphertext lines can be translated back to the physical lines the
//!    upper levels store.
//!
//! All tables derive deterministically from a seed via a seeded PRNG and
//! Fisher-Yates shuffles, so a given `(seed, keys)` pair always produces
//! the same mapping.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::common::addr::{LINE_ADDR_BITS, LINE_ADDR_MASK};
use crate::common::ConfigError;

/// Number of substitution-permutation rounds.
pub const ROUNDS: usize = 4;

/// Byte lanes per round: five 8-bit S-boxes cover 40 bits.
const LANES: usize = 5;

/// Entries in one 8-bit S-box.
const SBOX_SIZE: usize = 256;

/// Round keys keep their low 20 bits.
const KEY_MASK: u64 = 0x000F_FFFF;

/// Number of round-trip samples checked at construction.
const SELF_CHECK_SAMPLES: usize = 64;

/// Keyed invertible permutation over 40-bit line addresses.
///
/// The 20-bit round keys are stored as part of the construction state but
/// are not folded into the round function; the randomization of the
/// index mapping comes entirely from the seeded S-box and P-box tables.
pub struct AddressScrambler {
    keys: [u32; ROUNDS],
    sbox: [[[u8; SBOX_SIZE]; LANES]; ROUNDS],
    inv_sbox: [[[u8; SBOX_SIZE]; LANES]; ROUNDS],
    pbox: [[u8; LINE_ADDR_BITS as usize]; ROUNDS],
    inv_pbox: [[u8; LINE_ADDR_BITS as usize]; ROUNDS],
}

impl AddressScrambler {
    /// Builds the scrambler from a seed and one key per round.
    ///
    /// The P-boxes are drawn first, then the S-boxes, each as a
    /// Fisher-Yates shuffle of the identity permutation over the same
    /// seeded PRNG stream. Keys are masked to 20 bits and retained.
    ///
    /// # Errors
    ///
    /// [`ConfigError::KeyVectorLength`] when `keys.len() != 4`.
    ///
    /// # Panics
    ///
    /// Panics when the constructed tables fail the encrypt/decrypt
    /// round-trip self-check; that would mean a table is not a
    /// permutation, and no further simulation is meaningful.
    pub fn new(seed: u64, keys: &[u64]) -> Result<Self, ConfigError> {
        if keys.len() != ROUNDS {
            return Err(ConfigError::KeyVectorLength(keys.len()));
        }

        let mut rng = StdRng::seed_from_u64(seed);

        let mut pbox = [[0u8; LINE_ADDR_BITS as usize]; ROUNDS];
        let mut inv_pbox = [[0u8; LINE_ADDR_BITS as usize]; ROUNDS];
        for round in 0..ROUNDS {
            for (bit, slot) in pbox[round].iter_mut().enumerate() {
                *slot = bit as u8;
            }
            pbox[round].shuffle(&mut rng);
            for bit in 0..LINE_ADDR_BITS as usize {
                inv_pbox[round][pbox[round][bit] as usize] = bit as u8;
            }
        }

        let mut sbox = [[[0u8; SBOX_SIZE]; LANES]; ROUNDS];
        let mut inv_sbox = [[[0u8; SBOX_SIZE]; LANES]; ROUNDS];
        for round in 0..ROUNDS {
            for lane in 0..LANES {
                for (value, slot) in sbox[round][lane].iter_mut().enumerate() {
                    *slot = value as u8;
                }
                sbox[round][lane].shuffle(&mut rng);
                for value in 0..SBOX_SIZE {
                    inv_sbox[round][lane][sbox[round][lane][value] as usize] = value as u8;
                }
            }
        }

        let mut masked = [0u32; ROUNDS];
        for (dst, key) in masked.iter_mut().zip(keys) {
            *dst = (key & KEY_MASK) as u32;
        }

        let scrambler = Self {
            keys: masked,
            sbox,
            inv_sbox,
            pbox,
            inv_pbox,
        };
        scrambler.self_check(&mut rng);
        Ok(scrambler)
    }

    /// Verifies `decrypt(encrypt(x)) == x` on a sample of line addresses.
    fn self_check(&self, rng: &mut StdRng) {
        for _ in 0..SELF_CHECK_SAMPLES {
            let line = rng.gen::<u64>() & LINE_ADDR_MASK;
            assert_eq!(
                self.decrypt(self.encrypt(line)),
                line,
                "scrambler self-check failed: tables are not a bijection"
            );
        }
    }

    /// The stored 20-bit round keys.
    pub fn round_keys(&self) -> &[u32; ROUNDS] {
        &self.keys
    }

    /// Maps a 40-bit line address into the scrambled index space.
    pub fn encrypt(&self, line: u64) -> u64 {
        let mut x = line;
        for round in 0..ROUNDS {
            let mut subbed = 0u64;
            for lane in 0..LANES {
                let byte = ((x >> (8 * lane)) & 0xFF) as usize;
                subbed |= (self.sbox[round][lane][byte] as u64) << (8 * lane);
            }
            let mut permuted = 0u64;
            for bit in 0..LINE_ADDR_BITS as usize {
                permuted |= ((subbed >> bit) & 1) << self.pbox[round][bit];
            }
            x = permuted;
        }
        x
    }

    /// Maps a scrambled line address back to the physical line address.
    ///
    /// Rounds run in reverse, undoing the permutation before the
    /// substitution of each round.
    pub fn decrypt(&self, line: u64) -> u64 {
        let mut x = line;
        for round in (0..ROUNDS).rev() {
            let mut permuted = 0u64;
            for bit in 0..LINE_ADDR_BITS as usize {
                permuted |= ((x >> bit) & 1) << self.inv_pbox[round][bit];
            }
            let mut subbed = 0u64;
            for lane in 0..LANES {
                let byte = ((permuted >> (8 * lane)) & 0xFF) as usize;
                subbed |= (self.inv_sbox[round][lane][byte] as u64) << (8 * lane);
            }
            x = subbed;
        }
        x
    }
}
