//! Pin-status sources.
//!
//! The repair engine consumes operational masks as opaque inputs; this
//! module supplies the two standard sources — a Bernoulli-per-pin random
//! population for characterisation runs, and uniform fixtures for
//! deterministic tests. Pass a seeded RNG (e.g. `ChaCha8Rng::seed_from_u64`)
//! to make a characterisation run reproducible.

use rand::Rng;

use tsv_chip::bytegroup::{TsvGroup, DATA_LANES_PER_GROUP, SPARE_HI_BIT, SPARE_LO_BIT};
use tsv_chip::layout::{BLOCK_COUNT, PINS_PER_BLOCK};

use crate::block::TsvBlock;

/// Random population: one Bernoulli trial per TSV.
///
/// `probability` is the chance a pin tests good, clamped to `[0, 1]`.
pub fn random_blocks<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> [TsvBlock; BLOCK_COUNT] {
    let p = probability.clamp(0.0, 1.0);
    let mut blocks = [TsvBlock::default(); BLOCK_COUNT];
    for block in &mut blocks {
        for local in 0..PINS_PER_BLOCK {
            if rng.gen_bool(p) {
                block.set_pin(local, true);
            }
        }
    }
    blocks
}

/// Deterministic fixture: every block carries the same mask.
#[must_use]
pub fn uniform_blocks(mask: u8) -> [TsvBlock; BLOCK_COUNT] {
    [TsvBlock::new(mask); BLOCK_COUNT]
}

/// Random byte-group population for the RDQ/WDQ layout model.
///
/// Spare TSVs — the flanks of every lane field and the sub-group spare —
/// always test good; the eight data lanes are Bernoulli trials, matching the
/// production bring-up flow.
pub fn random_group<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> TsvGroup {
    let p = probability.clamp(0.0, 1.0);
    let mut group = TsvGroup::default();
    for sub in &mut group.sub_groups {
        sub.spare = true;
        for bg in &mut sub.byte_groups {
            bg.lanes = SPARE_LO_BIT | SPARE_HI_BIT;
            for bit in 1..=DATA_LANES_PER_GROUP {
                if rng.gen_bool(p) {
                    bg.lanes |= 1 << bit;
                }
            }
        }
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn probability_one_fills_every_pin() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let blocks = random_blocks(&mut rng, 1.0);
        assert!(blocks.iter().all(|b| b.functional_count() == 6));
    }

    #[test]
    fn probability_zero_fills_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let blocks = random_blocks(&mut rng, 0.0);
        assert!(blocks.iter().all(|b| b.mask() == 0));
    }

    #[test]
    fn same_seed_same_population() {
        let a = random_blocks(&mut ChaCha8Rng::seed_from_u64(42), 0.9);
        let b = random_blocks(&mut ChaCha8Rng::seed_from_u64(42), 0.9);
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_probability_is_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let blocks = random_blocks(&mut rng, 1.5);
        assert!(blocks.iter().all(|b| b.functional_count() == 6));
    }

    #[test]
    fn group_spares_are_always_good() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let group = random_group(&mut rng, 0.0);
        assert!(group.spares_ok());
        // All data lanes dead at p = 0: every byte group is an issue.
        assert_eq!(group.scan_issues().len(), 16);
    }
}
