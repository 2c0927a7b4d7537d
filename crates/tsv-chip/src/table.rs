//! The repair decision table.
//!
//! One row per 6-bit operational mask (64 rows, total). Each row carries the
//! precomputed shift settings for the block's four DQ lanes plus three flags:
//!
//! - `failed` — the mask cannot drive four lanes under any allowed shift
//!   (fewer than three functional TSVs);
//! - `must_borrow` — the best assignment claims the next block's left spare
//!   (the last lane shifts off the block);
//! - `can_lend` — the block covers its own four lanes while leaving its left
//!   spare free, so it can absorb a predecessor's borrow unchanged.
//!
//! The rows are silicon behavior, not derived data: several masks admit more
//! than one minimal-shift assignment and the hardware's tie-breaks are fixed
//! per mask. Treat the table as authoritative — change a row only against
//! measured device behavior.

use crate::layout::MASK_BITS;
use crate::shift::Shift::{self, Left1 as L, Right1 as R, Right2 as X, Zero as Z};

/// One row of the repair table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairEntry {
    /// Shift settings for the block's four DQ lanes.
    pub shifts: [Shift; 4],
    /// Mask cannot drive four lanes under any shift.
    pub failed: bool,
    /// Assignment claims the next block's left spare.
    pub must_borrow: bool,
    /// Left spare stays free — the block can absorb an inbound borrow.
    pub can_lend: bool,
}

const fn dead() -> RepairEntry {
    RepairEntry { shifts: [Z, Z, Z, Z], failed: true, must_borrow: false, can_lend: false }
}

const fn fits(shifts: [Shift; 4]) -> RepairEntry {
    RepairEntry { shifts, failed: false, must_borrow: false, can_lend: false }
}

const fn borrows(shifts: [Shift; 4]) -> RepairEntry {
    RepairEntry { shifts, failed: false, must_borrow: true, can_lend: false }
}

const fn lends(shifts: [Shift; 4]) -> RepairEntry {
    RepairEntry { shifts, failed: false, must_borrow: false, can_lend: true }
}

/// The full table, indexed by operational mask (bit 5 = left spare).
pub static REPAIR_TABLE: [RepairEntry; 64] = [
    dead(),                  // 000000
    dead(),                  // 000001
    dead(),                  // 000010
    dead(),                  // 000011
    dead(),                  // 000100
    dead(),                  // 000101
    dead(),                  // 000110
    borrows([X, X, X, X]),   // 000111 — whole block rides two right, last lane on the neighbour
    dead(),                  // 001000
    dead(),                  // 001001
    dead(),                  // 001010
    borrows([R, X, X, X]),   // 001011
    dead(),                  // 001100
    borrows([R, R, X, X]),   // 001101
    borrows([R, R, R, X]),   // 001110
    fits([R, R, R, R]),      // 001111
    dead(),                  // 010000
    dead(),                  // 010001
    dead(),                  // 010010
    borrows([Z, X, X, X]),   // 010011
    dead(),                  // 010100
    borrows([Z, R, X, X]),   // 010101
    borrows([Z, R, R, X]),   // 010110
    fits([Z, R, R, R]),      // 010111
    dead(),                  // 011000
    borrows([Z, Z, X, X]),   // 011001
    borrows([Z, Z, R, X]),   // 011010
    fits([Z, Z, R, R]),      // 011011
    borrows([Z, Z, Z, X]),   // 011100
    fits([Z, Z, Z, R]),      // 011101
    fits([Z, Z, Z, Z]),      // 011110 — the natural case: all four defaults good
    fits([Z, Z, Z, Z]),      // 011111
    dead(),                  // 100000
    dead(),                  // 100001
    dead(),                  // 100010
    borrows([L, X, X, X]),   // 100011
    dead(),                  // 100100
    borrows([L, R, X, X]),   // 100101
    borrows([L, R, R, X]),   // 100110
    fits([L, R, R, R]),      // 100111
    dead(),                  // 101000
    borrows([L, Z, X, X]),   // 101001
    borrows([L, Z, R, X]),   // 101010
    fits([L, Z, R, R]),      // 101011
    borrows([L, Z, Z, X]),   // 101100
    fits([L, Z, Z, R]),      // 101101
    fits([L, Z, Z, Z]),      // 101110
    lends([R, R, R, R]),     // 101111 — first mask with a spare left over
    dead(),                  // 110000
    borrows([L, L, X, X]),   // 110001
    borrows([L, L, R, X]),   // 110010
    fits([L, L, R, R]),      // 110011
    borrows([L, L, Z, X]),   // 110100
    fits([L, L, Z, R]),      // 110101
    fits([L, L, Z, Z]),      // 110110
    lends([Z, R, R, R]),     // 110111
    borrows([L, L, L, X]),   // 111000
    fits([L, L, L, R]),      // 111001
    fits([L, L, L, Z]),      // 111010
    lends([Z, Z, R, R]),     // 111011
    fits([L, L, L, L]),      // 111100
    lends([Z, Z, Z, R]),     // 111101
    lends([Z, Z, Z, Z]),     // 111110
    lends([Z, Z, Z, Z]),     // 111111
];

/// Table row for an operational mask (argument truncated to 6 bits).
#[must_use]
pub fn entry(mask: u8) -> RepairEntry {
    REPAIR_TABLE[(mask & MASK_BITS) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{
        dq_nominal_pin, pin_is_functional, DQS_PER_BLOCK, LEFT_SPARE_BIT, LENT_SPARE_MASK,
        MIN_FUNCTIONAL_PINS, PINS_PER_BLOCK,
    };

    #[test]
    fn failed_iff_fewer_than_three_functional() {
        for mask in 0..64u8 {
            let e = entry(mask);
            assert_eq!(
                e.failed,
                mask.count_ones() < MIN_FUNCTIONAL_PINS,
                "mask {mask:06b}"
            );
        }
    }

    #[test]
    fn failed_rows_carry_no_other_flags() {
        for mask in 0..64u8 {
            let e = entry(mask);
            if e.failed {
                assert!(!e.must_borrow && !e.can_lend, "mask {mask:06b}");
                assert_eq!(e.shifts, [Shift::Zero; 4], "mask {mask:06b}");
            }
        }
    }

    #[test]
    fn borrow_iff_exactly_three_functional() {
        // Three good TSVs cover three lanes in-block; the fourth must come
        // from the neighbour. Four or more never borrow.
        for mask in 0..64u8 {
            let e = entry(mask);
            assert_eq!(e.must_borrow, mask.count_ones() == 3, "mask {mask:06b}");
        }
    }

    #[test]
    fn lend_iff_surplus_and_live_left_spare() {
        for mask in 0..64u8 {
            let e = entry(mask);
            let surplus = mask.count_ones() >= 5 && mask & LEFT_SPARE_BIT != 0;
            assert_eq!(e.can_lend, surplus, "mask {mask:06b}");
        }
    }

    #[test]
    fn superset_of_repairable_mask_is_repairable() {
        for a in 0..64u8 {
            for b in 0..64u8 {
                if a & b == b && !entry(b).failed {
                    assert!(!entry(a).failed, "mask {a:06b} ⊇ {b:06b}");
                }
            }
        }
    }

    #[test]
    fn assignments_land_on_functional_distinct_pins() {
        // Every non-failed row must place its four lanes on four distinct,
        // functional positions; only the last lane may run off the block.
        for mask in 0..64u8 {
            let e = entry(mask);
            if e.failed {
                continue;
            }
            let mut used = [false; PINS_PER_BLOCK + 2];
            for (lane, shift) in e.shifts.iter().enumerate() {
                let pos = dq_nominal_pin(lane) as i32 + shift.offset();
                assert!(pos >= 0, "mask {mask:06b} lane {lane} off the left edge");
                let pos = pos as usize;
                assert!(!used[pos], "mask {mask:06b} lane {lane} reuses TSV {pos}");
                used[pos] = true;
                if pos < PINS_PER_BLOCK {
                    assert!(
                        pin_is_functional(mask, pos),
                        "mask {mask:06b} lane {lane} on dead TSV {pos}"
                    );
                } else {
                    // Off-block landing is exactly the borrow case, and only
                    // the last lane can reach position 6.
                    assert_eq!(lane, DQS_PER_BLOCK - 1, "mask {mask:06b}");
                    assert!(e.must_borrow, "mask {mask:06b}");
                }
            }
            // A borrowing row must actually use the neighbour's spare.
            assert_eq!(e.must_borrow, used[PINS_PER_BLOCK], "mask {mask:06b}");
            // A lending row must leave its own left spare untouched.
            if e.can_lend {
                assert!(!used[0], "mask {mask:06b} lends a used spare");
            }
        }
    }

    #[test]
    fn paying_a_borrow_costs_exactly_one_pin() {
        // A block that absorbs an inbound borrow without lending repairs
        // against the stripped-spare view. The reduced row fails iff the
        // strip drops the block under the three-pin floor, and can never
        // itself lend — the spare is already spent.
        for mask in 0..64u8 {
            if mask & LEFT_SPARE_BIT == 0 {
                continue;
            }
            let reduced = entry(mask & LENT_SPARE_MASK);
            assert_eq!(
                reduced.failed,
                mask.count_ones() - 1 < MIN_FUNCTIONAL_PINS,
                "mask {mask:06b}"
            );
            assert!(!reduced.can_lend, "mask {mask:06b}");
        }
    }

    #[test]
    fn spot_rows_match_silicon() {
        // Hand-checked rows, one per structural family.
        let e = entry(0b000111);
        assert_eq!(e.shifts, [Shift::Right2; 4]);
        assert!(e.must_borrow);

        let e = entry(0b100101);
        assert_eq!(e.shifts, [Shift::Left1, Shift::Right1, Shift::Right2, Shift::Right2]);
        assert!(e.must_borrow);

        let e = entry(0b011110);
        assert_eq!(e.shifts, [Shift::Zero; 4]);
        assert!(!e.must_borrow && !e.can_lend);

        let e = entry(0b101111);
        assert_eq!(e.shifts, [Shift::Right1; 4]);
        assert!(e.can_lend && !e.must_borrow);

        let e = entry(0b111000);
        assert_eq!(e.shifts, [Shift::Left1, Shift::Left1, Shift::Left1, Shift::Right2]);
        assert!(e.must_borrow);

        let e = entry(0b111100);
        assert_eq!(e.shifts, [Shift::Left1; 4]);
        assert!(!e.must_borrow && !e.can_lend);
    }

    #[test]
    fn entry_truncates_to_six_bits() {
        assert_eq!(entry(0xFF), entry(0x3F));
    }
}
