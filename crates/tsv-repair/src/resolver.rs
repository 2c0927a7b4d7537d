//! Per-block shift selection.
//!
//! A block that receives an inbound borrow and cannot lend must pay the
//! obligation out of its own left spare before attempting its own four
//! lanes: the resolver re-looks the table up with that spare stripped, which
//! is the table's answer for "this block minus the pin its predecessor
//! already claimed". That single reduced-mask retry is the only backtracking
//! the design performs.

use tracing::trace;

use tsv_chip::layout::LENT_SPARE_MASK;
use tsv_chip::{entry, Shift};

use crate::block::TsvBlock;
use crate::error::RepairError;

/// A block's resolved shift settings and the obligation it passes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBlock {
    /// Shift settings for the block's four DQ lanes.
    pub shifts: [Shift; 4],
    /// The assignment claims the next block's left spare.
    pub borrows_next: bool,
}

/// Why a single block could not be resolved.
///
/// Position-independent; the chain engine attaches the block index via
/// [`BlockFailure::at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFailure {
    /// The mask cannot drive four lanes regardless of borrowing.
    Intrinsic,
    /// An inbound obligation exists but the left spare is dead.
    BorrowUnavailable,
    /// Still infeasible after surrendering the left spare.
    ChainBorrow,
}

impl BlockFailure {
    /// Attach chain coordinates, producing the attempt-level error.
    #[must_use]
    pub fn at(self, block: usize, mask: u8) -> RepairError {
        match self {
            Self::Intrinsic => RepairError::IntrinsicBlockFailure { block, mask },
            Self::BorrowUnavailable => RepairError::BorrowUnavailable { block, mask },
            Self::ChainBorrow => RepairError::ChainBorrowFailure { block, mask },
        }
    }
}

/// Resolve one block under an inbound borrow obligation.
///
/// # Errors
///
/// Returns a [`BlockFailure`] when the mask is intrinsically infeasible, or
/// when an inbound borrow cannot be paid.
pub fn resolve(block: TsvBlock, inbound_borrow: bool) -> Result<ResolvedBlock, BlockFailure> {
    let selected = block.entry();
    if selected.failed {
        return Err(BlockFailure::Intrinsic);
    }

    let selected = if inbound_borrow && !selected.can_lend {
        if !block.left_spare_functional() {
            return Err(BlockFailure::BorrowUnavailable);
        }
        let reduced = entry(block.mask() & LENT_SPARE_MASK);
        if reduced.failed {
            return Err(BlockFailure::ChainBorrow);
        }
        trace!(mask = %block, "left spare lent, repairing against reduced mask");
        reduced
    } else {
        selected
    };

    Ok(ResolvedBlock {
        shifts: selected.shifts,
        borrows_next: selected.must_borrow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairable_masks_always_resolve_without_inbound_borrow() {
        for mask in 0..64u8 {
            let block = TsvBlock::new(mask);
            let result = resolve(block, false);
            assert_eq!(result.is_err(), block.entry().failed, "mask {mask:06b}");
        }
    }

    #[test]
    fn lender_absorbs_inbound_borrow_unchanged() {
        let block = TsvBlock::new(0b111110);
        let plain = resolve(block, false).unwrap();
        let lent = resolve(block, true).unwrap();
        assert_eq!(plain, lent);
        assert!(!lent.borrows_next);
    }

    #[test]
    fn non_lender_pays_with_reduced_mask() {
        // 101101 cannot lend; stripped of its left spare it becomes 001101,
        // whose row borrows in turn — the obligation propagates.
        let block = TsvBlock::new(0b101101);
        let plain = resolve(block, false).unwrap();
        assert!(!plain.borrows_next);

        let paying = resolve(block, true).unwrap();
        assert_eq!(paying.shifts, entry(0b001101).shifts);
        assert!(paying.borrows_next);
    }

    #[test]
    fn dead_left_spare_cannot_be_borrowed() {
        // 011110 repairs fine alone but has nothing to lend.
        let block = TsvBlock::new(0b011110);
        assert!(resolve(block, false).is_ok());
        assert_eq!(resolve(block, true), Err(BlockFailure::BorrowUnavailable));
    }

    #[test]
    fn stripped_mask_below_floor_fails_the_chain() {
        // 101100 pays its spare and drops to 001100 — two pins, infeasible.
        let block = TsvBlock::new(0b101100);
        assert!(resolve(block, false).is_ok());
        assert_eq!(resolve(block, true), Err(BlockFailure::ChainBorrow));
    }

    #[test]
    fn failure_positions_attach_to_errors() {
        let err = BlockFailure::Intrinsic.at(10, 0b000010);
        assert_eq!(err, RepairError::IntrinsicBlockFailure { block: 10, mask: 0b000010 });
    }
}
