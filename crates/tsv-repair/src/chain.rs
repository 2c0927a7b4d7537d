//! Chain repair across the 64 blocks.

use std::fmt;

use tracing::debug;

use tsv_chip::layout::{dq_nominal_pin, BLOCK_COUNT, DQS_PER_BLOCK, TOTAL_DQS};
use tsv_chip::Shift;

use crate::block::TsvBlock;
use crate::error::{RepairError, Result};
use crate::resolver::resolve;
use crate::verify::verify;

/// The resolved shift settings of all 256 DQ lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairMap {
    shifts: [Shift; TOTAL_DQS],
}

impl RepairMap {
    /// Rebuild a map from raw shift settings (e.g. replayed from a device).
    #[must_use]
    pub const fn from_shifts(shifts: [Shift; TOTAL_DQS]) -> Self {
        Self { shifts }
    }

    /// Shift setting of one DQ lane.
    #[must_use]
    pub const fn shift(&self, dq: usize) -> Shift {
        self.shifts[dq]
    }

    /// All 256 shift settings in lane order.
    #[must_use]
    pub const fn shifts(&self) -> &[Shift; TOTAL_DQS] {
        &self.shifts
    }

    /// Flattened TSV index a DQ lane drives (nominal position plus shift).
    #[must_use]
    pub fn physical_pin(&self, dq: usize) -> usize {
        let pin = dq_nominal_pin(dq) as i64 + i64::from(self.shifts[dq].offset());
        usize::try_from(pin).expect("nominal positions start at 1; no shift reaches below 0")
    }

    /// Whether a block's assignment claims its successor's left spare.
    #[must_use]
    pub fn block_borrows(&self, block: usize) -> bool {
        self.shifts[block * DQS_PER_BLOCK + DQS_PER_BLOCK - 1] == Shift::Right2
    }

    /// Iterator of `(dq, shift, physical_pin)` in lane order.
    pub fn lanes(&self) -> impl Iterator<Item = (usize, Shift, usize)> + '_ {
        (0..TOTAL_DQS).map(move |dq| (dq, self.shifts[dq], self.physical_pin(dq)))
    }

    /// Per-block diagnostic digest: `(mask-b)ssss` per block, where `b`
    /// flags an outbound borrow and `ssss` are the four raw shift fields.
    #[must_use]
    pub fn digest(&self, blocks: &[TsvBlock; BLOCK_COUNT]) -> String {
        use fmt::Write;

        let mut out = String::new();
        for (i, block) in blocks.iter().enumerate() {
            if i % 4 == 0 {
                let _ = write!(out, "dq {:>3}:", i * DQS_PER_BLOCK);
            }
            let _ = write!(out, "\t({}-{})", block, u8::from(self.block_borrows(i)));
            for lane in 0..DQS_PER_BLOCK {
                let _ = write!(out, "{}", self.shifts[i * DQS_PER_BLOCK + lane]);
            }
            if i % 4 == 3 {
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for RepairMap {
    /// Compact form: four shift digits per block, eight blocks per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.shifts.chunks(DQS_PER_BLOCK).enumerate() {
            for shift in chunk {
                write!(f, "{shift}")?;
            }
            if i % 8 == 7 {
                writeln!(f)?;
            } else {
                write!(f, " ")?;
            }
        }
        Ok(())
    }
}

/// Run a full repair attempt over the 64 blocks.
///
/// Blocks are processed in strictly increasing index order, threading the
/// borrow obligation forward; a borrow never propagates backward. The
/// returned map has already passed the independent sanity pass in
/// [`crate::verify`] — the chain's own bookkeeping is necessary but not
/// sufficient for success.
///
/// # Errors
///
/// Stops at the first infeasible block (no speculative backtracking); an
/// obligation still open after the last block is
/// [`RepairError::UnresolvedAtBoundary`].
pub fn repair(blocks: &[TsvBlock; BLOCK_COUNT]) -> Result<RepairMap> {
    let mut shifts = [Shift::Zero; TOTAL_DQS];
    let mut borrow = false;

    for (i, block) in blocks.iter().enumerate() {
        let resolved = resolve(*block, borrow).map_err(|failure| {
            debug!(block = i, mask = %block, ?failure, "chain stopped");
            failure.at(i, block.mask())
        })?;

        shifts[i * DQS_PER_BLOCK..(i + 1) * DQS_PER_BLOCK].copy_from_slice(&resolved.shifts);
        borrow = resolved.borrows_next;
    }

    if borrow {
        // There is no block 64 to satisfy the final obligation.
        return Err(RepairError::UnresolvedAtBoundary { mask: blocks[BLOCK_COUNT - 1].mask() });
    }

    let map = RepairMap::from_shifts(shifts);
    verify(blocks, &map)?;
    Ok(map)
}
