//! Independent sanity pass over an emitted repair map.

use tsv_chip::layout::{block_of, local_of, BLOCK_COUNT, TOTAL_DQS, TOTAL_PINS};

use crate::block::TsvBlock;
use crate::chain::RepairMap;
use crate::error::{RepairError, Result};

/// Prove a repair map assigns every DQ lane a distinct, functional TSV.
///
/// Deliberately independent of the resolver's bookkeeping: the mapping is
/// recomputed from the emitted shift settings alone, so an aliasing table
/// row or a borrow-logic defect the chain engine cannot see is still caught
/// here.
///
/// # Errors
///
/// [`RepairError::VerifiedDoubleAssignment`] when two lanes claim one TSV,
/// [`RepairError::VerifiedBadPin`] when a lane lands on a TSV that tested
/// bad (or off the grid entirely).
pub fn verify(blocks: &[TsvBlock; BLOCK_COUNT], map: &RepairMap) -> Result<()> {
    let mut claimed_by: [Option<usize>; TOTAL_PINS] = [None; TOTAL_PINS];

    for dq in 0..TOTAL_DQS {
        let pin = map.physical_pin(dq);

        // A lane shifted past the last block has no TSV at all; report it as
        // the bad-pin case with the phantom block coordinates.
        if pin >= TOTAL_PINS {
            return Err(RepairError::VerifiedBadPin { dq, pin, block: block_of(pin), mask: 0 });
        }

        if let Some(prior_dq) = claimed_by[pin] {
            return Err(RepairError::VerifiedDoubleAssignment { dq, prior_dq, pin });
        }
        claimed_by[pin] = Some(dq);

        let owner = block_of(pin);
        if !blocks[owner].pin_functional(local_of(pin)) {
            return Err(RepairError::VerifiedBadPin {
                dq,
                pin,
                block: owner,
                mask: blocks[owner].mask(),
            });
        }
    }

    Ok(())
}
