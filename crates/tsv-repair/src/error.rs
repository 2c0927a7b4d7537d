//! Error types for repair attempts.

use thiserror::Error;

/// Result type alias for repair operations.
pub type Result<T> = std::result::Result<T, RepairError>;

/// Terminal failures of a single repair attempt.
///
/// The first four variants are input-driven: the pin population cannot be
/// repaired, and generating a new population is the only recourse. The two
/// `Verified*` variants are different in kind — they mean the emitted
/// assignment is internally inconsistent, which indicates a defect in the
/// decision table or the borrow logic, never in the input. Callers
/// characterising pin populations may want to `assert!` on
/// [`RepairError::is_verification`] rather than count those as failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RepairError {
    /// A block's own mask cannot drive four lanes under any shift.
    #[error("block {block} intrinsically bad (mask {mask:06b})")]
    IntrinsicBlockFailure {
        /// Failing block index.
        block: usize,
        /// The block's operational mask.
        mask: u8,
    },

    /// An inbound obligation exists but the block's left spare is dead.
    #[error("block {block} borrow failed — left spare dead (mask {mask:06b})")]
    BorrowUnavailable {
        /// Failing block index.
        block: usize,
        /// The block's operational mask.
        mask: u8,
    },

    /// After surrendering its left spare, the block is still infeasible.
    #[error("block {block} chain failed — infeasible once spare is lent (mask {mask:06b})")]
    ChainBorrowFailure {
        /// Failing block index.
        block: usize,
        /// The block's operational mask.
        mask: u8,
    },

    /// An obligation remains after the last block; there is no block 64.
    #[error("borrow outstanding past the last block (mask {mask:06b})")]
    UnresolvedAtBoundary {
        /// The last block's operational mask.
        mask: u8,
    },

    /// Two DQ lanes resolved to the same TSV.
    #[error("DQ {dq} landed on TSV {pin}, already claimed by DQ {prior_dq}")]
    VerifiedDoubleAssignment {
        /// Later claimant.
        dq: usize,
        /// Earlier claimant.
        prior_dq: usize,
        /// Contested TSV index.
        pin: usize,
    },

    /// A DQ lane resolved to a TSV that tested bad.
    #[error("DQ {dq} landed on dead TSV {pin} (block {block} mask {mask:06b})")]
    VerifiedBadPin {
        /// The lane.
        dq: usize,
        /// Flattened TSV index.
        pin: usize,
        /// Block owning that TSV.
        block: usize,
        /// That block's operational mask.
        mask: u8,
    },
}

impl RepairError {
    /// Whether this failure came from the independent sanity pass.
    ///
    /// True means a logic defect, not an unrepairable pin population.
    pub fn is_verification(&self) -> bool {
        matches!(
            self,
            Self::VerifiedDoubleAssignment { .. } | Self::VerifiedBadPin { .. }
        )
    }

    /// Block index the attempt failed at, where one exists.
    pub fn failing_block(&self) -> Option<usize> {
        match self {
            Self::IntrinsicBlockFailure { block, .. }
            | Self::BorrowUnavailable { block, .. }
            | Self::ChainBorrowFailure { block, .. }
            | Self::VerifiedBadPin { block, .. } => Some(*block),
            Self::UnresolvedAtBoundary { .. } | Self::VerifiedDoubleAssignment { .. } => None,
        }
    }
}
