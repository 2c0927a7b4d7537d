//! TSV grid geometry.
//!
//! The interface is a 64×6 grid of through-silicon vias. Each block of six
//! TSVs carries four DQ lanes between two spares:
//!
//! ```text
//! local    0      1    2    3    4      5
//!        spare   d0   d1   d2   d3   spare
//!          o      x    x    x    x      o
//! ```
//!
//! A block's operational state is a 6-bit mask, **bit `5 - local`** per pin:
//! bit 5 (`0x20`) is the left spare, bits 4..1 the four default positions,
//! bit 0 (`0x01`) the right spare. A set bit means the TSV tested good.
//!
//! DQ lanes are numbered globally 0..255. Lane `d`'s nominal TSV skips one
//! spare per block boundary crossed, so the flattened nominal position is
//! `d + 1 + 2 * (d / 4)` — each block consumes six TSV slots but contributes
//! only four lanes.

/// Repair blocks in the interface.
pub const BLOCK_COUNT: usize = 64;

/// TSVs per block (four default positions, two spares).
pub const PINS_PER_BLOCK: usize = 6;

/// DQ lanes driven by each block.
pub const DQS_PER_BLOCK: usize = 4;

/// Total TSVs in the grid.
pub const TOTAL_PINS: usize = BLOCK_COUNT * PINS_PER_BLOCK; // 384

/// Total DQ lanes.
pub const TOTAL_DQS: usize = BLOCK_COUNT * DQS_PER_BLOCK; // 256

/// Significant bits of an operational mask.
pub const MASK_BITS: u8 = 0x3F;

/// Left spare of a block — the position a predecessor's borrow lands on.
pub const LEFT_SPARE_BIT: u8 = 0x20;

/// Right spare of a block.
pub const RIGHT_SPARE_BIT: u8 = 0x01;

/// A block's mask with its left spare stripped — the view a block repairs
/// against once the spare has been surrendered to its predecessor.
pub const LENT_SPARE_MASK: u8 = 0x1F;

/// Fewer functional TSVs than this and a block cannot drive its four lanes
/// under any shift.
pub const MIN_FUNCTIONAL_PINS: u32 = 3;

/// The first DQ lane of the device sits one TSV past the left spare.
pub const DQ_BASE_OFFSET: usize = 1;

/// Mask bit holding the functional flag of a block-local pin position.
#[must_use]
pub const fn pin_bit(local: usize) -> u8 {
    1 << (PINS_PER_BLOCK - 1 - local)
}

/// Whether a block-local pin position tested good in `mask`.
#[must_use]
pub const fn pin_is_functional(mask: u8, local: usize) -> bool {
    mask & pin_bit(local) != 0
}

/// Block owning a flattened TSV index.
#[must_use]
pub const fn block_of(pin: usize) -> usize {
    pin / PINS_PER_BLOCK
}

/// Block-local position of a flattened TSV index.
#[must_use]
pub const fn local_of(pin: usize) -> usize {
    pin % PINS_PER_BLOCK
}

/// Nominal (unshifted) TSV position of a DQ lane in the flattened grid.
#[must_use]
pub const fn dq_nominal_pin(dq: usize) -> usize {
    dq + DQ_BASE_OFFSET + 2 * (dq / DQS_PER_BLOCK)
}
