// SPDX-License-Identifier: AGPL-3.0-only

//! TSV redundancy repair engine for the stacked-memory interface.
//!
//! The interface is a 64×6 grid of through-silicon vias; each block of six
//! must drive four DQ lanes using the shift settings precomputed in
//! [`tsv_chip::table`]. This crate walks that model:
//!
//! ```text
//! pin-status source → chain repair (block resolver × 64, threading the
//! borrow obligation) → 256-lane RepairMap → sanity verifier → verified map
//! ```
//!
//! A repair attempt is a pure function of the 64 input masks — no I/O, no
//! shared state. The decision table is `static` and may be read from any
//! number of concurrent attempts; each attempt owns its blocks and its map.
//!
//! # Quick start
//!
//! ```
//! use tsv_repair::{population, repair};
//!
//! // Four good defaults per block, dead spares: the natural case.
//! let blocks = population::uniform_blocks(0b011110);
//! let map = repair(&blocks)?;
//! assert_eq!(map.physical_pin(0), 1);
//! # Ok::<(), tsv_repair::RepairError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod block;
mod chain;
mod error;
pub mod population;
mod resolver;
mod verify;

pub use block::TsvBlock;
pub use chain::{repair, RepairMap};
pub use error::{RepairError, Result};
pub use resolver::{resolve, BlockFailure, ResolvedBlock};
pub use verify::verify;

/// Commonly used types.
pub mod prelude {
    pub use crate::{repair, verify, RepairError, RepairMap, Result, TsvBlock};
    pub use tsv_chip::{entry, RepairEntry, Shift};
}
