//! Byte-group TSV layout of the read/write data paths.
//!
//! The RDQ and WDQ data paths are organised separately from the repair grid:
//! a group holds 2 sub groups, each sub group holds 8 byte groups plus one
//! sub-group spare TSV. A byte group is a 10-bit lane field — 8 data TSVs
//! flanked by a spare at each end:
//!
//! ```text
//! bit    9    8  7  6  5  4  3  2  1    0
//!      spare  b7 b6 b5 b4 b3 b2 b1 b0 spare
//! ```
//!
//! This layout only shares the redundant-TSV theme with the repair grid; it
//! has no shift table and no borrow protocol. The randomized fill lives in
//! `tsv-repair`; this module is the pure structure plus the issue scan.

/// Sub groups per TSV group.
pub const SUB_GROUPS: usize = 2;

/// Byte groups per sub group.
pub const BYTE_GROUPS_PER_SUB: usize = 8;

/// Data lanes in a byte group (bits 1..=8 of the lane field).
pub const DATA_LANES_PER_GROUP: usize = 8;

/// Total TSVs in a byte group's lane field (data plus both spares).
pub const BYTE_GROUP_LANES: usize = 10;

/// Significant bits of a lane field.
pub const LANE_FIELD_MASK: u16 = 0x3FF;

/// Low spare TSV of a byte group.
pub const SPARE_LO_BIT: u16 = 1 << 0;

/// High spare TSV of a byte group.
pub const SPARE_HI_BIT: u16 = 1 << 9;

/// One byte group: a 10-bit lane field plus spare-consumption tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteGroup {
    /// Lane field, bit set = TSV tested good.
    pub lanes: u16,
    /// Which spares have been consumed (`0x1` low, `0x2` high).
    pub spare_used: u8,
}

impl ByteGroup {
    /// Whether a lane-field bit position tested good.
    #[must_use]
    pub const fn lane_up(&self, bit: usize) -> bool {
        self.lanes & (1 << bit) != 0
    }

    /// Count of dead data lanes (bits 1..=8).
    #[must_use]
    pub fn dead_data_lanes(&self) -> u32 {
        (1..=DATA_LANES_PER_GROUP)
            .filter(|&bit| !self.lane_up(bit))
            .count() as u32
    }

    /// Both flanking spares tested good.
    #[must_use]
    pub const fn spares_up(&self) -> bool {
        self.lanes & SPARE_LO_BIT != 0 && self.lanes & SPARE_HI_BIT != 0
    }
}

/// One sub group: eight byte groups and the sub-group spare TSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubGroup {
    /// The eight byte groups.
    pub byte_groups: [ByteGroup; BYTE_GROUPS_PER_SUB],
    /// Sub-group spare TSV tested good.
    pub spare: bool,
}

/// A full RDQ or WDQ TSV group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TsvGroup {
    /// The two sub groups.
    pub sub_groups: [SubGroup; SUB_GROUPS],
}

/// A byte group with at least one dead data lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupIssue {
    /// Owning sub group.
    pub sub_group: usize,
    /// Byte group within the sub group.
    pub byte_group: usize,
    /// Dead data lanes in that byte group.
    pub dead_lanes: u32,
}

impl TsvGroup {
    /// Scan every byte group and report those with dead data lanes.
    #[must_use]
    pub fn scan_issues(&self) -> Vec<GroupIssue> {
        let mut issues = Vec::new();
        for (s, sub) in self.sub_groups.iter().enumerate() {
            for (b, group) in sub.byte_groups.iter().enumerate() {
                let dead = group.dead_data_lanes();
                if dead > 0 {
                    issues.push(GroupIssue { sub_group: s, byte_group: b, dead_lanes: dead });
                }
            }
        }
        issues
    }

    /// Every spare TSV in the group tested good.
    #[must_use]
    pub fn spares_ok(&self) -> bool {
        self.sub_groups
            .iter()
            .all(|sub| sub.spare && sub.byte_groups.iter().all(ByteGroup::spares_up))
    }
}
