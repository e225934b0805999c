//! Bounded per-voxel visibility cache centred on the local origin.
//!
//! Each cell stores two bits: `01` visible, `10` blocked, `00` unknown. Reads
//! remember the slot they touched so the caller can record what it learned
//! about that cell without recomputing the index.

use bitvec::prelude::*;
use glam::IVec3;

/// Cached knowledge about one voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VoxelState {
    /// Not resolved yet.
    #[default]
    Unknown,
    /// Resolved as see-through.
    Visible,
    /// Resolved as an opaque full cube.
    Blocked,
    /// Outside the cacheable radius. Returned by reads, never stored.
    OutOfRange,
}

/// Number of resolved cells in a cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheCounts {
    pub visible: usize,
    pub blocked: usize,
}

/// Dense cube of voxel states of side `2 * reach + 1`.
///
/// Only cells within `reach - 2` of the origin on every axis are stored;
/// everything else reads as [`VoxelState::OutOfRange`]. Nothing invalidates
/// entries except [`reset`](Self::reset).
#[derive(Clone, Debug)]
pub struct VoxelStateCache {
    reach: u32,
    radius: u32,
    side: usize,
    bits: BitVec<u8, Lsb0>,
    last: Option<usize>,
}

impl VoxelStateCache {
    /// Create an all-unknown cache for the given reach.
    #[must_use]
    pub fn new(reach: u32) -> Self {
        let side = 2 * reach as usize + 1;
        Self {
            reach,
            radius: reach.saturating_sub(2),
            side,
            bits: bitvec![u8, Lsb0; 0; side * side * side * 2],
            last: None,
        }
    }

    /// Configured reach.
    #[inline]
    #[must_use]
    pub const fn reach(&self) -> u32 {
        self.reach
    }

    /// Largest absolute per-axis offset that is still cached.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Returns true if the cell lies inside the cacheable radius.
    #[inline]
    #[must_use]
    pub fn in_range(&self, cell: IVec3) -> bool {
        cell.x.unsigned_abs() <= self.radius
            && cell.y.unsigned_abs() <= self.radius
            && cell.z.unsigned_abs() <= self.radius
    }

    fn slot(&self, cell: IVec3) -> Option<usize> {
        if !self.in_range(cell) {
            return None;
        }
        let reach = self.reach as i32;
        let x = (cell.x + reach) as usize;
        let y = (cell.y + reach) as usize;
        let z = (cell.z + reach) as usize;
        Some(x + self.side * (y + self.side * z))
    }

    fn read(&self, slot: usize) -> VoxelState {
        match (self.bits[slot * 2], self.bits[slot * 2 + 1]) {
            (true, _) => VoxelState::Visible,
            (false, true) => VoxelState::Blocked,
            (false, false) => VoxelState::Unknown,
        }
    }

    fn write(&mut self, slot: usize, visible: bool) {
        self.bits.set(slot * 2, visible);
        self.bits.set(slot * 2 + 1, !visible);
    }

    /// Read a cell and remember it as the last-touched slot.
    ///
    /// Out-of-range reads clear the slot, so a following `mark_last_*` is a
    /// no-op.
    pub fn state(&mut self, cell: IVec3) -> VoxelState {
        self.last = self.slot(cell);
        self.last.map_or(VoxelState::OutOfRange, |slot| self.read(slot))
    }

    /// Read a cell without touching the last-touched slot.
    #[must_use]
    pub fn peek(&self, cell: IVec3) -> VoxelState {
        self.slot(cell)
            .map_or(VoxelState::OutOfRange, |slot| self.read(slot))
    }

    /// Mark the cell of the last `state` call visible.
    ///
    /// Returns false if there was no cacheable slot to mark.
    pub fn mark_last_visible(&mut self) -> bool {
        self.mark_last(true)
    }

    /// Mark the cell of the last `state` call blocked.
    ///
    /// Returns false if there was no cacheable slot to mark.
    pub fn mark_last_blocked(&mut self) -> bool {
        self.mark_last(false)
    }

    fn mark_last(&mut self, visible: bool) -> bool {
        match self.last {
            Some(slot) => {
                self.write(slot, visible);
                true
            }
            None => false,
        }
    }

    /// Forget every cell.
    pub fn reset(&mut self) {
        self.bits.fill(false);
        self.last = None;
    }

    /// Count resolved cells.
    #[must_use]
    pub fn counts(&self) -> CacheCounts {
        self.bits
            .chunks_exact(2)
            .fold(CacheCounts::default(), |mut counts, pair| {
                if pair[0] {
                    counts.visible += 1;
                } else if pair[1] {
                    counts.blocked += 1;
                }
                counts
            })
    }

    /// Memory held by the cell storage in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.bits.as_raw_slice().len()
    }
}
