//! In-memory block world implementing [`ChunkProvider`].
//!
//! Columns are 16 cells wide by default, matching the culler's default
//! `chunk_bits`. Every provider call is counted so tests can assert how much
//! work a query did.

use glam::IVec3;
use hashbrown::{HashMap, HashSet};
use voxcull_core::constants::CHUNK_BITS;
use voxcull_core::{chunk_column, ChunkProvider, Error, Result};

/// Load state of a chunk column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnState {
    /// Data available.
    #[default]
    Loaded,
    /// Still being generated or streamed; `prepare_chunk` reports not ready.
    Pending,
}

/// Provider call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub prepare: usize,
    pub opacity: usize,
    pub cleanup: usize,
}

/// Sparse set of opaque cells plus per-column load states.
#[derive(Debug, Clone)]
pub struct GridWorld {
    solid: HashSet<IVec3>,
    columns: HashMap<(i32, i32), ColumnState>,
    default_state: ColumnState,
    chunk_bits: u32,
    calls: CallCounts,
    pinned: HashSet<(i32, i32)>,
    max_pinned: usize,
    fail_after: Option<usize>,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GridWorld {
    /// An empty world where every column is loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            solid: HashSet::new(),
            columns: HashMap::new(),
            default_state: ColumnState::Loaded,
            chunk_bits: CHUNK_BITS,
            calls: CallCounts::default(),
            pinned: HashSet::new(),
            max_pinned: 0,
            fail_after: None,
        }
    }

    /// An empty world where no column is ever ready.
    #[must_use]
    pub fn unloaded() -> Self {
        Self {
            default_state: ColumnState::Pending,
            ..Self::new()
        }
    }

    /// Use columns `1 << chunk_bits` cells wide.
    #[must_use]
    pub fn with_chunk_bits(mut self, chunk_bits: u32) -> Self {
        self.chunk_bits = chunk_bits;
        self
    }

    /// Make opacity lookups fail once `lookups` of them have succeeded.
    #[must_use]
    pub fn failing_after(mut self, lookups: usize) -> Self {
        self.fail_after = Some(lookups);
        self
    }

    pub fn set_solid(&mut self, cell: IVec3) {
        self.solid.insert(cell);
    }

    pub fn clear(&mut self, cell: IVec3) {
        self.solid.remove(&cell);
    }

    #[must_use]
    pub fn is_solid(&self, cell: IVec3) -> bool {
        self.solid.contains(&cell)
    }

    /// Fill the half-open cell range `[min, max)`.
    pub fn fill(&mut self, min: IVec3, max: IVec3) {
        for x in min.x..max.x {
            for y in min.y..max.y {
                for z in min.z..max.z {
                    self.solid.insert(IVec3::new(x, y, z));
                }
            }
        }
    }

    /// Number of opaque cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solid.len()
    }

    pub fn set_column_state(&mut self, chunk_x: i32, chunk_z: i32, state: ColumnState) {
        self.columns.insert((chunk_x, chunk_z), state);
    }

    /// Load state of the column holding `cell`.
    #[must_use]
    pub fn column_state_at(&self, cell: IVec3) -> ColumnState {
        self.column_state(chunk_column(cell, self.chunk_bits))
    }

    fn column_state(&self, column: (i32, i32)) -> ColumnState {
        self.columns
            .get(&column)
            .copied()
            .unwrap_or(self.default_state)
    }

    #[must_use]
    pub const fn calls(&self) -> CallCounts {
        self.calls
    }

    /// Columns prepared since the last cleanup.
    #[must_use]
    pub fn pinned(&self) -> usize {
        self.pinned.len()
    }

    /// Most columns ever pinned at once.
    #[must_use]
    pub const fn max_pinned(&self) -> usize {
        self.max_pinned
    }
}

impl ChunkProvider for GridWorld {
    fn prepare_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool> {
        self.calls.prepare += 1;
        if self.column_state((chunk_x, chunk_z)) != ColumnState::Loaded {
            return Ok(false);
        }
        self.pinned.insert((chunk_x, chunk_z));
        self.max_pinned = self.max_pinned.max(self.pinned.len());
        Ok(true)
    }

    fn is_opaque_full_cube(&mut self, x: i32, y: i32, z: i32) -> Result<bool> {
        if self.fail_after.is_some_and(|limit| self.calls.opacity >= limit) {
            return Err(Error::Provider(format!(
                "injected failure at ({x}, {y}, {z})"
            )));
        }
        self.calls.opacity += 1;
        let cell = IVec3::new(x, y, z);
        if !self.pinned.contains(&chunk_column(cell, self.chunk_bits)) {
            tracing::warn!(x, y, z, "opacity lookup in a column that was not prepared");
        }
        Ok(self.solid.contains(&cell))
    }

    fn cleanup(&mut self) {
        self.calls.cleanup += 1;
        self.pinned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_half_open() {
        let mut world = GridWorld::new();
        world.fill(IVec3::ZERO, IVec3::new(2, 1, 3));
        assert_eq!(world.solid_count(), 6);
        assert!(world.is_solid(IVec3::new(1, 0, 2)));
        assert!(!world.is_solid(IVec3::new(2, 0, 0)));
    }

    #[test]
    fn pending_columns_are_not_ready() {
        let mut world = GridWorld::new();
        world.set_column_state(-1, 0, ColumnState::Pending);
        assert!(!world.prepare_chunk(-1, 0).unwrap());
        assert!(world.prepare_chunk(0, 0).unwrap());
        assert_eq!(world.column_state_at(IVec3::new(-3, 0, 5)), ColumnState::Pending);

        let mut world = GridWorld::unloaded();
        assert!(!world.prepare_chunk(0, 0).unwrap());
    }

    #[test]
    fn cleanup_unpins() {
        let mut world = GridWorld::new();
        world.prepare_chunk(0, 0).unwrap();
        world.prepare_chunk(1, 0).unwrap();
        assert_eq!(world.pinned(), 2);
        world.cleanup();
        assert_eq!(world.pinned(), 0);
        assert_eq!(world.max_pinned(), 2);
        assert_eq!(world.calls().cleanup, 1);
    }

    #[test]
    fn injected_failure() {
        let mut world = GridWorld::new().failing_after(1);
        world.prepare_chunk(0, 0).unwrap();
        assert!(world.is_opaque_full_cube(0, 0, 0).is_ok());
        assert!(matches!(
            world.is_opaque_full_cube(1, 0, 0),
            Err(Error::Provider(_))
        ));
    }
}
