//! Core types for voxel occlusion queries.
//!
//! This crate provides the foundational types shared by the culler:
//! - `Point3`, an exact-valued `f64` point with the arithmetic ray stepping needs
//! - `Aabb` and `CellBounds`, the box being probed and its voxel footprint
//! - Coordinate helpers mapping cells to chunk columns and world space
//! - The `ChunkProvider` trait implemented by block backends
//! - The common error type

pub mod coords;
pub mod error;
pub mod math;
pub mod provider;

pub use coords::{chunk_column, to_world};
pub use error::{Error, Result};
pub use math::{Aabb, CellBounds, Point3};
pub use provider::ChunkProvider;

/// Crate-wide constants
pub mod constants {
    /// Bits of a cell coordinate that address a position inside a chunk column.
    pub const CHUNK_BITS: u32 = 4;
}
