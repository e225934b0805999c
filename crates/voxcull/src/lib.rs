//! Voxel occlusion culling.
//!
//! Answers, many times per frame, whether any part of an axis-aligned box can
//! be seen from a viewpoint through a block grid:
//! - [`silhouette`] picks the boundary voxels of the box that face the viewer
//!   and the target points on them
//! - [`traversal`] walks the grid from the viewer to each target and asks the
//!   [`ChunkProvider`] about opacity
//! - [`cache`] remembers resolved voxels around the viewer across queries
//! - [`OcclusionCuller`] ties them together and fails open on errors
//!
//! ```
//! use voxcull::{Aabb, ChunkProvider, OcclusionCuller, Point3};
//!
//! struct OpenAir;
//!
//! impl ChunkProvider for OpenAir {
//!     fn prepare_chunk(&mut self, _x: i32, _z: i32) -> voxcull::Result<bool> {
//!         Ok(true)
//!     }
//!
//!     fn is_opaque_full_cube(&mut self, _x: i32, _y: i32, _z: i32) -> voxcull::Result<bool> {
//!         Ok(false)
//!     }
//! }
//!
//! let mut culler = OcclusionCuller::new(16, OpenAir).unwrap();
//! let aabb = Aabb::from_bounds(1.0, 1.0, 1.0, 2.0, 2.0, 2.0);
//! assert!(culler.is_visible(&aabb, Point3::new(0.5, 0.5, -2.0)));
//! ```

pub mod cache;
pub mod config;
pub mod culler;
pub mod silhouette;
pub mod stats;
pub mod traversal;

pub use cache::{CacheCounts, VoxelState, VoxelStateCache};
pub use config::CullingConfig;
pub use culler::OcclusionCuller;
pub use stats::CullingStats;
pub use traversal::GridWalk;
pub use voxcull_core::{Aabb, CellBounds, ChunkProvider, Error, Point3, Result};
