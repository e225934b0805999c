//! Test fixtures for voxcull.
//!
//! Provides an in-memory [`GridWorld`] chunk provider with call counting and
//! failure injection, a noise-based terrain builder, and probe layouts used by
//! the integration tests and benchmarks.

pub mod terrain;
pub mod world;

pub use terrain::{TerrainConfig, TerrainGenerator};
pub use world::{CallCounts, ColumnState, GridWorld};

use glam::IVec3;
use voxcull_core::{Aabb, Point3};

/// Entity-sized boxes (0.6 x 1.8 x 0.6) on a regular XZ grid around the origin.
///
/// `spacing` cells apart, `count` per axis, standing on `floor_y`.
#[must_use]
pub fn probe_grid(count: i32, spacing: i32, floor_y: f64) -> Vec<Aabb> {
    let half = count / 2;
    let mut boxes = Vec::with_capacity((count * count).max(0) as usize);
    for i in 0..count {
        for k in 0..count {
            let x = f64::from((i - half) * spacing) + 0.2;
            let z = f64::from((k - half) * spacing) + 0.2;
            boxes.push(Aabb::new(
                Point3::new(x, floor_y, z),
                Point3::new(x + 0.6, floor_y + 1.8, z + 0.6),
            ));
        }
    }
    boxes
}

/// Wall of opaque cells on the plane `z = at`, covering `[-half, half]` on X and Y.
pub fn wall_z(world: &mut GridWorld, at: i32, half: i32) {
    world.fill(
        IVec3::new(-half, -half, at),
        IVec3::new(half + 1, half + 1, at + 1),
    );
}
