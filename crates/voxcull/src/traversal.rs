//! Grid traversal between two points and the opacity test along it.
//!
//! Uses the parametric cell walk from "A Fast Voxel Traversal Algorithm for
//! Ray Tracing" (Amanatides & Woo): every cell the segment passes through is
//! visited once, in order.

use glam::{DVec3, IVec3};
use voxcull_core::{chunk_column, to_world, ChunkProvider, Error, Point3, Result};

use crate::cache::{VoxelState, VoxelStateCache};
use crate::stats::CullingStats;

/// Iterator over the cells a segment passes through, start cell first and
/// end cell last.
#[derive(Clone, Debug)]
pub struct GridWalk {
    cell: IVec3,
    step: IVec3,
    t_next: DVec3,
    t_delta: DVec3,
    remaining: u32,
}

/// Per-axis setup: (step, boundaries crossed, first crossing, crossing interval).
fn axis(start: f64, end: f64) -> (i32, i64, f64, f64) {
    let span = (end - start).abs();
    if span == 0.0 {
        return (0, 0, f64::INFINITY, f64::INFINITY);
    }
    let t_delta = 1.0 / span;
    let start_floor = start.floor();
    let end_floor = end.floor();
    if end > start {
        let crossed = (end_floor - start_floor) as i64;
        (1, crossed, (start_floor + 1.0 - start) * t_delta, t_delta)
    } else {
        let crossed = (start_floor - end_floor) as i64;
        (-1, crossed, (start - start_floor) * t_delta, t_delta)
    }
}

impl GridWalk {
    /// Walk from `start` to `end`.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::InvalidInput(format!(
                "non-finite ray {start:?} -> {end:?}"
            )));
        }
        let cell = start.cell()?;
        end.cell()?;

        let (sx, nx, tx, dx) = axis(start.x(), end.x());
        let (sy, ny, ty, dy) = axis(start.y(), end.y());
        let (sz, nz, tz, dz) = axis(start.z(), end.z());
        let remaining = u32::try_from(1 + nx + ny + nz).map_err(|_| {
            Error::OutOfBounds(format!("ray {start:?} -> {end:?} crosses too many cells"))
        })?;

        Ok(Self {
            cell,
            step: IVec3::new(sx, sy, sz),
            t_next: DVec3::new(tx, ty, tz),
            t_delta: DVec3::new(dx, dy, dz),
            remaining,
        })
    }

    /// Move to the next cell along the axis whose boundary comes first.
    /// Ties go to Y, then X, then Z.
    fn advance(&mut self) {
        let t = self.t_next;
        if t.y <= t.x && t.y <= t.z {
            self.cell.y += self.step.y;
            self.t_next.y += self.t_delta.y;
        } else if t.x <= t.z {
            self.cell.x += self.step.x;
            self.t_next.x += self.t_delta.x;
        } else {
            self.cell.z += self.step.z;
            self.t_next.z += self.t_delta.z;
        }
    }
}

impl Iterator for GridWalk {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cell;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for GridWalk {}

/// Where local cells live in the world, for provider lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldFrame {
    pub origin: IVec3,
    pub chunk_bits: u32,
}

/// Trace from `start` to `target`, testing every cell except the target's own.
///
/// Returns `Ok(true)` if no tested cell is opaque and every needed chunk was
/// ready. Resolved cells inside the cache radius are recorded in `cache`;
/// cells outside it are looked up every time.
pub fn trace<P: ChunkProvider + ?Sized>(
    start: Point3,
    target: Point3,
    cache: &mut VoxelStateCache,
    provider: &mut P,
    frame: WorldFrame,
    stats: &mut CullingStats,
) -> Result<bool> {
    let walk = GridWalk::new(start, target)?;
    let tested = walk.len() - 1;

    for cell in walk.take(tested) {
        match cache.state(cell) {
            VoxelState::Blocked => return Ok(false),
            VoxelState::Visible => {}
            VoxelState::Unknown | VoxelState::OutOfRange => {
                let world = to_world(cell, frame.origin)?;
                let (chunk_x, chunk_z) = chunk_column(world, frame.chunk_bits);
                stats.provider_lookups += 1;
                if !provider.prepare_chunk(chunk_x, chunk_z)? {
                    stats.chunks_not_ready += 1;
                    return Ok(false);
                }
                if provider.is_opaque_full_cube(world.x, world.y, world.z)? {
                    cache.mark_last_blocked();
                    return Ok(false);
                }
                cache.mark_last_visible();
            }
        }
    }
    Ok(true)
}
