//! Coordinate mapping between the local query frame, world cells, and chunk columns.
//!
//! Queries run in a local frame whose origin sits near the viewer. The chunk
//! backend addresses cells in world space; `to_world` applies the frame
//! origin and `chunk_column` finds the column that holds a world cell.

use glam::IVec3;

use crate::error::{Error, Result};

/// Translate a local cell into world space.
pub fn to_world(local: IVec3, origin: IVec3) -> Result<IVec3> {
    let add = |a: i32, b: i32| {
        a.checked_add(b).ok_or_else(|| {
            Error::OutOfBounds(format!("cell {local} offset by {origin} overflows"))
        })
    };
    Ok(IVec3::new(
        add(local.x, origin.x)?,
        add(local.y, origin.y)?,
        add(local.z, origin.z)?,
    ))
}

/// Chunk column `(x, z)` holding a world cell.
///
/// Arithmetic shift, so negative cells land in negative columns.
#[inline]
#[must_use]
pub const fn chunk_column(world: IVec3, chunk_bits: u32) -> (i32, i32) {
    (world.x >> chunk_bits, world.z >> chunk_bits)
}
