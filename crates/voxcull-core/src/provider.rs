//! Interface to the chunk backend that knows which blocks are opaque.

use crate::error::Result;

/// Source of block opacity for visibility queries.
///
/// Coordinates are world cells. A query calls `prepare_chunk` before the
/// first opacity lookup in a column, and `cleanup` once after every traced
/// ray, whatever its outcome, so implementations can pin chunk data for the
/// duration of a ray and release it afterwards.
///
/// Errors are treated as unexpected failures: the query that hit one reports
/// the box as visible.
pub trait ChunkProvider {
    /// Make the chunk column at `(chunk_x, chunk_z)` ready for lookups.
    ///
    /// Returns `Ok(false)` when the column is not loaded; the ray being traced
    /// is then treated as blocked.
    fn prepare_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool>;

    /// Returns true if the block at the world cell is a fully opaque cube.
    fn is_opaque_full_cube(&mut self, x: i32, y: i32, z: i32) -> Result<bool>;

    /// Release anything acquired while tracing the last ray.
    fn cleanup(&mut self) {}
}

impl<P: ChunkProvider + ?Sized> ChunkProvider for &mut P {
    fn prepare_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool> {
        (**self).prepare_chunk(chunk_x, chunk_z)
    }

    fn is_opaque_full_cube(&mut self, x: i32, y: i32, z: i32) -> Result<bool> {
        (**self).is_opaque_full_cube(x, y, z)
    }

    fn cleanup(&mut self) {
        (**self).cleanup();
    }
}

impl<P: ChunkProvider + ?Sized> ChunkProvider for Box<P> {
    fn prepare_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Result<bool> {
        (**self).prepare_chunk(chunk_x, chunk_z)
    }

    fn is_opaque_full_cube(&mut self, x: i32, y: i32, z: i32) -> Result<bool> {
        (**self).is_opaque_full_cube(x, y, z)
    }

    fn cleanup(&mut self) {
        (**self).cleanup();
    }
}
