//! Query counters.

/// Running counters for an [`OcclusionCuller`](crate::OcclusionCuller).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullingStats {
    /// Calls to `is_visible` / `try_is_visible`.
    pub queries: u64,
    /// Queries answered visible because the viewer is inside the box.
    pub viewer_inside: u64,
    /// Queries answered visible from a cached visible cell in the box.
    pub cache_short_circuits: u64,
    /// Target points traced.
    pub rays_cast: u64,
    /// Cells resolved through the chunk provider.
    pub provider_lookups: u64,
    /// Rays abandoned because a chunk was not ready.
    pub chunks_not_ready: u64,
    /// Queries answered visible because of an internal failure.
    pub fail_open: u64,
}
