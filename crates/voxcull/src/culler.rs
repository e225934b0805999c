//! Visibility queries: can any part of a box be seen from the viewer?

use glam::IVec3;
use voxcull_core::{Aabb, ChunkProvider, Point3, Result};

use crate::cache::VoxelStateCache;
use crate::config::CullingConfig;
use crate::silhouette::{self, Facing, Scan};
use crate::stats::CullingStats;
use crate::traversal::{self, WorldFrame};

/// Occlusion culler for one viewer.
///
/// Boxes and the viewer position are given in a local frame whose origin sits
/// in or next to the viewer's voxel; the cache is centred on that origin.
/// [`CullingConfig::origin`] maps local cells to the world cells the provider
/// understands.
///
/// Cached opacity is never invalidated on its own. Call
/// [`reset_cache`](Self::reset_cache) when blocks change or the local frame
/// moves.
///
/// Queries take `&mut self`; share a culler across threads behind a lock or
/// keep one per viewer.
pub struct OcclusionCuller<P> {
    config: CullingConfig,
    cache: VoxelStateCache,
    provider: P,
    stats: CullingStats,
}

impl<P: ChunkProvider> OcclusionCuller<P> {
    /// Create a culler with default settings and the given reach.
    pub fn new(reach: u32, provider: P) -> Result<Self> {
        Self::with_config(CullingConfig::with_reach(reach), provider)
    }

    /// Create a culler from a full configuration.
    pub fn with_config(config: CullingConfig, provider: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: VoxelStateCache::new(config.reach),
            config,
            provider,
            stats: CullingStats::default(),
        })
    }

    /// Returns true if any part of `aabb` may be visible from `viewer`.
    ///
    /// Never fails: internal errors are logged and answered with `true`, so a
    /// failing lookup can only cause overdraw, never a missing object.
    pub fn is_visible(&mut self, aabb: &Aabb, viewer: Point3) -> bool {
        match self.try_is_visible(aabb, viewer) {
            Ok(visible) => visible,
            Err(error) => {
                self.stats.fail_open += 1;
                tracing::warn!(
                    %error,
                    ?aabb,
                    ?viewer,
                    "visibility query failed, treating box as visible"
                );
                true
            }
        }
    }

    /// Like [`is_visible`](Self::is_visible) but reports internal errors.
    #[cfg_attr(
        feature = "profiling",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn try_is_visible(&mut self, aabb: &Aabb, viewer: Point3) -> Result<bool> {
        self.stats.queries += 1;

        let bounds = aabb.voxel_bounds(self.config.box_padding)?;
        let viewer_cell = viewer.cell()?;
        if bounds.contains_point(viewer) {
            self.stats.viewer_inside += 1;
            return Ok(true);
        }

        let facing = Facing::classify(&bounds, viewer_cell);
        let candidates = match silhouette::scan(&bounds, facing, &mut self.cache) {
            Scan::Visible => {
                self.stats.cache_short_circuits += 1;
                return Ok(true);
            }
            Scan::Candidates(candidates) => candidates,
        };

        let frame = WorldFrame {
            origin: self.config.origin,
            chunk_bits: self.config.chunk_bits,
        };
        for voxel in candidates {
            let targets = silhouette::target_points(voxel, self.config.target_inset);
            for &target in targets.iter() {
                if self.cast(viewer, target, frame)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Trace one ray, then let the provider release what it pinned.
    fn cast(&mut self, viewer: Point3, target: Point3, frame: WorldFrame) -> Result<bool> {
        #[cfg(feature = "profiling")]
        let _span = tracing::trace_span!("voxcull.cast").entered();

        self.stats.rays_cast += 1;
        let result = traversal::trace(
            viewer,
            target,
            &mut self.cache,
            &mut self.provider,
            frame,
            &mut self.stats,
        );
        self.provider.cleanup();
        result
    }

    /// Forget all cached voxel states.
    pub fn reset_cache(&mut self) {
        let counts = self.cache.counts();
        self.cache.reset();
        tracing::debug!(
            visible = counts.visible,
            blocked = counts.blocked,
            "occlusion cache reset"
        );
    }

    /// Move the local frame to a new world origin.
    ///
    /// The cache is kept; reset it if its contents no longer describe the
    /// cells around the new origin.
    pub fn set_origin(&mut self, origin: IVec3) {
        self.config.origin = origin;
    }

    /// World cell of the local frame origin.
    #[must_use]
    pub const fn origin(&self) -> IVec3 {
        self.config.origin
    }

    #[must_use]
    pub const fn config(&self) -> &CullingConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &VoxelStateCache {
        &self.cache
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    #[must_use]
    pub const fn stats(&self) -> &CullingStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CullingStats::default();
    }
}
