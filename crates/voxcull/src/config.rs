//! Culler configuration.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use voxcull_core::constants::CHUNK_BITS;
use voxcull_core::{Error, Result};

/// Smallest reach that leaves a cacheable region around the origin.
pub const MIN_REACH: u32 = 3;
/// Largest supported reach (a 513³ cache, 2 bits per cell).
pub const MAX_REACH: u32 = 256;

/// Configuration for an [`OcclusionCuller`](crate::OcclusionCuller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Maximum voxel distance considered. Sizes the state cache to a cube of
    /// side `2 * reach + 1`; cells more than `reach - 2` from the origin are
    /// never cached.
    pub reach: u32,
    /// Margin added on every side of a box before it is snapped to cells.
    pub box_padding: f64,
    /// Distance target points are pulled inside their voxel.
    pub target_inset: f64,
    /// Log2 of the chunk column width used for `prepare_chunk`.
    pub chunk_bits: u32,
    /// World cell of the local frame origin. Added to local cells before they
    /// are handed to the chunk provider.
    pub origin: IVec3,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            reach: 64,
            box_padding: 0.25,
            target_inset: 0.05,
            chunk_bits: CHUNK_BITS,
            origin: IVec3::ZERO,
        }
    }
}

impl CullingConfig {
    /// Default configuration with the given reach.
    #[must_use]
    pub fn with_reach(reach: u32) -> Self {
        Self {
            reach,
            ..Default::default()
        }
    }

    /// Check that the configuration describes a usable culler.
    pub fn validate(&self) -> Result<()> {
        if self.reach < MIN_REACH {
            return Err(Error::Config(format!(
                "reach must be at least {MIN_REACH}, got {}",
                self.reach
            )));
        }
        if self.reach > MAX_REACH {
            return Err(Error::Config(format!(
                "reach {} exceeds the supported maximum of {MAX_REACH}",
                self.reach
            )));
        }
        if !(self.box_padding.is_finite() && self.box_padding >= 0.0) {
            return Err(Error::Config(format!(
                "box padding must be finite and non-negative, got {}",
                self.box_padding
            )));
        }
        if !(self.target_inset > 0.0 && self.target_inset < 0.5) {
            return Err(Error::Config(format!(
                "target inset must lie in (0, 0.5), got {}",
                self.target_inset
            )));
        }
        if self.chunk_bits >= 31 {
            return Err(Error::Config(format!(
                "chunk bits must be below 31, got {}",
                self.chunk_bits
            )));
        }
        Ok(())
    }
}
