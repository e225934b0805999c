//! Silhouette selection: which boundary voxels of a box face the viewer, and
//! which points on them are worth a ray.

use bitflags::bitflags;
use glam::IVec3;
use voxcull_core::{CellBounds, Point3};

use crate::cache::{VoxelState, VoxelStateCache};

/// Where a box lies along one axis relative to the viewer's cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relative {
    /// Entirely on the negative side.
    Negative,
    /// Straddles the viewer's cell.
    Inside,
    /// Entirely on the positive side.
    Positive,
}

impl Relative {
    /// Classify a half-open cell range `[min, max)` measured from the viewer's cell.
    #[inline]
    #[must_use]
    pub const fn classify(min: i64, max: i64) -> Self {
        if min > 0 && max > 0 {
            Self::Positive
        } else if min < 0 && max <= 0 {
            Self::Negative
        } else {
            Self::Inside
        }
    }
}

/// Per-axis classification of a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Facing {
    pub x: Relative,
    pub y: Relative,
    pub z: Relative,
}

impl Facing {
    /// Classify `bounds` relative to the viewer's cell.
    #[must_use]
    pub fn classify(bounds: &CellBounds, viewer_cell: IVec3) -> Self {
        let rel = |min: i32, max: i32, at: i32| {
            Relative::classify(
                i64::from(min) - i64::from(at),
                i64::from(max) - i64::from(at),
            )
        };
        Self {
            x: rel(bounds.min.x, bounds.max.x, viewer_cell.x),
            y: rel(bounds.min.y, bounds.max.y, viewer_cell.y),
            z: rel(bounds.min.z, bounds.max.z, viewer_cell.z),
        }
    }

    /// Returns true if any of the given box faces points toward the viewer.
    ///
    /// The low face on an axis is seen from a box on the positive side, the
    /// high face from a box on the negative side.
    #[must_use]
    pub const fn sees_any(self, faces: Faces) -> bool {
        (faces.contains(Faces::NEG_X) && matches!(self.x, Relative::Positive))
            || (faces.contains(Faces::POS_X) && matches!(self.x, Relative::Negative))
            || (faces.contains(Faces::NEG_Y) && matches!(self.y, Relative::Positive))
            || (faces.contains(Faces::POS_Y) && matches!(self.y, Relative::Negative))
            || (faces.contains(Faces::NEG_Z) && matches!(self.z, Relative::Positive))
            || (faces.contains(Faces::POS_Z) && matches!(self.z, Relative::Negative))
    }
}

bitflags! {
    /// Box faces a voxel lies on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Faces: u8 {
        const NEG_X = 0b00_0001;
        const POS_X = 0b00_0010;
        const NEG_Y = 0b00_0100;
        const POS_Y = 0b00_1000;
        const NEG_Z = 0b01_0000;
        const POS_Z = 0b10_0000;
    }
}

/// A boundary voxel that may be visible, with the box faces it lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SilhouetteVoxel {
    pub cell: IVec3,
    pub faces: Faces,
}

/// Outcome of scanning a box's cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scan {
    /// A cell of the box is already known to be visible.
    Visible,
    /// Voxels that still need a ray, in scan order.
    Candidates(Vec<SilhouetteVoxel>),
}

/// Box faces touched by `cell`.
#[inline]
#[must_use]
pub fn faces_of(bounds: &CellBounds, cell: IVec3) -> Faces {
    let mut faces = Faces::empty();
    faces.set(Faces::NEG_X, cell.x == bounds.min.x);
    faces.set(Faces::POS_X, cell.x == bounds.max.x - 1);
    faces.set(Faces::NEG_Y, cell.y == bounds.min.y);
    faces.set(Faces::POS_Y, cell.y == bounds.max.y - 1);
    faces.set(Faces::NEG_Z, cell.z == bounds.min.z);
    faces.set(Faces::POS_Z, cell.z == bounds.max.z - 1);
    faces
}

/// Scan every cached cell of `bounds` (X outermost, Z innermost).
///
/// Cells outside the cache radius are skipped without being visited: they
/// can neither short-circuit nor become candidates.
pub fn scan(bounds: &CellBounds, facing: Facing, cache: &mut VoxelStateCache) -> Scan {
    let radius = cache.radius() as i32;
    let lo = bounds.min.max(IVec3::splat(-radius));
    let hi = bounds.max.min(IVec3::splat(radius + 1));

    let mut candidates = Vec::new();
    for x in lo.x..hi.x {
        for y in lo.y..hi.y {
            for z in lo.z..hi.z {
                let cell = IVec3::new(x, y, z);
                match cache.state(cell) {
                    VoxelState::Visible => return Scan::Visible,
                    VoxelState::Unknown => {
                        let faces = faces_of(bounds, cell);
                        if facing.sees_any(faces) {
                            candidates.push(SilhouetteVoxel { cell, faces });
                        }
                    }
                    VoxelState::Blocked | VoxelState::OutOfRange => {}
                }
            }
        }
    }
    Scan::Candidates(candidates)
}

/// Most target points any voxel can produce.
pub const MAX_TARGETS: usize = 8;

/// Corner emission order; bit 0 selects the far X side, bit 1 far Y, bit 2 far Z.
const CORNER_ORDER: [u8; MAX_TARGETS] = [0b000, 0b001, 0b010, 0b100, 0b011, 0b110, 0b101, 0b111];

const fn corner_mask(faces: u8) -> u8 {
    let f = Faces::from_bits_truncate(faces);
    let near = f.intersects(Faces::NEG_X.union(Faces::NEG_Y).union(Faces::NEG_Z));
    let px = f.contains(Faces::POS_X);
    let py = f.contains(Faces::POS_Y);
    let pz = f.contains(Faces::POS_Z);
    let wanted = [
        near,
        px,
        py,
        pz,
        px && py,
        py && pz,
        px && pz,
        px && py && pz,
    ];
    let mut mask = 0;
    let mut i = 0;
    while i < MAX_TARGETS {
        if wanted[i] {
            mask |= 1 << i;
        }
        i += 1;
    }
    mask
}

const fn build_target_table() -> [u8; 64] {
    let mut table = [0; 64];
    let mut faces = 0;
    while faces < 64 {
        table[faces] = corner_mask(faces as u8);
        faces += 1;
    }
    table
}

/// For each face combination, the `CORNER_ORDER` entries to emit.
static TARGET_TABLE: [u8; 64] = build_target_table();

/// Fixed-capacity list of target points for one voxel.
#[derive(Clone, Copy, Debug)]
pub struct Targets {
    points: [Point3; MAX_TARGETS],
    len: usize,
}

impl Targets {
    #[must_use]
    pub fn as_slice(&self) -> &[Point3] {
        &self.points[..self.len]
    }
}

impl std::ops::Deref for Targets {
    type Target = [Point3];

    fn deref(&self) -> &[Point3] {
        self.as_slice()
    }
}

/// Target points on `voxel`, inset by `inset` from its unit cube.
#[must_use]
pub fn target_points(voxel: SilhouetteVoxel, inset: f64) -> Targets {
    let base = Point3::from(voxel.cell);
    let near = inset;
    let far = 1.0 - inset;
    let mask = TARGET_TABLE[usize::from(voxel.faces.bits())];

    let mut targets = Targets {
        points: [Point3::ZERO; MAX_TARGETS],
        len: 0,
    };
    for (i, corner) in CORNER_ORDER.iter().enumerate() {
        if mask & (1 << i) == 0 {
            continue;
        }
        let pick = |bit: u8| if corner & bit == 0 { near } else { far };
        targets.points[targets.len] = base.offset(pick(0b001), pick(0b010), pick(0b100));
        targets.len += 1;
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: i32, max: i32) -> CellBounds {
        CellBounds::new(IVec3::splat(min), IVec3::splat(max))
    }

    #[test]
    fn classify_axes() {
        assert_eq!(Relative::classify(1, 3), Relative::Positive);
        assert_eq!(Relative::classify(-3, 0), Relative::Negative);
        assert_eq!(Relative::classify(0, 3), Relative::Inside);
        assert_eq!(Relative::classify(-3, 1), Relative::Inside);
    }

    #[test]
    fn facing_is_relative_to_viewer_cell() {
        let b = CellBounds::new(IVec3::new(0, 0, 0), IVec3::new(3, 3, 3));
        let facing = Facing::classify(&b, IVec3::new(0, 0, -2));
        assert_eq!(facing.x, Relative::Inside);
        assert_eq!(facing.y, Relative::Inside);
        assert_eq!(facing.z, Relative::Positive);

        let facing = Facing::classify(&b, IVec3::new(5, 1, 1));
        assert_eq!(facing.x, Relative::Negative);
    }

    #[test]
    fn only_near_faces_are_candidates() {
        let mut cache = VoxelStateCache::new(16);
        let b = CellBounds::new(IVec3::new(0, 0, 0), IVec3::new(3, 3, 3));
        let facing = Facing::classify(&b, IVec3::new(0, 0, -2));
        let Scan::Candidates(voxels) = scan(&b, facing, &mut cache) else {
            panic!("nothing cached yet");
        };
        assert_eq!(voxels.len(), 9);
        assert!(voxels.iter().all(|v| v.cell.z == 0));
        assert!(voxels.iter().all(|v| v.faces.contains(Faces::NEG_Z)));
        assert_eq!(voxels[0].cell, IVec3::new(0, 0, 0));
        assert_eq!(voxels[1].cell, IVec3::new(0, 1, 0));
        assert_eq!(voxels[3].cell, IVec3::new(1, 0, 0));
    }

    #[test]
    fn corner_viewer_sees_three_faces() {
        let mut cache = VoxelStateCache::new(16);
        let b = bounds(2, 5);
        let facing = Facing::classify(&b, IVec3::ZERO);
        let Scan::Candidates(voxels) = scan(&b, facing, &mut cache) else {
            panic!("nothing cached yet");
        };
        // 27 cells minus the 8 that touch none of the three low faces.
        assert_eq!(voxels.len(), 19);
    }

    #[test]
    fn visible_cell_short_circuits() {
        let mut cache = VoxelStateCache::new(16);
        cache.state(IVec3::new(1, 1, 1));
        cache.mark_last_visible();
        let b = bounds(0, 3);
        let facing = Facing::classify(&b, IVec3::splat(-4));
        assert_eq!(scan(&b, facing, &mut cache), Scan::Visible);
    }

    #[test]
    fn blocked_cells_are_excluded() {
        let mut cache = VoxelStateCache::new(16);
        let b = CellBounds::new(IVec3::new(0, 0, 0), IVec3::new(3, 3, 3));
        let facing = Facing::classify(&b, IVec3::new(0, 0, -2));
        cache.state(IVec3::new(1, 1, 0));
        cache.mark_last_blocked();
        let Scan::Candidates(voxels) = scan(&b, facing, &mut cache) else {
            panic!("no visible cells");
        };
        assert_eq!(voxels.len(), 8);
        assert!(!voxels.iter().any(|v| v.cell == IVec3::new(1, 1, 0)));
    }

    #[test]
    fn scan_skips_cells_beyond_radius() {
        let mut cache = VoxelStateCache::new(4);
        let b = CellBounds::new(IVec3::new(2, 0, 0), IVec3::new(40, 1, 1));
        let facing = Facing::classify(&b, IVec3::ZERO);
        let Scan::Candidates(voxels) = scan(&b, facing, &mut cache) else {
            panic!("no visible cells");
        };
        assert_eq!(
            voxels,
            vec![SilhouetteVoxel {
                cell: IVec3::new(2, 0, 0),
                faces: Faces::NEG_X | Faces::NEG_Y | Faces::POS_Y | Faces::NEG_Z | Faces::POS_Z,
            }]
        );
    }

    #[test]
    fn single_near_face_emits_near_corner() {
        let voxel = SilhouetteVoxel {
            cell: IVec3::new(1, 2, 3),
            faces: Faces::NEG_Z,
        };
        let targets = target_points(voxel, 0.05);
        let near = Point3::new(1.0, 2.0, 3.0).offset(0.05, 0.05, 0.05);
        assert_eq!(&*targets, &[near]);
    }

    #[test]
    fn far_faces_emit_edges_and_corner() {
        let voxel = SilhouetteVoxel {
            cell: IVec3::ZERO,
            faces: Faces::POS_X | Faces::POS_Y | Faces::POS_Z,
        };
        let targets = target_points(voxel, 0.05);
        assert_eq!(
            &*targets,
            &[
                Point3::new(0.95, 0.05, 0.05),
                Point3::new(0.05, 0.95, 0.05),
                Point3::new(0.05, 0.05, 0.95),
                Point3::new(0.95, 0.95, 0.05),
                Point3::new(0.05, 0.95, 0.95),
                Point3::new(0.95, 0.05, 0.95),
                Point3::new(0.95, 0.95, 0.95),
            ]
        );
    }

    #[test]
    fn isolated_voxel_emits_all_eight() {
        let voxel = SilhouetteVoxel {
            cell: IVec3::new(-3, 0, 7),
            faces: Faces::all(),
        };
        assert_eq!(target_points(voxel, 0.05).len(), MAX_TARGETS);
    }

    #[test]
    fn interior_voxel_emits_nothing() {
        let voxel = SilhouetteVoxel {
            cell: IVec3::ZERO,
            faces: Faces::empty(),
        };
        assert!(target_points(voxel, 0.05).is_empty());
    }
}
