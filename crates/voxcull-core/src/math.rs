//! Points, boxes, and integer voxel bounds.

use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Immutable point or direction with `f64` components.
///
/// Equality and hashing use the exact bit pattern of each component, so
/// `Point3` can key hash maps. `0.0` and `-0.0` are distinct values.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point3(DVec3);

impl Point3 {
    /// The origin.
    pub const ZERO: Self = Self(DVec3::ZERO);

    /// Create a new point
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// Create a point with all components set to `v`
    #[inline]
    #[must_use]
    pub const fn splat(v: f64) -> Self {
        Self(DVec3::splat(v))
    }

    #[inline]
    #[must_use]
    pub const fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub const fn y(self) -> f64 {
        self.0.y
    }

    #[inline]
    #[must_use]
    pub const fn z(self) -> f64 {
        self.0.z
    }

    /// Offset by the given amounts on each axis.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self(self.0 + DVec3::new(dx, dy, dz))
    }

    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.0.dot(other.0)
    }

    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self(self.0.cross(other.0))
    }

    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        self.0.distance_squared(other.0)
    }

    /// Component-wise product.
    #[inline]
    #[must_use]
    pub fn mul_components(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Returns true if no component is NaN or infinite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Integer cell containing this point (component-wise floor).
    pub fn cell(self) -> Result<IVec3> {
        Ok(IVec3::new(
            floor_i32(self.0.x)?,
            floor_i32(self.0.y)?,
            floor_i32(self.0.z)?,
        ))
    }

    #[inline]
    fn bits(self) -> [u64; 3] {
        [self.0.x.to_bits(), self.0.y.to_bits(), self.0.z.to_bits()]
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Point3 {}

impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl From<DVec3> for Point3 {
    fn from(v: DVec3) -> Self {
        Self(v)
    }
}

impl From<IVec3> for Point3 {
    fn from(v: IVec3) -> Self {
        Self(v.as_dvec3())
    }
}

impl From<Point3> for DVec3 {
    fn from(p: Point3) -> Self {
        p.0
    }
}

impl Add for Point3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Neg for Point3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Floor to `i32`, rejecting non-finite and unrepresentable values.
pub(crate) fn floor_i32(v: f64) -> Result<i32> {
    to_i32(v.floor(), v)
}

/// Ceil to `i32`, rejecting non-finite and unrepresentable values.
pub(crate) fn ceil_i32(v: f64) -> Result<i32> {
    to_i32(v.ceil(), v)
}

fn to_i32(rounded: f64, original: f64) -> Result<i32> {
    if !original.is_finite() {
        return Err(Error::InvalidInput(format!(
            "non-finite coordinate {original}"
        )));
    }
    if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(Error::OutOfBounds(format!(
            "coordinate {original} does not fit the voxel grid"
        )));
    }
    Ok(rounded as i32)
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3,
    /// Maximum corner
    pub max: Point3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    #[must_use]
    pub const fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from its six bounds
    #[inline]
    #[must_use]
    pub const fn from_bounds(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> Self {
        Self {
            min: Point3::new(min_x, min_y, min_z),
            max: Point3::new(max_x, max_y, max_z),
        }
    }

    /// Create a zero-volume AABB at a point
    #[inline]
    #[must_use]
    pub const fn point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    /// Move the AABB by `offset`
    #[inline]
    #[must_use]
    pub fn translated(&self, offset: Point3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Integer voxel bounds after growing the box by `padding` on every side.
    ///
    /// Minimums are floored and maximums ceiled, giving a half-open range per
    /// axis.
    pub fn voxel_bounds(&self, padding: f64) -> Result<CellBounds> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidInput(format!("non-finite box {self:?}")));
        }
        let min = IVec3::new(
            floor_i32(self.min.x() - padding)?,
            floor_i32(self.min.y() - padding)?,
            floor_i32(self.min.z() - padding)?,
        );
        let max = IVec3::new(
            ceil_i32(self.max.x() + padding)?,
            ceil_i32(self.max.y() + padding)?,
            ceil_i32(self.max.z() + padding)?,
        );
        Ok(CellBounds::new(min, max))
    }
}

/// Half-open integer cell range `[min, max)` per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl CellBounds {
    #[inline]
    #[must_use]
    pub const fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Returns true if a real-valued point lies within the covered cells.
    #[inline]
    #[must_use]
    pub fn contains_point(&self, p: Point3) -> bool {
        let min = self.min.as_dvec3();
        let max = self.max.as_dvec3();
        p.x() >= min.x
            && p.x() < max.x
            && p.y() >= min.y
            && p.y() < max.y
            && p.z() >= min.z
            && p.z() < max.z
    }
}
