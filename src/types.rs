//! Common types and traits for container-local 3D geometry.
//!
//! This module defines the coordinate convention shared by every other
//! module: points and extents are ordered `(w, d, h)` — W across the open
//! face, D into the container (D=0 is the open face), H upward.

use std::ops::{Add, Mul, Sub};

/// Global numerical tolerance for floating-point comparisons that are not
/// scaled to a particular container (volumes, masses, priorities).
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Computes the coordinate tolerance for one axis of a container, per the
/// rule "ε = 10⁻⁶ × container extent on each axis" (spec §4.1). Containers
/// with a zero extent on some axis fall back to `EPSILON_GENERAL`.
#[inline]
pub fn axis_epsilon(container_extent: f64) -> f64 {
    let scaled = container_extent.abs() * EPSILON_GENERAL;
    if scaled > 0.0 { scaled } else { EPSILON_GENERAL }
}

/// A point or extent in container-local coordinates.
///
/// # Examples
/// ```
/// use cargohold::types::Vec3;
///
/// let origin = Vec3::new(0.0, 0.0, 0.0);
/// let extents = Vec3::new(30.0, 40.0, 20.0);
/// let end = origin + extents;
/// assert_eq!(end, extents);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub w: f64,
    pub d: f64,
    pub h: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(w: f64, d: f64, h: f64) -> Self {
        Self { w, d, h }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Converts to tuple format for API/serialization compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.w, self.d, self.h)
    }

    #[inline]
    pub const fn from_tuple(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }

    /// Volume (product of all components).
    #[inline]
    pub fn volume(&self) -> f64 {
        self.w * self.d * self.h
    }

    /// Checks that all components are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.w > 0.0
            && self.d > 0.0
            && self.h > 0.0
            && self.w.is_finite()
            && self.d.is_finite()
            && self.h.is_finite()
    }

    /// Component-wise `self <= container`, within `tolerance` on each axis.
    #[inline]
    pub fn fits_within(&self, container: &Self, tolerance: f64) -> bool {
        self.w <= container.w + tolerance
            && self.d <= container.d + tolerance
            && self.h <= container.h + tolerance
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.w + rhs.w, self.d + rhs.d, self.h + rhs.h)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.w - rhs.w, self.d - rhs.d, self.h - rhs.h)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.w * scalar, self.d * scalar, self.h * scalar)
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    #[inline]
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self::from_tuple(tuple)
    }
}

impl From<Vec3> for (f64, f64, f64) {
    #[inline]
    fn from(vec: Vec3) -> Self {
        vec.as_tuple()
    }
}

/// Trait for objects with 3D (w, d, h) extents.
pub trait Dimensional {
    fn dimensions(&self) -> Vec3;

    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    fn fits_in(&self, container_dims: &Vec3, tolerance: f64) -> bool {
        self.dimensions().fits_within(container_dims, tolerance)
    }
}

/// Trait for objects with a start-corner position in container-local space.
pub trait Positioned {
    fn position(&self) -> Vec3;
}

/// Trait for objects with a mass, in kilograms.
pub trait Weighted {
    fn mass(&self) -> f64;
}

/// An Axis-Aligned Bounding Box, used for containment and overlap queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Start corner.
    pub min: Vec3,
    /// End corner.
    pub max: Vec3,
}

impl BoundingBox {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_position_and_dims(position: Vec3, dims: Vec3) -> Self {
        Self {
            min: position,
            max: position + dims,
        }
    }

    /// Strict interior overlap test (spec §3 non-overlap invariant): boxes
    /// that merely touch at a face are not considered overlapping.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.w <= other.min.w
            || other.max.w <= self.min.w
            || self.max.h <= other.min.h
            || other.max.h <= self.min.h
            || self.max.d <= other.min.d
            || other.max.d <= self.min.d)
    }

    #[inline]
    fn overlap_1d(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
        (a_max.min(b_max) - a_min.max(b_min)).max(0.0)
    }

    /// Overlap of the (W, H) projections of two boxes — used by the
    /// obstruction analyzer (spec §4.5).
    #[inline]
    pub fn overlap_area_wh(&self, other: &Self) -> f64 {
        let overlap_w = Self::overlap_1d(self.min.w, self.max.w, other.min.w, other.max.w);
        let overlap_h = Self::overlap_1d(self.min.h, self.max.h, other.min.h, other.max.h);
        overlap_w * overlap_h
    }

    #[inline]
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.w >= self.min.w
            && point.w <= self.max.w
            && point.d >= self.min.d
            && point.d <= self.max.d
            && point.h >= self.min.h
            && point.h <= self.max.h
    }

    /// Containment of `self` inside `outer`, within per-axis tolerance.
    #[inline]
    pub fn contained_in(&self, outer: &Self, tolerance: f64) -> bool {
        self.min.w >= outer.min.w - tolerance
            && self.min.d >= outer.min.d - tolerance
            && self.min.h >= outer.min.h - tolerance
            && self.max.w <= outer.max.w + tolerance
            && self.max.d <= outer.max.d + tolerance
            && self.max.h <= outer.max.h + tolerance
    }

    #[inline]
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Validation helpers shared by `model.rs` and the CSV importer (DRY).
pub mod validation {
    pub fn validate_dimension(value: f64, name: &str) -> Result<(), String> {
        if value <= 0.0 {
            return Err(format!("{} must be positive, got: {}", name, value));
        }
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        Ok(())
    }

    pub fn validate_mass(value: f64) -> Result<(), String> {
        if value <= 0.0 {
            return Err(format!("Mass must be positive, got: {}", value));
        }
        if value.is_nan() {
            return Err("Mass must not be NaN".to_string());
        }
        if value.is_infinite() {
            return Err("Mass must not be infinite".to_string());
        }
        Ok(())
    }

    pub fn validate_dimensions_3d(dims: (f64, f64, f64)) -> Result<(), String> {
        validate_dimension(dims.0, "Width")?;
        validate_dimension(dims.1, "Depth")?;
        validate_dimension(dims.2, "Height")?;
        Ok(())
    }

    pub fn validate_priority(value: i32) -> Result<(), String> {
        if !(1..=100).contains(&value) {
            return Err(format!("Priority must be in 1..=100, got: {}", value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_vec3_volume() {
        let dims = Vec3::new(10.0, 20.0, 30.0);
        assert!((dims.volume() - 6000.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_vec3_fits_within() {
        let small = Vec3::new(5.0, 5.0, 5.0);
        let large = Vec3::new(10.0, 10.0, 10.0);

        assert!(small.fits_within(&large, EPSILON_GENERAL));
        assert!(!large.fits_within(&small, EPSILON_GENERAL));
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(10.0, 10.0, 10.0));
        let b = BoundingBox::from_position_and_dims(
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(10.0, 10.0, 10.0),
        );
        let c = BoundingBox::from_position_and_dims(
            Vec3::new(20.0, 20.0, 20.0),
            Vec3::new(10.0, 10.0, 10.0),
        );

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_bounding_box_touching_faces_do_not_intersect() {
        let a = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(10.0, 10.0, 10.0));
        let b = BoundingBox::from_position_and_dims(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 10.0),
        );
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_bounding_box_overlap_area_wh() {
        let a = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(10.0, 10.0, 10.0));
        let b = BoundingBox::from_position_and_dims(
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(10.0, 10.0, 10.0),
        );

        let overlap = a.overlap_area_wh(&b);
        assert!((overlap - 25.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_contained_in() {
        let outer = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(100.0, 100.0, 100.0));
        let inner = BoundingBox::from_position_and_dims(
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(20.0, 20.0, 20.0),
        );
        let outside = BoundingBox::from_position_and_dims(
            Vec3::new(90.0, 90.0, 90.0),
            Vec3::new(20.0, 20.0, 20.0),
        );

        assert!(inner.contained_in(&outer, EPSILON_GENERAL));
        assert!(!outside.contained_in(&outer, EPSILON_GENERAL));
    }

    #[test]
    fn test_validation_dimension() {
        assert!(validation::validate_dimension(10.0, "Width").is_ok());
        assert!(validation::validate_dimension(0.0, "Width").is_err());
        assert!(validation::validate_dimension(-1.0, "Width").is_err());
        assert!(validation::validate_dimension(f64::NAN, "Width").is_err());
        assert!(validation::validate_dimension(f64::INFINITY, "Width").is_err());
    }

    #[test]
    fn test_validation_mass() {
        assert!(validation::validate_mass(10.0).is_ok());
        assert!(validation::validate_mass(0.0).is_err());
        assert!(validation::validate_mass(-1.0).is_err());
    }

    #[test]
    fn test_validation_priority() {
        assert!(validation::validate_priority(1).is_ok());
        assert!(validation::validate_priority(100).is_ok());
        assert!(validation::validate_priority(0).is_err());
        assert!(validation::validate_priority(101).is_err());
    }
}
