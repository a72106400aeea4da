//! Data models for cargo placement and lifecycle (spec §3).
//!
//! - `Item`: a cargo unit with dimensions, mass, priority, expiry/usage
//!   budget, preferred zone, and at most one placement.
//! - `Placement`: an axis-aligned occupied box inside a container.
//! - `Container`: a rigid storage volume, immutable after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::types::{BoundingBox, Dimensional, Positioned, Vec3, validation};

fn validate_item_params(
    dims: (f64, f64, f64),
    mass: f64,
    priority: i32,
) -> Result<(), CoreError> {
    validation::validate_dimensions_3d(dims).map_err(CoreError::input_invalid)?;
    validation::validate_mass(mass).map_err(CoreError::input_invalid)?;
    validation::validate_priority(priority).map_err(CoreError::input_invalid)?;
    Ok(())
}

fn validate_container_params(dims: (f64, f64, f64)) -> Result<(), CoreError> {
    validation::validate_dimensions_3d(dims).map_err(CoreError::input_invalid)
}

/// An axis-aligned occupied box inside a container's local frame (spec §3
/// "Placement (occupied box)").
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Placement {
    #[schema(value_type = [f64; 3])]
    pub start: Vec3Tuple,
    #[schema(value_type = [f64; 3])]
    pub end: Vec3Tuple,
}

/// `(w, d, h)` tuple alias used at serialization boundaries; `Vec3` carries
/// the same data internally.
pub type Vec3Tuple = (f64, f64, f64);

impl Placement {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start: start.as_tuple(),
            end: end.as_tuple(),
        }
    }

    /// Builds a placement from a start corner and an oriented item box, the
    /// form every packer candidate produces (spec §4.2 Insert).
    pub fn from_start_and_extents(start: Vec3, extents: Vec3) -> Self {
        let end = start + extents;
        Self {
            start: start.as_tuple(),
            end: end.as_tuple(),
        }
    }

    #[inline]
    pub fn start_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.start)
    }

    #[inline]
    pub fn end_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.end)
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.end_vec3() - self.start_vec3()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.start_vec3(), self.end_vec3())
    }
}

impl Positioned for Placement {
    fn position(&self) -> Vec3 {
        self.start_vec3()
    }
}

impl Dimensional for Placement {
    fn dimensions(&self) -> Vec3 {
        self.extents()
    }
}

/// Why an item transitioned to the waste state (spec §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WasteReason {
    Expired,
    OutOfUses,
}

impl std::fmt::Display for WasteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "Expired"),
            Self::OutOfUses => write!(f, "Out of Uses"),
        }
    }
}

/// Where an item currently sits: which container, and its occupied box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemLocation {
    pub container_id: String,
    pub placement: Placement,
}

/// A cargo unit (spec §3 "Item").
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[schema(value_type = [f64; 3], example = json!([30.0, 40.0, 20.0]))]
    pub dims: Vec3Tuple,
    pub mass: f64,
    pub priority: i32,
    pub expiry: Option<NaiveDate>,
    pub usage_limit: Option<u32>,
    pub remaining_uses: Option<u32>,
    pub preferred_zone: String,
    pub location: Option<ItemLocation>,
    pub waste: bool,
    pub waste_reason: Option<WasteReason>,
}

impl Item {
    /// Creates a new, unplaced item with validation. `remaining_uses` is
    /// seeded to `usage_limit` (spec §3: "initially equal to limit").
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        name: String,
        dims: (f64, f64, f64),
        mass: f64,
        priority: i32,
        expiry: Option<NaiveDate>,
        usage_limit: Option<u32>,
        preferred_zone: String,
    ) -> Result<Self, CoreError> {
        validate_item_params(dims, mass, priority)?;
        Ok(Self {
            id,
            name,
            dims,
            mass,
            priority,
            expiry,
            usage_limit,
            remaining_uses: usage_limit,
            preferred_zone,
            location: None,
            waste: false,
            waste_reason: None,
        })
    }

    #[inline]
    pub fn dims_as_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.dims_as_vec3().volume()
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.location.is_some()
    }

    /// Marks the item as waste, once. Waste is monotone (spec P6): a second
    /// call with a different reason is a no-op.
    pub fn mark_waste(&mut self, reason: WasteReason) {
        if !self.waste {
            self.waste = true;
            self.waste_reason = Some(reason);
        }
    }

    /// Applies the expiry rule (spec §4.6): transitions to waste if
    /// `expiry <= today` and not already waste.
    pub fn apply_expiry(&mut self, today: NaiveDate) {
        if self.waste {
            return;
        }
        if let Some(expiry) = self.expiry {
            if expiry <= today {
                self.mark_waste(WasteReason::Expired);
            }
        }
    }

    /// Decrements remaining uses by one (not below zero); marks waste if the
    /// count reaches zero (spec §4.6 "Usage application").
    pub fn apply_usage(&mut self) {
        if self.waste {
            return;
        }
        if let Some(remaining) = self.remaining_uses {
            let next = remaining.saturating_sub(1);
            self.remaining_uses = Some(next);
            if next == 0 {
                self.mark_waste(WasteReason::OutOfUses);
            }
        }
    }

    /// Transitions to waste if usage is already depleted (spec §4.6
    /// "Depletion"), independent of `apply_usage` having run today.
    pub fn apply_depletion(&mut self) {
        if self.waste {
            return;
        }
        if matches!(self.remaining_uses, Some(0)) {
            self.mark_waste(WasteReason::OutOfUses);
        }
    }
}

/// A rigid, axis-aligned storage volume with a single open face at D=0
/// (spec §3 "Container"). Immutable after creation.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Container {
    pub id: String,
    pub zone: String,
    #[schema(value_type = [f64; 3])]
    pub dims: Vec3Tuple,
}

impl Container {
    pub fn new(id: String, zone: String, dims: (f64, f64, f64)) -> Result<Self, CoreError> {
        validate_container_params(dims)?;
        Ok(Self { id, zone, dims })
    }

    #[inline]
    pub fn dims_as_vec3(&self) -> Vec3 {
        Vec3::from_tuple(self.dims)
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.dims_as_vec3().volume()
    }
}

impl Dimensional for Container {
    fn dimensions(&self) -> Vec3 {
        self.dims_as_vec3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn sample_item() -> Item {
        Item::new(
            "I1".into(),
            "Widget".into(),
            (10.0, 10.0, 10.0),
            5.0,
            50,
            None,
            None,
            "A".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_item_rejects_invalid_dims() {
        let err = Item::new(
            "I1".into(),
            "Widget".into(),
            (-1.0, 10.0, 10.0),
            5.0,
            50,
            None,
            None,
            "A".into(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_item_rejects_priority_out_of_range() {
        let err = Item::new(
            "I1".into(),
            "Widget".into(),
            (1.0, 1.0, 1.0),
            5.0,
            0,
            None,
            None,
            "A".into(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_apply_expiry_marks_waste_once_due() {
        let mut item = sample_item();
        item.expiry = Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        item.apply_expiry(today());
        assert!(item.waste);
        assert_eq!(item.waste_reason, Some(WasteReason::Expired));
    }

    #[test]
    fn test_apply_usage_depletes_and_marks_waste() {
        let mut item = sample_item();
        item.usage_limit = Some(1);
        item.remaining_uses = Some(1);
        item.apply_usage();
        assert_eq!(item.remaining_uses, Some(0));
        assert!(item.waste);
        assert_eq!(item.waste_reason, Some(WasteReason::OutOfUses));
    }

    #[test]
    fn test_waste_is_monotone() {
        let mut item = sample_item();
        item.mark_waste(WasteReason::Expired);
        item.mark_waste(WasteReason::OutOfUses);
        assert_eq!(item.waste_reason, Some(WasteReason::Expired));
    }

    #[test]
    fn test_remaining_uses_never_goes_negative() {
        let mut item = sample_item();
        item.usage_limit = Some(1);
        item.remaining_uses = Some(0);
        item.apply_usage();
        assert_eq!(item.remaining_uses, Some(0));
    }

    #[test]
    fn test_placement_from_start_and_extents() {
        let placement = Placement::from_start_and_extents(Vec3::zero(), Vec3::new(10.0, 20.0, 5.0));
        assert_eq!(placement.start, (0.0, 0.0, 0.0));
        assert_eq!(placement.end, (10.0, 20.0, 5.0));
    }
}
