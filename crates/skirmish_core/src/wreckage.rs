//! Wreckage left behind by destroyed units and buildings.
//!
//! Wreckage is inert: a neutral body plus a reclaimable metal value
//! computed once at creation and immutable afterward.

use serde::{Deserialize, Serialize};

use crate::entity::{Body, EntityId, Faction};
use crate::math::Vec2;
use crate::resources::Cost;

/// Metal value of a destroyed unit whose definition carries no cost.
pub const UNIT_WRECK_FALLBACK: f32 = 25.0;

/// Metal value of a destroyed building whose definition carries no cost.
pub const BUILDING_WRECK_FALLBACK: f32 = 50.0;

/// Fraction of the definition's metal cost returned as wreckage value.
const WRECK_VALUE_FACTOR: f32 = 0.5;

/// A terminal remnant of a destroyed entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wreckage {
    /// Shared identity and geometry; always neutral.
    pub body: Body,
    /// Reclaimable metal, fixed at creation.
    pub metal_value: f32,
}

impl Wreckage {
    fn value_for(cost: Option<&Cost>, fallback: f32) -> f32 {
        match cost {
            Some(c) if c.metal > 0.0 => c.metal * WRECK_VALUE_FACTOR,
            _ => fallback,
        }
    }

    /// Wreckage for a destroyed unit at its last known position.
    /// `cost` is the unit definition's cost, if the definition is
    /// still known.
    #[must_use]
    pub fn from_unit(id: EntityId, pos: Vec2, size: Vec2, cost: Option<&Cost>) -> Self {
        Self {
            body: Body::new(id, Faction::Neutral, pos, size),
            metal_value: Self::value_for(cost, UNIT_WRECK_FALLBACK),
        }
    }

    /// Wreckage for a destroyed building at its last known position.
    #[must_use]
    pub fn from_building(id: EntityId, pos: Vec2, size: Vec2, cost: Option<&Cost>) -> Self {
        Self {
            body: Body::new(id, Faction::Neutral, pos, size),
            metal_value: Self::value_for(cost, BUILDING_WRECK_FALLBACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_half_metal_cost() {
        let w = Wreckage::from_unit(1, Vec2::ZERO, Vec2::new(16.0, 16.0), Some(&Cost::new(80.0, 40.0)));
        assert_eq!(w.metal_value, 40.0);
        assert_eq!(w.body.faction, Faction::Neutral);

        let b = Wreckage::from_building(2, Vec2::ZERO, Vec2::new(48.0, 48.0), Some(&Cost::new(300.0, 0.0)));
        assert_eq!(b.metal_value, 150.0);
    }

    #[test]
    fn test_fallback_when_cost_missing_or_zero() {
        let unknown = Wreckage::from_unit(1, Vec2::ZERO, Vec2::new(16.0, 16.0), None);
        assert_eq!(unknown.metal_value, UNIT_WRECK_FALLBACK);

        // Energy-only cost has no primary (metal) entry.
        let energy_only =
            Wreckage::from_building(2, Vec2::ZERO, Vec2::new(48.0, 48.0), Some(&Cost::new(0.0, 120.0)));
        assert_eq!(energy_only.metal_value, BUILDING_WRECK_FALLBACK);
    }
}
