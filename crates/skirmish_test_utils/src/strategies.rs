//! Property-based testing strategies.

use proptest::prelude::*;
use skirmish_core::prelude::*;

/// Positions within a square of the given half-extent.
pub fn arb_vec2(extent: f32) -> impl Strategy<Value = Vec2> {
    (-extent..extent, -extent..extent).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Costs with independent metal and energy components (either may be
/// zero).
pub fn arb_cost() -> impl Strategy<Value = Cost> {
    (0.0f32..500.0, 0.0f32..500.0).prop_map(|(metal, energy)| Cost::new(metal, energy))
}

/// The two playing factions (never Neutral).
pub fn arb_faction() -> impl Strategy<Value = Faction> {
    prop_oneof![Just(Faction::Player), Just(Faction::Enemy)]
}
