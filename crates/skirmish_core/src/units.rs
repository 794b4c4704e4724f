//! Mobile agents: movement planning, combat state, and worker tasks.
//!
//! A unit may move, fight, build, and repair in the same tick; each
//! concern keeps its own state and the orchestrator sequences them.
//! All cross-entity references held here are IDs revalidated on use.

use serde::{Deserialize, Serialize};

use crate::combat::{CombatTarget, Weapon};
use crate::defs::{BuildingDef, BuildingDefId, UnitDef, UnitDefId};
use crate::entity::{Body, EntityId, Faction, Health};
use crate::math::{normalize_angle, Vec2};

/// How close a worker must be to a build site (edge to edge) before it
/// starts placing the building.
pub const BUILD_REACH: f32 = 24.0;

/// Maximum distance at which a worker can repair.
pub const REPAIR_RANGE: f32 = 48.0;

/// Metal debited per hit point repaired.
pub const REPAIR_METAL_PER_HP: f32 = 0.5;

/// Energy debited per hit point repaired.
pub const REPAIR_ENERGY_PER_HP: f32 = 0.25;

/// An in-flight construction assignment.
///
/// `building` stays `None` while the worker travels to the site; once
/// the worker is in reach it places the building and records its ID.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildTask {
    /// Definition of the building to construct.
    pub def: BuildingDefId,
    /// Center of the intended footprint.
    pub site: Vec2,
    /// The placed building, once instantiated.
    pub building: Option<EntityId>,
}

impl BuildTask {
    /// Whether the worker has placed the building and is constructing.
    #[must_use]
    pub const fn is_building(&self) -> bool {
        self.building.is_some()
    }
}

/// A mobile combat/worker agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Shared identity and geometry.
    pub body: Body,
    /// Definition this unit was spawned from.
    pub def: UnitDefId,
    /// Health state.
    pub health: Health,
    /// Current velocity (world units per second), for render interpolation.
    pub velocity: Vec2,
    /// Facing in radians.
    pub angle: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Turn rate in radians per second.
    pub rotation_speed: f32,
    /// Active movement order, if any.
    pub move_target: Option<Vec2>,
    /// True when `move_target` was set by combat pursuit rather than an
    /// explicit order; pursuit may overwrite it freely.
    pub pursuing: bool,
    /// Weapon state, if the definition carries one.
    pub weapon: Option<Weapon>,
    /// Whether this unit can build and repair, and how fast it repairs.
    pub repair_rate: Option<f32>,
    /// Current construction assignment.
    pub build_task: Option<BuildTask>,
    /// Unit under repair; revalidated every tick.
    pub repair_target: Option<EntityId>,
    /// UI selection flag, preserved across snapshot rebuilds.
    pub selected: bool,
}

impl Unit {
    /// Instantiate a unit from its definition.
    #[must_use]
    pub fn from_def(id: EntityId, def: &UnitDef, faction: Faction, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, faction, pos, def.size),
            def: def.id,
            health: Health::new(def.health),
            velocity: Vec2::ZERO,
            angle: 0.0,
            speed: def.speed,
            rotation_speed: def.rotation_speed,
            move_target: None,
            pursuing: false,
            weapon: def.weapon.map(Weapon::from_def),
            repair_rate: def.worker.map(|w| w.repair_rate),
            build_task: None,
            repair_target: None,
            selected: false,
        }
    }

    /// Whether this unit can construct buildings and repair units.
    #[must_use]
    pub const fn is_worker(&self) -> bool {
        self.repair_rate.is_some()
    }

    /// Order the unit to a position, replacing any current movement.
    pub fn order_move(&mut self, target: Vec2) {
        self.move_target = Some(target);
        self.pursuing = false;
    }

    /// Stop all movement and clear worker/combat orders.
    pub fn order_stop(&mut self) {
        self.move_target = None;
        self.pursuing = false;
        self.velocity = Vec2::ZERO;
        self.build_task = None;
        self.repair_target = None;
        if let Some(weapon) = &mut self.weapon {
            weapon.target = None;
        }
    }

    /// Order an attack on a hostile unit. No-op for unarmed units.
    pub fn order_attack_unit(&mut self, target: EntityId) {
        if let Some(weapon) = &mut self.weapon {
            weapon.target = Some(CombatTarget::Unit(target));
        }
    }

    /// Order an attack on a hostile building. No-op for unarmed units.
    pub fn order_attack_building(&mut self, target: EntityId) {
        if let Some(weapon) = &mut self.weapon {
            weapon.target = Some(CombatTarget::Building(target));
        }
    }

    /// Assign a construction task.
    ///
    /// Clears any in-progress build state and orders movement to a
    /// standoff point next to the footprint so the worker does not end
    /// up inside it. No-op for non-workers.
    pub fn assign_build(&mut self, def: &BuildingDef, site: Vec2) {
        if !self.is_worker() {
            return;
        }
        self.build_task = Some(BuildTask {
            def: def.id,
            site,
            building: None,
        });
        self.repair_target = None;
        // Stand off below the footprint edge.
        let standoff = Vec2::new(
            site.x,
            site.y + def.size.y / 2.0 + self.body.size.y / 2.0 + BUILD_REACH / 2.0,
        );
        self.order_move(standoff);
    }

    /// Order this worker to repair a damaged unit. No-op for non-workers.
    pub fn order_repair(&mut self, target: EntityId) {
        if !self.is_worker() {
            return;
        }
        self.repair_target = Some(target);
        self.build_task = None;
    }

    /// Whether an explicit (non-pursuit) movement order is in progress.
    #[must_use]
    pub fn has_movement_order(&self) -> bool {
        self.move_target.is_some() && !self.pursuing
    }

    /// Edge-to-edge reach check against a build site footprint.
    #[must_use]
    pub fn in_build_reach(&self, site: Vec2, footprint: Vec2) -> bool {
        let reach = footprint.x.max(footprint.y) / 2.0 + self.body.size.x.max(self.body.size.y) / 2.0 + BUILD_REACH;
        self.body.pos.distance_squared(site) <= reach * reach
    }

    /// Plan this tick's movement, rotating toward the target bearing.
    ///
    /// Returns the desired next position for collision resolution, or
    /// `None` when there is no movement order. When the target is
    /// within one step the unit snaps exactly onto it and clears the
    /// order.
    pub fn desired_step(&mut self, dt: f32) -> Option<Vec2> {
        let target = self.move_target?;

        let to_target = target - self.body.pos;
        let bearing = to_target.bearing();
        let diff = normalize_angle(bearing - self.angle);
        let max_turn = self.rotation_speed * dt;
        self.angle = normalize_angle(self.angle + diff.clamp(-max_turn, max_turn));

        let step = self.speed * dt;
        if self.body.pos.distance_squared(target) <= step * step {
            self.move_target = None;
            self.pursuing = false;
            self.velocity = Vec2::ZERO;
            return Some(target);
        }

        let dir = Vec2::from_angle(self.angle);
        self.velocity = dir.scale(self.speed);
        Some(self.body.pos + dir.scale(step))
    }
}
