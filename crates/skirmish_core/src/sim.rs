//! Match orchestration: the fixed-tick simulation loop.
//!
//! [`Match`] owns every entity collection and sequences one tick in a
//! strict, deterministic order: ledger flow, unit movement and worker
//! tasks, combat, projectile resolution, dead-entity cleanup, building
//! production, the commander (AI) step, fog of war, and finally the
//! victory check. No step reads state a later step of the same tick
//! produces, and nothing in here blocks or performs I/O.

use serde::{Deserialize, Serialize};

use crate::buildings::{Building, OrderError};
use crate::collision::CollisionWorld;
use crate::combat;
use crate::defs::{BuildingDefId, DefRegistry, UnitDefId};
use crate::entity::{EntityId, Faction};
use crate::fog::FogOfWar;
use crate::math::{Bounds, Vec2};
use crate::projectiles::Projectile;
use crate::resources::{Cost, ResourceKind, ResourceLedger};
use crate::units::{Unit, REPAIR_ENERGY_PER_HP, REPAIR_METAL_PER_HP, REPAIR_RANGE};
use crate::wreckage::Wreckage;

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Duration of one tick in seconds.
pub const TICK_SECONDS: f32 = 1.0 / TICK_RATE as f32;

/// Fog grid tile size in world units.
const FOG_TILE_SIZE: f32 = 32.0;

/// Match result, re-evaluated every tick; terminal once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Both sides still have forces.
    InProgress,
    /// All enemy units and buildings destroyed.
    Victory,
    /// All player forces destroyed, or the player command structure
    /// was lost.
    Defeat,
}

/// What happened during one tick, for logging and UI feedback.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Buildings whose construction finished this tick.
    pub completed_buildings: Vec<EntityId>,
    /// Units that came off a production queue this tick.
    pub produced_units: Vec<EntityId>,
    /// Units destroyed this tick.
    pub destroyed_units: Vec<EntityId>,
    /// Buildings destroyed this tick.
    pub destroyed_buildings: Vec<EntityId>,
    /// Projectiles launched this tick.
    pub shots_fired: u32,
}

/// A per-faction decision maker driven once per tick.
///
/// Commanders issue orders exclusively through [`Match`]'s public
/// methods; there is no privileged API.
pub trait Commander {
    /// Inspect the match and issue orders for this tick.
    fn update(&mut self, dt: f32, sim: &mut Match);
}

/// A commander that never issues orders.
pub struct NullCommander;

impl Commander for NullCommander {
    fn update(&mut self, _dt: f32, _sim: &mut Match) {}
}

/// A complete match simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub(crate) defs: DefRegistry,
    pub(crate) units: Vec<Unit>,
    pub(crate) buildings: Vec<Building>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) wreckage: Vec<Wreckage>,
    pub(crate) ledgers: [ResourceLedger; 3],
    pub(crate) collision: CollisionWorld,
    pub(crate) fog: FogOfWar,
    pub(crate) outcome: MatchOutcome,
    pub(crate) ticks: u64,
    pub(crate) next_id: EntityId,
}

impl Match {
    /// Create an empty match on the given terrain.
    #[must_use]
    pub fn new(defs: DefRegistry, terrain: Bounds) -> Self {
        Self {
            defs,
            units: Vec::new(),
            buildings: Vec::new(),
            projectiles: Vec::new(),
            wreckage: Vec::new(),
            ledgers: Default::default(),
            collision: CollisionWorld::new(terrain),
            fog: FogOfWar::new(terrain, FOG_TILE_SIZE),
            outcome: MatchOutcome::InProgress,
            ticks: 0,
            next_id: 0,
        }
    }

    /// The definition registry for this match.
    #[must_use]
    pub fn defs(&self) -> &DefRegistry {
        &self.defs
    }

    /// All units, active and not-yet-cleaned-up.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// All buildings.
    #[must_use]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Wreckage on the field.
    #[must_use]
    pub fn wreckage(&self) -> &[Wreckage] {
        &self.wreckage
    }

    /// A faction's resource ledger.
    #[must_use]
    pub fn ledger(&self, faction: Faction) -> &ResourceLedger {
        &self.ledgers[faction.index()]
    }

    /// Mutable access to a faction's ledger (match setup, cheats).
    pub fn ledger_mut(&mut self, faction: Faction) -> &mut ResourceLedger {
        &mut self.ledgers[faction.index()]
    }

    /// The fog-of-war grid.
    #[must_use]
    pub fn fog(&self) -> &FogOfWar {
        &self.fog
    }

    /// Current match result.
    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Look up a unit by ID.
    #[must_use]
    pub fn unit(&self, id: EntityId) -> Option<&Unit> {
        self.units.iter().find(|u| u.body.id == id)
    }

    /// Look up a unit by ID, mutably.
    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.body.id == id)
    }

    /// Look up a building by ID.
    #[must_use]
    pub fn building(&self, id: EntityId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.body.id == id)
    }

    /// Look up a building by ID, mutably.
    pub fn building_mut(&mut self, id: EntityId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.body.id == id)
    }

    fn alloc_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }

    /// Spawn a unit. Unknown definitions are skipped: no entity is
    /// produced and `None` is returned.
    pub fn spawn_unit(&mut self, def: UnitDefId, faction: Faction, pos: Vec2) -> Option<EntityId> {
        let def = self.defs.unit(def)?.clone();
        let id = self.alloc_id();
        self.units.push(Unit::from_def(id, &def, faction, pos));
        Some(id)
    }

    /// Place a building construction site. Unknown definitions are
    /// skipped.
    pub fn spawn_building(&mut self, def: BuildingDefId, faction: Faction, pos: Vec2) -> Option<EntityId> {
        let def = self.defs.building(def)?.clone();
        let id = self.alloc_id();
        self.buildings.push(Building::from_def(id, &def, faction, pos));
        Some(id)
    }

    /// Spawn a finished building (map setup), applying its passive
    /// economy effects immediately.
    pub fn spawn_completed_building(
        &mut self,
        def: BuildingDefId,
        faction: Faction,
        pos: Vec2,
    ) -> Option<EntityId> {
        let def = self.defs.building(def)?.clone();
        let id = self.alloc_id();
        self.buildings
            .push(Building::completed_from_def(id, &def, faction, pos));
        self.apply_passive_effects(def.id, faction);
        Some(id)
    }

    /// Queue unit production on a building the commander owns.
    pub fn order_produce(&mut self, building: EntityId, unit: UnitDefId) -> Result<(), OrderError> {
        let Some(idx) = self
            .buildings
            .iter()
            .position(|b| b.body.id == building && b.body.active)
        else {
            return Err(OrderError::NoSuchBuilding(building));
        };
        let Some(def) = self.defs.building(self.buildings[idx].def) else {
            return Err(OrderError::CannotProduce(unit));
        };
        self.buildings[idx].enqueue_production(def, unit)
    }

    /// Run one fixed tick. Returns the events the tick produced; ticks
    /// after the match has ended are no-ops.
    pub fn tick(&mut self, commander: &mut dyn Commander) -> TickEvents {
        let mut events = TickEvents::default();
        if self.outcome != MatchOutcome::InProgress {
            return events;
        }
        let dt = TICK_SECONDS;

        // Ledger flow runs exactly once, before any spend this tick.
        for ledger in &mut self.ledgers {
            ledger.update(dt);
        }

        self.update_movement(dt);
        self.update_workers(dt, &mut events);
        self.update_repair(dt);
        self.update_combat(dt, &mut events);
        self.update_projectiles(dt);
        self.cleanup(&mut events);
        self.update_production(dt, &mut events);
        commander.update(dt, self);
        self.update_fog();
        self.evaluate_outcome();

        for ledger in &mut self.ledgers {
            ledger.reset_drains();
        }
        self.ticks += 1;

        if !events.destroyed_units.is_empty() || !events.destroyed_buildings.is_empty() {
            tracing::debug!(
                tick = self.ticks,
                units = events.destroyed_units.len(),
                buildings = events.destroyed_buildings.len(),
                "entities destroyed"
            );
        }
        events
    }

    fn update_movement(&mut self, dt: f32) {
        for i in 0..self.units.len() {
            if !self.units[i].body.active || self.units[i].move_target.is_none() {
                continue;
            }

            let obstacles: Vec<Bounds> = self
                .units
                .iter()
                .enumerate()
                .filter(|(j, u)| *j != i && u.body.active)
                .map(|(_, u)| u.body.bounds())
                .chain(
                    self.buildings
                        .iter()
                        .filter(|b| b.body.active)
                        .map(|b| b.body.bounds()),
                )
                .collect();

            let current = self.units[i].body.bounds();
            let Some(desired) = self.units[i].desired_step(dt) else {
                continue;
            };
            let resolved = self.collision.resolve_movement(&current, desired, &obstacles);

            // Pinned in place with somewhere still to go: steer around.
            if resolved.distance_squared(current.center()) < 1e-6 {
                if let Some(target) = self.units[i].move_target {
                    let step = self.units[i].speed * dt;
                    let sidestep = self
                        .collision
                        .avoidance_direction(&current, target, step, &obstacles);
                    self.units[i].body.pos = sidestep;
                    continue;
                }
            }
            self.units[i].body.pos = resolved;
        }
    }

    fn update_workers(&mut self, dt: f32, events: &mut TickEvents) {
        for i in 0..self.units.len() {
            if !self.units[i].body.active {
                continue;
            }
            let Some(task) = self.units[i].build_task else {
                continue;
            };

            match task.building {
                None => {
                    let Some(def) = self.defs.building(task.def) else {
                        self.units[i].build_task = None;
                        continue;
                    };
                    let footprint = def.size;
                    if self.units[i].in_build_reach(task.site, footprint) {
                        let faction = self.units[i].body.faction;
                        if let Some(id) = self.spawn_building(task.def, faction, task.site) {
                            if let Some(t) = &mut self.units[i].build_task {
                                t.building = Some(id);
                            }
                            self.units[i].move_target = None;
                            self.units[i].velocity = Vec2::ZERO;
                        } else {
                            self.units[i].build_task = None;
                        }
                    }
                }
                Some(building_id) => {
                    let Some(def) = self.defs.building(task.def) else {
                        self.units[i].build_task = None;
                        continue;
                    };
                    let (cost, build_time, def_id) = (def.cost, def.build_time, def.id);
                    let faction = self.units[i].body.faction;
                    let fidx = faction.index();

                    let Some(site) = self
                        .buildings
                        .iter_mut()
                        .find(|b| b.body.id == building_id && b.body.active)
                    else {
                        // Site destroyed under construction.
                        self.units[i].build_task = None;
                        continue;
                    };
                    if site.advance_construction(dt, build_time, &cost, &mut self.ledgers[fidx]) {
                        self.apply_passive_effects(def_id, faction);
                        self.units[i].build_task = None;
                        events.completed_buildings.push(building_id);
                        tracing::debug!(building = building_id, "construction complete");
                    }
                }
            }
        }
    }

    /// One-time ledger deltas for a building that just completed.
    fn apply_passive_effects(&mut self, def: BuildingDefId, faction: Faction) {
        let Some(def) = self.defs.building(def) else {
            return;
        };
        let ledger = &mut self.ledgers[faction.index()];
        for effect in &def.effects {
            if effect.production > 0.0 {
                ledger.add_production(effect.kind, effect.production);
            }
            if effect.consumption > 0.0 {
                ledger.add_consumption(effect.kind, effect.consumption);
            }
            if effect.capacity > 0.0 {
                ledger.add_capacity(effect.kind, effect.capacity);
            }
        }
    }

    fn update_repair(&mut self, dt: f32) {
        for i in 0..self.units.len() {
            if !self.units[i].body.active {
                continue;
            }
            let Some(rate) = self.units[i].repair_rate else {
                continue;
            };
            let Some(target_id) = self.units[i].repair_target else {
                continue;
            };

            let Some(j) = self
                .units
                .iter()
                .position(|u| u.body.id == target_id && u.body.active)
            else {
                self.units[i].repair_target = None;
                continue;
            };
            if j == i || self.units[j].health.is_full() {
                self.units[i].repair_target = None;
                continue;
            }
            if self.units[i].body.pos.distance_squared(self.units[j].body.pos)
                > REPAIR_RANGE * REPAIR_RANGE
            {
                continue;
            }

            // In range: stop and repair. All-or-nothing per tick - if
            // either balance cannot cover the full tick's cost, nothing
            // is healed and nothing is spent.
            self.units[i].move_target = None;
            self.units[i].pursuing = false;
            self.units[i].velocity = Vec2::ZERO;

            // On the final tick only the missing HP is restored, and
            // only that amount is charged.
            let heal = (rate * dt).min(self.units[j].health.missing());
            let cost = Cost::new(heal * REPAIR_METAL_PER_HP, heal * REPAIR_ENERGY_PER_HP);
            let fidx = self.units[i].body.faction.index();
            if self.ledgers[fidx].can_afford(&cost) {
                self.ledgers[fidx].spend_with_tracking(ResourceKind::Metal, cost.metal);
                self.ledgers[fidx].spend_with_tracking(ResourceKind::Energy, cost.energy);
                self.units[j].health.heal(heal);
            }
        }
    }

    fn update_combat(&mut self, dt: f32, events: &mut TickEvents) {
        // Units.
        for i in 0..self.units.len() {
            if !self.units[i].body.active {
                continue;
            }
            let Some(mut weapon) = self.units[i].weapon else {
                continue;
            };
            weapon.tick_cooldown(dt);

            let (id, faction, pos) = {
                let body = &self.units[i].body;
                (body.id, body.faction, body.pos)
            };

            // Invalidate dead or escaped targets, then seek.
            if let Some(target) = weapon.target {
                match combat::resolve_target(target, &self.units, &self.buildings) {
                    None => weapon.target = None,
                    Some((tpos, _)) => {
                        let pursuit = weapon.pursuit_range();
                        if pos.distance_squared(tpos) > pursuit * pursuit {
                            weapon.target = None;
                        }
                    }
                }
            }
            if weapon.target.is_none() {
                weapon.target =
                    combat::acquire_target(pos, faction, weapon.range, id, &self.units, &self.buildings);
            }

            if let Some(target) = weapon.target {
                if let Some((tpos, _)) = combat::resolve_target(target, &self.units, &self.buildings) {
                    let dist_sq = pos.distance_squared(tpos);
                    if dist_sq <= weapon.range * weapon.range {
                        // Engaged: a pursuing unit stops to fire.
                        if self.units[i].pursuing {
                            self.units[i].move_target = None;
                            self.units[i].pursuing = false;
                            self.units[i].velocity = Vec2::ZERO;
                        }
                        if weapon.ready() {
                            let id = self.alloc_id();
                            self.projectiles.push(Projectile::launch(
                                id,
                                faction,
                                pos,
                                tpos,
                                weapon.projectile_speed,
                                weapon.damage,
                                target,
                            ));
                            weapon.reset_cooldown();
                            events.shots_fired += 1;
                        }
                    } else if !self.units[i].has_movement_order() {
                        // Pursuing: chase, unless an explicit move order
                        // takes precedence.
                        self.units[i].move_target = Some(tpos);
                        self.units[i].pursuing = true;
                    }
                }
            }
            self.units[i].weapon = Some(weapon);
        }

        // Defensive buildings. Stationary: no pursuit, and a target
        // beyond fire range is dropped immediately.
        for i in 0..self.buildings.len() {
            if !self.buildings[i].body.active || !self.buildings[i].is_complete() {
                continue;
            }
            let Some(mut weapon) = self.buildings[i].turret else {
                continue;
            };
            weapon.tick_cooldown(dt);

            let (faction, pos) = {
                let body = &self.buildings[i].body;
                (body.faction, body.pos)
            };

            if let Some(target) = weapon.target {
                match combat::resolve_target(target, &self.units, &self.buildings) {
                    None => weapon.target = None,
                    Some((tpos, _)) => {
                        if pos.distance_squared(tpos) > weapon.range * weapon.range {
                            weapon.target = None;
                        }
                    }
                }
            }
            if weapon.target.is_none() {
                weapon.target =
                    combat::acquire_target(pos, faction, weapon.range, 0, &self.units, &self.buildings);
            }

            if let (Some(target), true) = (weapon.target, weapon.ready()) {
                if let Some((tpos, _)) = combat::resolve_target(target, &self.units, &self.buildings) {
                    // Energy gate: withhold the shot without resetting
                    // the cooldown, so fire resumes the moment energy
                    // is available.
                    let fidx = faction.index();
                    if self.ledgers[fidx].pool(ResourceKind::Energy).current >= weapon.energy_per_shot {
                        self.ledgers[fidx].spend_with_tracking(ResourceKind::Energy, weapon.energy_per_shot);
                        let id = self.alloc_id();
                        self.projectiles.push(Projectile::launch(
                            id,
                            faction,
                            pos,
                            tpos,
                            weapon.projectile_speed,
                            weapon.damage,
                            target,
                        ));
                        weapon.reset_cooldown();
                        events.shots_fired += 1;
                    }
                }
            }
            self.buildings[i].turret = Some(weapon);
        }
    }

    fn update_projectiles(&mut self, dt: f32) {
        let terrain = *self.collision.terrain();
        for projectile in &mut self.projectiles {
            if projectile.body.active {
                projectile.advance(dt, &terrain, &mut self.units, &mut self.buildings);
            }
        }
        self.projectiles.retain(|p| p.body.active);
    }

    fn cleanup(&mut self, events: &mut TickEvents) {
        for unit in &mut self.units {
            if unit.health.is_dead() {
                unit.body.active = false;
            }
        }
        for building in &mut self.buildings {
            if building.health.is_dead() {
                building.body.active = false;
            }
        }

        let units = std::mem::take(&mut self.units);
        for unit in units {
            if unit.body.active {
                self.units.push(unit);
            } else {
                let cost = self.defs.unit(unit.def).map(|d| d.cost);
                self.wreckage.push(Wreckage::from_unit(
                    unit.body.id,
                    unit.body.pos,
                    unit.body.size,
                    cost.as_ref(),
                ));
                events.destroyed_units.push(unit.body.id);
            }
        }

        let buildings = std::mem::take(&mut self.buildings);
        for building in buildings {
            if building.body.active {
                self.buildings.push(building);
            } else {
                // Losing a command structure ends the match at once,
                // independent of the aggregate force count.
                if building.command && self.outcome == MatchOutcome::InProgress {
                    self.outcome = match building.body.faction {
                        Faction::Player => MatchOutcome::Defeat,
                        Faction::Enemy => MatchOutcome::Victory,
                        Faction::Neutral => self.outcome,
                    };
                }
                let cost = self.defs.building(building.def).map(|d| d.cost);
                self.wreckage.push(Wreckage::from_building(
                    building.body.id,
                    building.body.pos,
                    building.body.size,
                    cost.as_ref(),
                ));
                events.destroyed_buildings.push(building.body.id);
            }
        }
    }

    fn update_production(&mut self, dt: f32, events: &mut TickEvents) {
        for i in 0..self.buildings.len() {
            if !self.buildings[i].body.active || !self.buildings[i].is_complete() {
                continue;
            }
            let Some(front) = self.buildings[i].queue.front().map(|j| j.unit) else {
                continue;
            };
            let Some(def) = self.defs.unit(front) else {
                // Unknown definition: drop the job, keep the queue going.
                self.buildings[i].queue.pop_front();
                continue;
            };
            let (cost, build_time, size) = (def.cost, def.build_time, def.size);
            let faction = self.buildings[i].body.faction;
            let fidx = faction.index();

            if let Some(unit_def) = self.buildings[i].advance_production(dt, build_time, &cost, &mut self.ledgers[fidx]) {
                let spawn = self.buildings[i].spawn_point(size);
                let rally = self.buildings[i].rally;
                if let Some(id) = self.spawn_unit(unit_def, faction, spawn) {
                    if let Some(rally) = rally {
                        if let Some(unit) = self.unit_mut(id) {
                            unit.order_move(rally);
                        }
                    }
                    events.produced_units.push(id);
                    tracing::debug!(unit = id, "production complete");
                }
            }
        }
    }

    fn update_fog(&mut self) {
        self.fog.clear_visibility();
        for unit in self.units.iter().filter(|u| u.body.active) {
            if unit.body.faction != Faction::Player {
                continue;
            }
            if let Some(def) = self.defs.unit(unit.def) {
                self.fog.reveal_circle(unit.body.pos, def.sight_range);
            }
        }
        for building in self.buildings.iter().filter(|b| b.body.active) {
            if building.body.faction != Faction::Player {
                continue;
            }
            if let Some(def) = self.defs.building(building.def) {
                self.fog.reveal_circle(building.body.pos, def.sight_range);
            }
        }
    }

    fn evaluate_outcome(&mut self) {
        if self.outcome != MatchOutcome::InProgress {
            return;
        }
        let count = |faction: Faction| {
            self.units
                .iter()
                .filter(|u| u.body.active && u.body.faction == faction)
                .count()
                + self
                    .buildings
                    .iter()
                    .filter(|b| b.body.active && b.body.faction == faction)
                    .count()
        };
        if count(Faction::Enemy) == 0 {
            self.outcome = MatchOutcome::Victory;
        } else if count(Faction::Player) == 0 {
            self.outcome = MatchOutcome::Defeat;
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::prelude::*;
    use skirmish_test_utils::fixtures;

    fn run_ticks(sim: &mut Match, n: usize) {
        let mut commander = NullCommander;
        for _ in 0..n {
            sim.tick(&mut commander);
        }
    }

    #[test]
    fn test_unknown_defs_are_skipped() {
        let mut sim = fixtures::empty_match();
        assert!(sim.spawn_unit(UnitDefId(99), Faction::Player, Vec2::ZERO).is_none());
        assert!(sim
            .spawn_building(BuildingDefId(99), Faction::Player, Vec2::ZERO)
            .is_none());
        assert!(sim.units().is_empty());
        assert!(sim.buildings().is_empty());
    }

    #[test]
    fn test_victory_when_no_enemies_remain() {
        let mut sim = fixtures::empty_match();
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(100.0, 100.0));
        run_ticks(&mut sim, 1);
        assert_eq!(sim.outcome(), MatchOutcome::Victory);

        // A finished match no longer simulates.
        let ticks = sim.ticks();
        run_ticks(&mut sim, 5);
        assert_eq!(sim.ticks(), ticks);
    }

    #[test]
    fn test_defeat_when_player_wiped() {
        let mut sim = fixtures::empty_match();
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(100.0, 100.0));
        run_ticks(&mut sim, 1);
        assert_eq!(sim.outcome(), MatchOutcome::Defeat);
    }

    #[test]
    fn test_command_structure_loss_is_instant_defeat() {
        let mut sim = fixtures::empty_match();
        let hq = sim
            .spawn_completed_building(fixtures::COMMAND_POST, Faction::Player, Vec2::new(200.0, 200.0))
            .expect("hq");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(400.0, 400.0));
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1800.0, 1800.0));

        sim.building_mut(hq).expect("hq").health.apply_damage(1e9);
        run_ticks(&mut sim, 1);

        // Player still has a unit, but the command post is gone.
        assert_eq!(sim.outcome(), MatchOutcome::Defeat);
    }

    #[test]
    fn test_destroyed_unit_leaves_wreckage_at_half_metal_cost() {
        let mut sim = fixtures::empty_match();
        let id = sim
            .spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(100.0, 100.0))
            .expect("unit");
        // Keep an enemy alive so the match continues.
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));

        sim.unit_mut(id).expect("unit").health.apply_damage(1e9);
        run_ticks(&mut sim, 1);

        assert!(sim.unit(id).is_none());
        let wreck = sim.wreckage().iter().find(|w| w.body.id == id).expect("wreck");
        assert_eq!(wreck.metal_value, fixtures::RIFLEMAN_COST.metal * 0.5);
    }

    #[test]
    fn test_production_spawns_outside_and_rallies() {
        let mut sim = fixtures::empty_match();
        fixtures::stock(&mut sim, Faction::Player, 10_000.0, 10_000.0);
        let factory = sim
            .spawn_completed_building(fixtures::FACTORY, Faction::Player, Vec2::new(300.0, 300.0))
            .expect("factory");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));

        let rally = Vec2::new(500.0, 300.0);
        sim.building_mut(factory).expect("factory").rally = Some(rally);
        sim.order_produce(factory, fixtures::RIFLEMAN).expect("order");

        // Rifleman build time is 2s; allow slack for the epsilon snap.
        run_ticks(&mut sim, 125);

        let produced = sim
            .units()
            .iter()
            .find(|u| u.body.faction == Faction::Player)
            .expect("produced unit");
        assert!(!sim.building(factory).expect("factory").body.bounds().contains(produced.body.pos)
            || produced.body.pos.distance(rally) < 300.0);
        assert!(produced.move_target.is_some() || produced.body.pos.distance(rally) < 16.0);
    }

    #[test]
    fn test_production_stalls_without_resources_then_resumes() {
        let mut sim = fixtures::empty_match();
        let factory = sim
            .spawn_completed_building(fixtures::FACTORY, Faction::Player, Vec2::new(300.0, 300.0))
            .expect("factory");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));
        sim.order_produce(factory, fixtures::RIFLEMAN).expect("order");

        run_ticks(&mut sim, 240);
        let job = sim.building(factory).expect("factory").queue.front().copied().expect("job");
        assert_eq!(job.progress, 0.0);

        fixtures::stock(&mut sim, Faction::Player, 10_000.0, 10_000.0);
        run_ticks(&mut sim, 130);
        assert!(sim.building(factory).expect("factory").queue.is_empty());
        assert_eq!(
            sim.units()
                .iter()
                .filter(|u| u.body.faction == Faction::Player)
                .count(),
            1
        );
    }

    #[test]
    fn test_repair_is_all_or_nothing_per_tick() {
        let mut sim = fixtures::empty_match();
        fixtures::stock(&mut sim, Faction::Player, 0.1, 10_000.0);
        let engineer = sim
            .spawn_unit(fixtures::ENGINEER, Faction::Player, Vec2::new(100.0, 100.0))
            .expect("engineer");
        let hurt = sim
            .spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(120.0, 100.0))
            .expect("hurt");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));

        sim.unit_mut(hurt).expect("hurt").health.apply_damage(50.0);
        sim.unit_mut(engineer).expect("engineer").order_repair(hurt);

        // Repair rate 20: one tick needs 0.1667 metal, balance is 0.1.
        // Metal income is zero, so healing never starts.
        run_ticks(&mut sim, 10);
        let healed = sim.unit(hurt).expect("hurt").health.current;
        assert_eq!(healed, 50.0);

        // Top up metal: healing proceeds at rate * dt per tick.
        fixtures::stock(&mut sim, Faction::Player, 100.0, 0.0);
        run_ticks(&mut sim, 60);
        let healed = sim.unit(hurt).expect("hurt").health.current;
        assert!((healed - 70.0).abs() < 0.5, "got {healed}");
    }

    #[test]
    fn test_repair_final_tick_charges_only_restored_hp() {
        let mut sim = fixtures::empty_match();
        fixtures::stock(&mut sim, Faction::Player, 100.0, 100.0);
        let engineer = sim
            .spawn_unit(fixtures::ENGINEER, Faction::Player, Vec2::new(100.0, 100.0))
            .expect("engineer");
        let hurt = sim
            .spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(120.0, 100.0))
            .expect("hurt");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));

        // 0.1 HP missing is less than one tick's worth of repair
        // (20/60); the charge must cover 0.1 HP, not the full tick.
        sim.unit_mut(hurt).expect("hurt").health.apply_damage(0.1);
        sim.unit_mut(engineer).expect("engineer").order_repair(hurt);
        run_ticks(&mut sim, 1);

        assert!(sim.unit(hurt).expect("hurt").health.is_full());
        let metal = sim.ledger(Faction::Player).pool(ResourceKind::Metal).current;
        let energy = sim.ledger(Faction::Player).pool(ResourceKind::Energy).current;
        assert!((100.0 - metal - 0.1 * 0.5).abs() < 1e-4, "metal charged: {}", 100.0 - metal);
        assert!((100.0 - energy - 0.1 * 0.25).abs() < 1e-4, "energy charged: {}", 100.0 - energy);
    }

    #[test]
    fn test_repair_target_cleared_at_full_health() {
        let mut sim = fixtures::empty_match();
        fixtures::stock(&mut sim, Faction::Player, 10_000.0, 10_000.0);
        let engineer = sim
            .spawn_unit(fixtures::ENGINEER, Faction::Player, Vec2::new(100.0, 100.0))
            .expect("engineer");
        let hurt = sim
            .spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(120.0, 100.0))
            .expect("hurt");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));

        sim.unit_mut(hurt).expect("hurt").health.apply_damage(1.0);
        sim.unit_mut(engineer).expect("engineer").order_repair(hurt);

        run_ticks(&mut sim, 30);
        assert!(sim.unit(hurt).expect("hurt").health.is_full());
        assert!(sim.unit(engineer).expect("engineer").repair_target.is_none());
    }

    #[test]
    fn test_units_fight_and_leave_wreckage() {
        let mut sim = fixtures::empty_match();
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(400.0, 400.0));
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(500.0, 400.0));

        // 100 apart with range 150: both engage immediately. Somebody
        // dies well within 30 simulated seconds.
        run_ticks(&mut sim, 1800);
        assert_ne!(sim.outcome(), MatchOutcome::InProgress);
        assert!(!sim.wreckage().is_empty());
    }

    #[test]
    fn test_turret_withholds_fire_without_energy() {
        let mut sim = fixtures::empty_match();
        let turret = sim
            .spawn_completed_building(fixtures::TURRET, Faction::Player, Vec2::new(300.0, 300.0))
            .expect("turret");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(400.0, 300.0));
        // No energy stocked: target acquired, shot withheld.
        run_ticks(&mut sim, 30);
        assert!(sim.projectiles().is_empty());
        let weapon = sim.building(turret).expect("turret").turret.expect("weapon");
        assert!(weapon.target.is_some());
        assert!(weapon.ready(), "withheld shot must not reset the cooldown");

        // Energy arrives: the turret opens fire on the next tick.
        fixtures::stock(&mut sim, Faction::Player, 0.0, 1_000.0);
        let mut commander = NullCommander;
        let events = sim.tick(&mut commander);
        assert_eq!(events.shots_fired, 1);
    }

    #[test]
    fn test_worker_constructs_building_and_applies_effects() {
        let mut sim = fixtures::empty_match();
        fixtures::stock(&mut sim, Faction::Player, 10_000.0, 10_000.0);
        let engineer = sim
            .spawn_unit(fixtures::ENGINEER, Faction::Player, Vec2::new(300.0, 400.0))
            .expect("engineer");
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1900.0, 1900.0));

        let before = sim.ledger(Faction::Player).pool(ResourceKind::Energy).production;
        let site = Vec2::new(300.0, 300.0);
        {
            let def = sim.defs().building(fixtures::GENERATOR).expect("def").clone();
            sim.unit_mut(engineer).expect("engineer").assign_build(&def, site);
        }

        // Travel + 6 s construction; generous slack.
        run_ticks(&mut sim, 900);

        let generator = sim
            .buildings()
            .iter()
            .find(|b| b.def == fixtures::GENERATOR)
            .expect("generator placed");
        assert!(generator.is_complete());
        assert!(sim.unit(engineer).expect("engineer").build_task.is_none());

        let after = sim.ledger(Faction::Player).pool(ResourceKind::Energy).production;
        assert!(after > before, "passive production applied on completion");
    }

    #[test]
    fn test_fog_reveals_around_player_forces_only() {
        let mut sim = fixtures::empty_match();
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(300.0, 300.0));
        sim.spawn_unit(fixtures::RIFLEMAN, Faction::Enemy, Vec2::new(1700.0, 1700.0));
        run_ticks(&mut sim, 1);

        use skirmish_core::fog::TileVisibility;
        assert_eq!(sim.fog().tile_state_at(300.0, 300.0), TileVisibility::Visible);
        assert_eq!(sim.fog().tile_state_at(1700.0, 1700.0), TileVisibility::Unexplored);
    }
}
