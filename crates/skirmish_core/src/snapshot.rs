//! Network snapshot capture and thin-client state rebuild.
//!
//! In multiplayer the client simulation is not authoritative: each
//! received snapshot wholesale-replaces the unit, building, and
//! projectile collections (an O(n) rebuild, not an incremental diff).
//! The only state carried over is the UI selection flag, matched by
//! entity ID against the previous generation. A snapshot applies
//! atomically or not at all; individual malformed records (unknown
//! definition or owner slot) are skipped while the rest of the batch
//! still applies.

use serde::{Deserialize, Serialize};

use crate::buildings::{Building, Construction};
use crate::defs::{BuildingDefId, UnitDefId};
use crate::entity::{Faction, Health};
use crate::math::Vec2;
use crate::progress::SpendTracker;
use crate::projectiles::Projectile;
use crate::resources::{ResourceKind, ResourceLedger, ResourcePool};
use crate::sim::Match;
use crate::units::Unit;

/// Wire record for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Entity ID, stable across snapshots.
    pub id: u64,
    /// Unit definition code.
    pub unit_type: u16,
    /// Owning player slot.
    pub owner: u8,
    /// Position X.
    pub x: f32,
    /// Position Y.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Facing in radians.
    pub angle: f32,
}

/// Wire record for one building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Entity ID, stable across snapshots.
    pub id: u64,
    /// Building definition code.
    pub building_type: u16,
    /// Owning player slot.
    pub owner: u8,
    /// Position X.
    pub x: f32,
    /// Position Y.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Whether construction has finished.
    pub completed: bool,
    /// Construction progress in [0, 1].
    pub build_progress: f32,
}

/// Wire record for one projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileRecord {
    /// Entity ID.
    pub id: u64,
    /// Owning player slot.
    pub owner: u8,
    /// Position X.
    pub x: f32,
    /// Position Y.
    pub y: f32,
}

/// Per-player resource balances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// Current metal.
    pub metal: f32,
    /// Metal storage capacity.
    pub metal_capacity: f32,
    /// Current energy.
    pub energy: f32,
    /// Energy storage capacity.
    pub energy_capacity: f32,
}

/// One complete per-tick state payload. The client can fully
/// reconstruct its live entity set from this alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Server tick this snapshot describes.
    pub tick: u64,
    /// All live units.
    pub units: Vec<UnitRecord>,
    /// All live buildings.
    pub buildings: Vec<BuildingRecord>,
    /// All projectiles in flight.
    pub projectiles: Vec<ProjectileRecord>,
    /// Resource balances, indexed by player slot.
    pub resources: Vec<ResourceSummary>,
}

impl Match {
    /// Capture the full wire payload for the current tick.
    #[must_use]
    pub fn capture_snapshot(&self) -> Snapshot {
        let units = self
            .units
            .iter()
            .filter(|u| u.body.active)
            .map(|u| UnitRecord {
                id: u.body.id,
                unit_type: u.def.0,
                owner: u.body.faction.slot(),
                x: u.body.pos.x,
                y: u.body.pos.y,
                health: u.health.current,
                max_health: u.health.max,
                angle: u.angle,
            })
            .collect();

        let buildings = self
            .buildings
            .iter()
            .filter(|b| b.body.active)
            .map(|b| BuildingRecord {
                id: b.body.id,
                building_type: b.def.0,
                owner: b.body.faction.slot(),
                x: b.body.pos.x,
                y: b.body.pos.y,
                health: b.health.current,
                max_health: b.health.max,
                completed: b.is_complete(),
                build_progress: b.construction_progress(),
            })
            .collect();

        let projectiles = self
            .projectiles
            .iter()
            .filter(|p| p.body.active)
            .map(|p| ProjectileRecord {
                id: p.body.id,
                owner: p.body.faction.slot(),
                x: p.body.pos.x,
                y: p.body.pos.y,
            })
            .collect();

        let resources = [Faction::Player, Faction::Enemy]
            .iter()
            .map(|&f| {
                let ledger = self.ledger(f);
                let metal = ledger.pool(ResourceKind::Metal);
                let energy = ledger.pool(ResourceKind::Energy);
                ResourceSummary {
                    metal: metal.current,
                    metal_capacity: metal.capacity,
                    energy: energy.current,
                    energy_capacity: energy.capacity,
                }
            })
            .collect();

        Snapshot {
            tick: self.ticks,
            units,
            buildings,
            projectiles,
            resources,
        }
    }

    /// Wholesale-replace the entity collections from a server snapshot.
    ///
    /// Selection flags survive by ID match against the previous
    /// generation; everything else is rebuilt. Records with an unknown
    /// definition code or owner slot are skipped; the rest of the batch
    /// still applies.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        let selected_units: Vec<u64> = self
            .units
            .iter()
            .filter(|u| u.selected)
            .map(|u| u.body.id)
            .collect();
        let selected_buildings: Vec<u64> = self
            .buildings
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.body.id)
            .collect();

        let mut units = Vec::with_capacity(snapshot.units.len());
        for record in &snapshot.units {
            let Some(faction) = Faction::from_slot(record.owner) else {
                continue;
            };
            let Some(def) = self.defs.unit(UnitDefId(record.unit_type)) else {
                continue;
            };
            let mut unit = Unit::from_def(record.id, def, faction, Vec2::new(record.x, record.y));
            unit.health = Health {
                current: record.health.clamp(0.0, record.max_health),
                max: record.max_health,
            };
            unit.angle = record.angle;
            unit.selected = selected_units.contains(&record.id);
            units.push(unit);
        }

        let mut buildings = Vec::with_capacity(snapshot.buildings.len());
        for record in &snapshot.buildings {
            let Some(faction) = Faction::from_slot(record.owner) else {
                continue;
            };
            let Some(def) = self.defs.building(BuildingDefId(record.building_type)) else {
                continue;
            };
            let pos = Vec2::new(record.x, record.y);
            let mut building = if record.completed {
                Building::completed_from_def(record.id, def, faction, pos)
            } else {
                let mut site = Building::from_def(record.id, def, faction, pos);
                site.construction = Some(Construction {
                    progress: record.build_progress.clamp(0.0, 1.0),
                    spent: SpendTracker::default(),
                });
                site
            };
            building.health = Health {
                current: record.health.clamp(0.0, record.max_health),
                max: record.max_health,
            };
            building.selected = selected_buildings.contains(&record.id);
            buildings.push(building);
        }

        let projectiles = snapshot
            .projectiles
            .iter()
            .filter_map(|record| {
                let faction = Faction::from_slot(record.owner)?;
                Some(Projectile::remote(
                    record.id,
                    faction,
                    Vec2::new(record.x, record.y),
                ))
            })
            .collect();

        self.units = units;
        self.buildings = buildings;
        self.projectiles = projectiles;
        self.ticks = snapshot.tick;

        for (slot, summary) in snapshot.resources.iter().enumerate() {
            if let Some(faction) = Faction::from_slot(slot as u8) {
                self.ledgers[faction.index()] = ResourceLedger::new(
                    ResourcePool::new(summary.metal, summary.metal_capacity),
                    ResourcePool::new(summary.energy, summary.energy_capacity),
                );
            }
        }
    }

    /// Drop all snapshot-derived state (on disconnect).
    pub fn clear_snapshot_state(&mut self) {
        self.units.clear();
        self.buildings.clear();
        self.projectiles.clear();
        self.wreckage.clear();
    }
}
