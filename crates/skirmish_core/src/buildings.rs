//! Static structures: construction sites, production queues, turrets.
//!
//! A building is either under construction (a worker drives its
//! progress through the ledger) or complete. Only complete buildings
//! produce units, fire turrets, or contribute passive economy effects.
//! Production queues are strictly FIFO; only the head job spends
//! resources or accrues time.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::Weapon;
use crate::defs::{BuildingDef, BuildingDefId, UnitDefId};
use crate::entity::{Body, EntityId, Faction, Health};
use crate::math::Vec2;
use crate::progress::{self, SpendTracker};
use crate::resources::{Cost, ResourceLedger};

/// Health fraction a freshly placed construction site starts with.
pub const CONSTRUCTION_START_HEALTH: f32 = 0.1;

/// Rejected building orders.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The unit type is not in this building's production list.
    #[error("building cannot produce unit def {0:?}")]
    CannotProduce(UnitDefId),
    /// The building has not finished construction.
    #[error("building is still under construction")]
    UnderConstruction,
    /// No active building with this ID exists.
    #[error("no such building {0}")]
    NoSuchBuilding(EntityId),
}

/// Construction state of a placed building.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Construction {
    /// Progress in [0, 1].
    pub progress: f32,
    /// Resources spent so far.
    pub spent: SpendTracker,
}

/// One queued unit production job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionJob {
    /// Unit type being produced.
    pub unit: UnitDefId,
    /// Progress in [0, 1]; only the queue head advances.
    pub progress: f32,
    /// Resources spent so far on this job.
    pub spent: SpendTracker,
}

impl ProductionJob {
    /// Create a fresh job for a unit type.
    #[must_use]
    pub fn new(unit: UnitDefId) -> Self {
        Self {
            unit,
            progress: 0.0,
            spent: SpendTracker::default(),
        }
    }
}

/// A static structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Shared identity and geometry.
    pub body: Body,
    /// Definition this building was placed from.
    pub def: BuildingDefId,
    /// Health state.
    pub health: Health,
    /// Construction state; `None` once complete.
    pub construction: Option<Construction>,
    /// FIFO unit production queue.
    pub queue: VecDeque<ProductionJob>,
    /// Defensive weapon state, if the definition carries one.
    pub turret: Option<Weapon>,
    /// Losing this building ends the match for its owner.
    pub command: bool,
    /// Where freshly produced units are ordered to move.
    pub rally: Option<Vec2>,
    /// UI selection flag, preserved across snapshot rebuilds.
    pub selected: bool,
}

impl Building {
    /// Place a construction site at 10% health with zero progress.
    #[must_use]
    pub fn from_def(id: EntityId, def: &BuildingDef, faction: Faction, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, faction, pos, def.size),
            def: def.id,
            health: Health::at_fraction(def.health, CONSTRUCTION_START_HEALTH),
            construction: Some(Construction::default()),
            queue: VecDeque::new(),
            turret: def.turret.map(Weapon::from_def),
            command: def.command,
            rally: None,
            selected: false,
        }
    }

    /// Instantiate a finished building at full health (map setup,
    /// snapshot rebuilds).
    #[must_use]
    pub fn completed_from_def(id: EntityId, def: &BuildingDef, faction: Faction, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, faction, pos, def.size),
            def: def.id,
            health: Health::new(def.health),
            construction: None,
            queue: VecDeque::new(),
            turret: def.turret.map(Weapon::from_def),
            command: def.command,
            rally: None,
            selected: false,
        }
    }

    /// Whether construction has finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.construction.is_none()
    }

    /// Construction progress in [0, 1]; 1.0 once complete.
    #[must_use]
    pub fn construction_progress(&self) -> f32 {
        self.construction.map_or(1.0, |c| c.progress)
    }

    /// Queue a unit for production.
    ///
    /// `def` must be this building's own definition; the caller resolves
    /// it from the registry. No resources are reserved at enqueue time;
    /// the job pays as it progresses.
    pub fn enqueue_production(&mut self, def: &BuildingDef, unit: UnitDefId) -> Result<(), OrderError> {
        if !self.is_complete() {
            return Err(OrderError::UnderConstruction);
        }
        if !def.can_produce(unit) {
            return Err(OrderError::CannotProduce(unit));
        }
        self.queue.push_back(ProductionJob::new(unit));
        Ok(())
    }

    /// Remove a queued job by index; in-progress spend is not refunded.
    pub fn cancel_production(&mut self, index: usize) {
        if index < self.queue.len() {
            self.queue.remove(index);
        }
    }

    /// Advance construction by one worker-tick.
    ///
    /// Health grows in lockstep with progress so a site completes at
    /// full health unless it took damage. Returns true on the tick
    /// construction finishes.
    pub fn advance_construction(
        &mut self,
        dt: f32,
        build_time: f32,
        cost: &Cost,
        ledger: &mut ResourceLedger,
    ) -> bool {
        let Some(mut site) = self.construction else {
            return false;
        };

        let before = site.progress;
        site.progress = progress::advance(site.progress, &mut site.spent, dt, build_time, cost, ledger);
        let gained = site.progress - before;
        if gained > 0.0 {
            self.health
                .heal(gained * self.health.max * (1.0 - CONSTRUCTION_START_HEALTH));
        }

        if site.progress >= 1.0 {
            self.construction = None;
            true
        } else {
            self.construction = Some(site);
            false
        }
    }

    /// Advance the head production job by one tick.
    ///
    /// Returns the completed unit type on the tick the job finishes;
    /// the orchestrator spawns the unit and pops the queue here.
    pub fn advance_production(
        &mut self,
        dt: f32,
        build_time: f32,
        cost: &Cost,
        ledger: &mut ResourceLedger,
    ) -> Option<UnitDefId> {
        let job = self.queue.front_mut()?;
        job.progress = progress::advance(job.progress, &mut job.spent, dt, build_time, cost, ledger);

        if job.progress >= 1.0 {
            self.queue.pop_front().map(|j| j.unit)
        } else {
            None
        }
    }

    /// Where produced units appear: just below the footprint edge.
    #[must_use]
    pub fn spawn_point(&self, unit_size: Vec2) -> Vec2 {
        Vec2::new(
            self.body.pos.x,
            self.body.pos.y + self.body.size.y / 2.0 + unit_size.y / 2.0 + 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ResourceKind, ResourcePool};

    const DT: f32 = 1.0 / 60.0;

    fn factory_def() -> BuildingDef {
        BuildingDef::new(BuildingDefId(1), "Factory", Cost::new(200.0, 100.0), 10.0, 800.0)
            .with_produces(vec![UnitDefId(1)])
    }

    fn rich_ledger() -> ResourceLedger {
        ResourceLedger::new(
            ResourcePool::new(100_000.0, 100_000.0),
            ResourcePool::new(100_000.0, 100_000.0),
        )
    }

    #[test]
    fn test_site_starts_at_ten_percent_health() {
        let b = Building::from_def(1, &factory_def(), Faction::Player, Vec2::ZERO);
        assert!(!b.is_complete());
        assert!((b.health.current - 80.0).abs() < 1e-3);
        assert_eq!(b.construction_progress(), 0.0);
    }

    #[test]
    fn test_construction_finishes_at_full_health() {
        let def = factory_def();
        let mut b = Building::from_def(1, &def, Faction::Player, Vec2::ZERO);
        let mut ledger = rich_ledger();

        let mut completed = false;
        // 10 second build: 600 ticks, plus slack for the epsilon snap.
        for _ in 0..610 {
            if b.advance_construction(DT, def.build_time, &def.cost, &mut ledger) {
                completed = true;
                break;
            }
        }
        assert!(completed);
        assert!(b.is_complete());
        assert!(b.health.is_full());
    }

    #[test]
    fn test_construction_stalls_without_resources() {
        let def = factory_def();
        let mut b = Building::from_def(1, &def, Faction::Player, Vec2::ZERO);
        let mut ledger = ResourceLedger::new(
            ResourcePool::new(0.0, 1000.0),
            ResourcePool::new(0.0, 1000.0),
        );

        for _ in 0..120 {
            assert!(!b.advance_construction(DT, def.build_time, &def.cost, &mut ledger));
        }
        assert_eq!(b.construction_progress(), 0.0);

        // Income arrives; the site resumes and the health keeps pace.
        ledger.add(ResourceKind::Metal, 10_000.0);
        ledger.add(ResourceKind::Energy, 10_000.0);
        for _ in 0..60 {
            b.advance_construction(DT, def.build_time, &def.cost, &mut ledger);
        }
        assert!(b.construction_progress() > 0.05);
        assert!(b.health.current > 80.0);
    }

    #[test]
    fn test_production_rejected_while_under_construction() {
        let def = factory_def();
        let mut b = Building::from_def(1, &def, Faction::Player, Vec2::ZERO);
        assert_eq!(
            b.enqueue_production(&def, UnitDefId(1)),
            Err(OrderError::UnderConstruction)
        );
    }

    #[test]
    fn test_production_rejects_unknown_unit_type() {
        let def = factory_def();
        let mut b = Building::completed_from_def(1, &def, Faction::Player, Vec2::ZERO);
        assert_eq!(
            b.enqueue_production(&def, UnitDefId(42)),
            Err(OrderError::CannotProduce(UnitDefId(42)))
        );
        assert!(b.queue.is_empty());
    }

    #[test]
    fn test_production_queue_is_fifo_and_head_only() {
        let def = factory_def();
        let mut b = Building::completed_from_def(1, &def, Faction::Player, Vec2::ZERO);
        b.enqueue_production(&def, UnitDefId(1)).expect("enqueue");
        b.enqueue_production(&def, UnitDefId(1)).expect("enqueue");

        let mut ledger = rich_ledger();
        let cost = Cost::new(50.0, 10.0);

        // 2 second job: 120 ticks plus slack.
        let mut done = None;
        for _ in 0..130 {
            done = b.advance_production(DT, 2.0, &cost, &mut ledger);
            if done.is_some() {
                break;
            }
        }
        assert_eq!(done, Some(UnitDefId(1)));
        assert_eq!(b.queue.len(), 1);
        // The second job has not started.
        assert_eq!(b.queue.front().map(|j| j.progress), Some(0.0));
    }

    #[test]
    fn test_cancel_production() {
        let def = factory_def();
        let mut b = Building::completed_from_def(1, &def, Faction::Player, Vec2::ZERO);
        b.enqueue_production(&def, UnitDefId(1)).expect("enqueue");
        b.cancel_production(0);
        assert!(b.queue.is_empty());
        // Out-of-range index is a no-op.
        b.cancel_production(5);
    }

    #[test]
    fn test_spawn_point_sits_outside_footprint() {
        let b = Building::completed_from_def(1, &factory_def(), Faction::Player, Vec2::ZERO);
        let p = b.spawn_point(Vec2::new(16.0, 16.0));
        assert!(p.y > b.body.size.y / 2.0);
        assert!(!b.body.bounds().contains(p));
    }
}
