//! Resource ledger: per-faction metal and energy accounting.
//!
//! The ledger is mutated only by the progress economy algorithm
//! (construction/production spends) and by defensive-building energy
//! deduction, both of which run on the single simulation thread, so no
//! locking is needed in-process. `update` applies net flow exactly once
//! per tick before any spend is attempted; `reset_drains` clears the
//! per-tick transient deduction tracking after all consumers have run.

use serde::{Deserialize, Serialize};

/// The two resource types the economy tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Metal - the primary construction resource.
    Metal,
    /// Energy - powers production and defensive fire.
    Energy,
}

impl ResourceKind {
    /// All resource kinds, in ledger order.
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Metal, ResourceKind::Energy];
}

/// A cost in metal and energy. Either component may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cost {
    /// Metal component.
    pub metal: f32,
    /// Energy component.
    pub energy: f32,
}

impl Cost {
    /// Zero cost.
    pub const FREE: Self = Self {
        metal: 0.0,
        energy: 0.0,
    };

    /// Create a new cost.
    #[must_use]
    pub const fn new(metal: f32, energy: f32) -> Self {
        Self { metal, energy }
    }

    /// Amount of the given resource this cost requires.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> f32 {
        match kind {
            ResourceKind::Metal => self.metal,
            ResourceKind::Energy => self.energy,
        }
    }

    /// Check whether the cost is zero in every resource.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.metal <= 0.0 && self.energy <= 0.0
    }
}

/// Counters for a single resource type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    /// Current stockpile.
    pub current: f32,
    /// Storage capacity; `current` never exceeds this.
    pub capacity: f32,
    /// Passive income per second.
    pub production: f32,
    /// Passive drain per second.
    pub consumption: f32,
}

impl ResourcePool {
    /// Create a pool with a starting balance and capacity.
    #[must_use]
    pub const fn new(current: f32, capacity: f32) -> Self {
        Self {
            current,
            capacity,
            production: 0.0,
            consumption: 0.0,
        }
    }
}

/// Per-faction resource ledger.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    metal: ResourcePool,
    energy: ResourcePool,
    /// Amount spent this tick, per resource. UI-facing; cleared by
    /// `reset_drains` once per tick.
    drains: [f32; 2],
}

impl ResourceLedger {
    /// Create a ledger with starting balances and capacities.
    #[must_use]
    pub fn new(metal: ResourcePool, energy: ResourcePool) -> Self {
        Self {
            metal,
            energy,
            drains: [0.0; 2],
        }
    }

    /// Get the counters for a resource type.
    #[must_use]
    pub fn pool(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Metal => &self.metal,
            ResourceKind::Energy => &self.energy,
        }
    }

    fn pool_mut(&mut self, kind: ResourceKind) -> &mut ResourcePool {
        match kind {
            ResourceKind::Metal => &mut self.metal,
            ResourceKind::Energy => &mut self.energy,
        }
    }

    /// Check whether the current balances cover a cost.
    #[must_use]
    pub fn can_afford(&self, cost: &Cost) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&kind| self.pool(kind).current >= cost.amount(kind))
    }

    /// Debit a resource, recording the amount in the per-tick drain
    /// counter. Balances never go negative.
    pub fn spend_with_tracking(&mut self, kind: ResourceKind, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        let pool = self.pool_mut(kind);
        pool.current = (pool.current - amount).max(0.0);
        self.drains[kind as usize] += amount;
    }

    /// Credit a resource, clamped to capacity.
    pub fn add(&mut self, kind: ResourceKind, amount: f32) {
        let pool = self.pool_mut(kind);
        pool.current = (pool.current + amount).clamp(0.0, pool.capacity);
    }

    /// Increase passive income for a resource.
    pub fn add_production(&mut self, kind: ResourceKind, amount: f32) {
        self.pool_mut(kind).production += amount;
    }

    /// Increase passive drain for a resource.
    pub fn add_consumption(&mut self, kind: ResourceKind, amount: f32) {
        self.pool_mut(kind).consumption += amount;
    }

    /// Increase storage capacity for a resource.
    pub fn add_capacity(&mut self, kind: ResourceKind, amount: f32) {
        self.pool_mut(kind).capacity += amount;
    }

    /// Apply net passive flow for one tick, clamped to [0, capacity].
    ///
    /// Must run exactly once per tick, before any spend that tick.
    pub fn update(&mut self, dt: f32) {
        for kind in ResourceKind::ALL {
            let pool = self.pool_mut(kind);
            let net = pool.production - pool.consumption;
            pool.current = (pool.current + net * dt).clamp(0.0, pool.capacity);
        }
    }

    /// Amount spent this tick on a resource.
    #[must_use]
    pub fn drain(&self, kind: ResourceKind) -> f32 {
        self.drains[kind as usize]
    }

    /// Clear per-tick drain tracking. Called once per tick after all
    /// consumers have run.
    pub fn reset_drains(&mut self) {
        self.drains = [0.0; 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(metal: f32, energy: f32) -> ResourceLedger {
        ResourceLedger::new(
            ResourcePool::new(metal, 1000.0),
            ResourcePool::new(energy, 1000.0),
        )
    }

    #[test]
    fn test_can_afford() {
        let l = ledger(100.0, 50.0);
        assert!(l.can_afford(&Cost::new(100.0, 50.0)));
        assert!(l.can_afford(&Cost::FREE));
        assert!(!l.can_afford(&Cost::new(100.1, 0.0)));
        assert!(!l.can_afford(&Cost::new(0.0, 50.1)));
    }

    #[test]
    fn test_spend_tracks_drain_and_floors_at_zero() {
        let mut l = ledger(10.0, 0.0);
        l.spend_with_tracking(ResourceKind::Metal, 4.0);
        assert_eq!(l.pool(ResourceKind::Metal).current, 6.0);
        assert_eq!(l.drain(ResourceKind::Metal), 4.0);

        // Over-spend floors at zero but still records the drain
        l.spend_with_tracking(ResourceKind::Metal, 100.0);
        assert_eq!(l.pool(ResourceKind::Metal).current, 0.0);

        l.reset_drains();
        assert_eq!(l.drain(ResourceKind::Metal), 0.0);
    }

    #[test]
    fn test_add_clamps_to_capacity() {
        let mut l = ledger(990.0, 0.0);
        l.add(ResourceKind::Metal, 100.0);
        assert_eq!(l.pool(ResourceKind::Metal).current, 1000.0);
    }

    #[test]
    fn test_update_applies_net_flow() {
        let mut l = ledger(100.0, 100.0);
        l.add_production(ResourceKind::Metal, 60.0);
        l.add_consumption(ResourceKind::Energy, 30.0);

        l.update(1.0);
        assert_eq!(l.pool(ResourceKind::Metal).current, 160.0);
        assert_eq!(l.pool(ResourceKind::Energy).current, 70.0);
    }

    #[test]
    fn test_update_clamps_both_ends() {
        let mut l = ledger(999.0, 1.0);
        l.add_production(ResourceKind::Metal, 100.0);
        l.add_consumption(ResourceKind::Energy, 100.0);

        l.update(1.0);
        assert_eq!(l.pool(ResourceKind::Metal).current, 1000.0);
        assert_eq!(l.pool(ResourceKind::Energy).current, 0.0);
    }
}
