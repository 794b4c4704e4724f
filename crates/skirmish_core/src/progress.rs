//! Resource-gated progress: the shared routine behind construction and
//! production.
//!
//! Given elapsed time, a total duration, a cost, and the spend recorded
//! so far, the algorithm advances progress as far as the scarcest
//! required resource allows. Progress silently stalls when a resource
//! is exhausted and resumes automatically once the ledger regenerates;
//! no error is ever raised. For any resource with a nonzero cost,
//! cumulative spend never exceeds `progress * cost`.

use serde::{Deserialize, Serialize};

use crate::resources::{Cost, ResourceKind, ResourceLedger};

/// Slack absorbed when deciding a task is complete. f32 accumulation of
/// 1/60 s ticks lands slightly off 1.0; anything within this band snaps
/// to done.
pub const PROGRESS_EPSILON: f32 = 1e-4;

/// Cumulative per-resource spend on one construction or production task.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpendTracker {
    /// Metal spent so far.
    pub metal: f32,
    /// Energy spent so far.
    pub energy: f32,
}

impl SpendTracker {
    /// Amount spent so far on the given resource.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> f32 {
        match kind {
            ResourceKind::Metal => self.metal,
            ResourceKind::Energy => self.energy,
        }
    }

    fn add(&mut self, kind: ResourceKind, amount: f32) {
        match kind {
            ResourceKind::Metal => self.metal += amount,
            ResourceKind::Energy => self.energy += amount,
        }
    }
}

/// Advance progress on a timed, resource-gated task.
///
/// Returns the new progress in [0, 1]; exactly 1.0 means complete.
/// Debits the ledger for precisely the progress actually made.
///
/// Steps:
/// 1. Desired progress is `min(1, progress + dt / duration)`.
/// 2. For each resource with a nonzero cost, the spend needed to reach
///    the desired progress is clamped to the available balance.
/// 3. Actual progress is the minimum of the desired progress and each
///    resource's affordable progress ratio.
/// 4. Each resource is debited `actual * cost - spent_so_far` (never
///    negative) and the tracker updated.
pub fn advance(
    progress: f32,
    spent: &mut SpendTracker,
    dt: f32,
    duration: f32,
    cost: &Cost,
    ledger: &mut ResourceLedger,
) -> f32 {
    let desired = if duration <= 0.0 {
        1.0
    } else {
        (progress + dt / duration).min(1.0)
    };

    let mut actual = desired;
    for kind in ResourceKind::ALL {
        let unit_cost = cost.amount(kind);
        if unit_cost <= 0.0 {
            continue;
        }
        let needed = (desired * unit_cost - spent.amount(kind)).max(0.0);
        let affordable = needed.min(ledger.pool(kind).current);
        let ratio = (spent.amount(kind) + affordable) / unit_cost;
        actual = actual.min(ratio);
    }
    // Ratios are derived from spend-so-far, which never runs ahead of
    // progress, so this only guards against float noise.
    actual = actual.max(progress);

    for kind in ResourceKind::ALL {
        let unit_cost = cost.amount(kind);
        if unit_cost <= 0.0 {
            continue;
        }
        let debit = (actual * unit_cost - spent.amount(kind)).max(0.0);
        ledger.spend_with_tracking(kind, debit);
        spent.add(kind, debit);
    }

    if actual >= 1.0 - PROGRESS_EPSILON {
        1.0
    } else {
        actual
    }
}
