//! Level/upgrade-cost law shared by every upgradeable entity.
//!
//! Colonies, rockets, modules, and the company itself all level up through
//! the same cost curve. `Level` is a small value embedded in each concrete
//! type; derived values (capacity, production rates) are recomputed from the
//! current level on demand, never cached.

use serde::{Deserialize, Serialize};

/// A bounded upgrade level, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    current: u32,
    max: u32,
}

impl Level {
    /// New level starting at 1 with the given cap.
    pub fn new(max: u32) -> Self {
        Self { current: 1, max }
    }

    /// Restore a level from persisted state, clamped into [1, max].
    pub fn restore(current: u32, max: u32) -> Self {
        Self {
            current: current.clamp(1, max.max(1)),
            max: max.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_max(&self) -> bool {
        self.current >= self.max
    }

    /// Cost of the next upgrade at the current level.
    pub fn upgrade_cost(&self) -> f64 {
        upgrade_cost(self.current)
    }

    /// Advance one level. No-op at max. Returns whether the level changed.
    pub fn increment(&mut self) -> bool {
        if self.is_max() {
            return false;
        }
        self.current += 1;
        true
    }
}

/// Upgrade cost law: `floor(50 · 1.2^level)` credits.
pub fn upgrade_cost(level: u32) -> f64 {
    (50.0 * 1.2f64.powi(level as i32)).floor()
}
