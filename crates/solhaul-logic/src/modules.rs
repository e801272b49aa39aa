//! Colony module variants and their formulas.
//!
//! A module is either a production module bound to one good or an
//! infrastructure module granting a passive benefit. The two kinds share the
//! leveling law but differ in every derived formula, so behavior is matched
//! exhaustively on the kind rather than dispatched dynamically.

use serde::{Deserialize, Serialize};

use crate::goods::GoodId;
use crate::leveling::Level;

/// Level cap for all colony modules.
pub const MODULE_MAX_LEVEL: u32 = 100;

/// A colony upgrade slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Module {
    Production(ProductionModule),
    Infrastructure(InfrastructureModule),
}

impl Module {
    pub fn level(&self) -> &Level {
        match self {
            Self::Production(m) => &m.level,
            Self::Infrastructure(m) => &m.level,
        }
    }

    pub fn level_mut(&mut self) -> &mut Level {
        match self {
            Self::Production(m) => &mut m.level,
            Self::Infrastructure(m) => &mut m.level,
        }
    }

    pub fn workers_needed(&self) -> u32 {
        match self {
            Self::Production(m) => m.workers_needed(),
            Self::Infrastructure(m) => m.workers_needed(),
        }
    }
}

/// Produces one good per sol, scaled by level and the colony multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionModule {
    pub good: GoodId,
    pub level: Level,
    /// Base rate fixed at construction from the good's registry definition.
    pub base_per_sol: f64,
}

impl ProductionModule {
    pub fn new(good: GoodId, base_per_sol: f64) -> Self {
        Self {
            good,
            level: Level::new(MODULE_MAX_LEVEL),
            base_per_sol,
        }
    }

    /// `base · 1.2^(level-1)` units per sol.
    pub fn quantity_per_sol(&self) -> f64 {
        self.base_per_sol * 1.2f64.powi(self.level.current() as i32 - 1)
    }

    /// `ceil(quantity_per_sol / 10)`.
    pub fn workers_needed(&self) -> u32 {
        (self.quantity_per_sol() / 10.0).ceil() as u32
    }
}

/// Passive-benefit infrastructure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfraKind {
    /// Fleet allowance: how many rockets the company may operate.
    Hangar,
    /// Flat storage capacity bonus for the hosting colony.
    Warehouse,
}

impl InfraKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hangar => "Hangar",
            Self::Warehouse => "Warehouse",
        }
    }
}

/// Grants a passive benefit that scales with level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureModule {
    pub kind: InfraKind,
    pub level: Level,
}

impl InfrastructureModule {
    pub fn new(kind: InfraKind) -> Self {
        Self {
            kind,
            level: Level::new(MODULE_MAX_LEVEL),
        }
    }

    /// Kind-specific benefit at the current level.
    pub fn benefit_value(&self) -> f64 {
        let level = self.level.current();
        match self.kind {
            InfraKind::Hangar => (level / 10) as f64 + 1.0,
            InfraKind::Warehouse => 200.0 * 1.2f64.powi(level as i32 - 1),
        }
    }

    /// `ceil(level/10)·2 + 1`.
    pub fn workers_needed(&self) -> u32 {
        (self.level.current() as f64 / 10.0).ceil() as u32 * 2 + 1
    }
}

/// Module slots available at a colony level.
pub fn modules_allowed(colony_level: u32) -> usize {
    match colony_level {
        0..=9 => 3,
        10..=49 => 6,
        50..=199 => 9,
        200..=998 => 12,
        _ => 15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_rate_scales_with_level() {
        let mut module = ProductionModule::new(GoodId(0), 2.0);
        assert!((module.quantity_per_sol() - 2.0).abs() < 1e-9);
        module.level.increment();
        assert!((module.quantity_per_sol() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_production_workers() {
        let module = ProductionModule::new(GoodId(0), 2.0);
        // ceil(2.0 / 10) = 1
        assert_eq!(module.workers_needed(), 1);
        let module = ProductionModule::new(GoodId(0), 25.0);
        // ceil(25 / 10) = 3
        assert_eq!(module.workers_needed(), 3);
    }

    #[test]
    fn test_hangar_benefit_steps_every_ten_levels() {
        let mut module = InfrastructureModule::new(InfraKind::Hangar);
        assert_eq!(module.benefit_value(), 1.0);
        for _ in 0..9 {
            module.level.increment();
        }
        assert_eq!(module.level.current(), 10);
        assert_eq!(module.benefit_value(), 2.0);
    }

    #[test]
    fn test_warehouse_benefit() {
        let mut module = InfrastructureModule::new(InfraKind::Warehouse);
        assert!((module.benefit_value() - 200.0).abs() < 1e-9);
        module.level.increment();
        assert!((module.benefit_value() - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_infrastructure_workers() {
        let mut module = InfrastructureModule::new(InfraKind::Warehouse);
        // ceil(1/10)·2 + 1 = 3
        assert_eq!(module.workers_needed(), 3);
        for _ in 0..10 {
            module.level.increment();
        }
        // level 11: ceil(11/10)·2 + 1 = 5
        assert_eq!(module.workers_needed(), 5);
    }

    #[test]
    fn test_modules_allowed_steps() {
        assert_eq!(modules_allowed(1), 3);
        assert_eq!(modules_allowed(9), 3);
        assert_eq!(modules_allowed(10), 6);
        assert_eq!(modules_allowed(49), 6);
        assert_eq!(modules_allowed(50), 9);
        assert_eq!(modules_allowed(199), 9);
        assert_eq!(modules_allowed(200), 12);
        assert_eq!(modules_allowed(998), 12);
        assert_eq!(modules_allowed(999), 15);
    }
}
