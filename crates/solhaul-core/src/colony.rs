//! Colony aggregate: a productive, storage-capable site at one location.

use serde::{Deserialize, Serialize};

use solhaul_logic::goods::{GoodId, GoodsRegistry};
use solhaul_logic::inventory::Inventory;
use solhaul_logic::leveling::Level;
use solhaul_logic::location::LocationKind;
use solhaul_logic::modules::{modules_allowed, InfraKind, Module};
use solhaul_logic::production;

use crate::config::{GameConfig, OverflowPolicy};
use crate::rules::Denied;

/// Level cap for colonies.
pub const COLONY_MAX_LEVEL: u32 = 1_000;

/// Result of one colony's sol-end finalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolOutcome {
    /// Per-good overflow: (good, units lost, credits earned from auto-sell).
    pub overflows: Vec<(GoodId, f64, f64)>,
    /// Total credits the company earns from auto-sold overflow.
    pub credited: f64,
}

/// A productive site at one location. Created by colonization, never
/// destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub id: u32,
    pub name: String,
    pub location: LocationKind,
    pub level: Level,
    pub modules: Vec<Module>,
    pub storage: Inventory,
}

impl Colony {
    pub fn new(id: u32, name: impl Into<String>, location: LocationKind) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            level: Level::new(COLONY_MAX_LEVEL),
            modules: Vec::new(),
            storage: Inventory::new(),
        }
    }

    /// Production multiplier from location and level.
    pub fn multiplier(&self) -> f64 {
        production::colony_multiplier(self.location.modifier(), self.level.current())
    }

    /// Storage capacity: leveled base (scaled by the squared location
    /// modifier) plus all installed warehouse bonuses.
    pub fn capacity(&self, base: f64) -> f64 {
        let base_cap =
            production::colony_base_capacity(base, self.location.modifier(), self.level.current());
        let warehouse_bonus: f64 = self
            .modules
            .iter()
            .filter_map(|m| match m {
                Module::Infrastructure(infra) if infra.kind == InfraKind::Warehouse => {
                    Some(infra.benefit_value())
                }
                _ => None,
            })
            .sum();
        base_cap + warehouse_bonus
    }

    /// Fleet allowance granted by this colony's hangars.
    pub fn hangar_allowance(&self) -> u32 {
        self.modules
            .iter()
            .filter_map(|m| match m {
                Module::Infrastructure(infra) if infra.kind == InfraKind::Hangar => {
                    Some(infra.benefit_value() as u32)
                }
                _ => None,
            })
            .sum()
    }

    /// Workforce required by all installed modules.
    pub fn workers_needed(&self) -> u32 {
        self.modules.iter().map(|m| m.workers_needed()).sum()
    }

    /// Install a module. Fails without mutation when every slot at the
    /// current level is in use.
    pub fn add_module(&mut self, module: Module) -> Result<(), Denied> {
        let allowed = modules_allowed(self.level.current());
        if self.modules.len() >= allowed {
            return Err(Denied::ModuleSlotsFull { allowed });
        }
        self.modules.push(module);
        Ok(())
    }

    /// Finalize one sol of production: deposit each production module's
    /// output, clamped to remaining capacity. Overflow is discarded or
    /// auto-sold per policy, and always reported.
    pub fn finalize_sol(&mut self, registry: &GoodsRegistry, config: &GameConfig) -> SolOutcome {
        let cap = self.capacity(config.colony_base_capacity);
        let mult = self.multiplier();

        let deposits: Vec<(GoodId, f64)> = self
            .modules
            .iter()
            .filter_map(|m| match m {
                Module::Production(p) => Some((p.good, p.quantity_per_sol() * mult)),
                Module::Infrastructure(_) => None,
            })
            .collect();

        let mut outcome = SolOutcome::default();
        for (good, amount) in deposits {
            let lost = self.storage.deposit_clamped(good, amount, cap);
            if lost > 0.0 {
                let credited = match config.overflow_policy {
                    OverflowPolicy::Discard => 0.0,
                    OverflowPolicy::AutoSell => registry
                        .get(good)
                        .map(|g| lost * g.sell_price)
                        .unwrap_or(0.0),
                };
                outcome.credited += credited;
                outcome.overflows.push((good, lost, credited));
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solhaul_logic::modules::{InfrastructureModule, ProductionModule};

    fn test_config() -> GameConfig {
        GameConfig::default()
    }

    fn earth_colony() -> Colony {
        Colony::new(0, "Gaia Base", LocationKind::Earth)
    }

    #[test]
    fn test_capacity_level_one_earth() {
        let colony = earth_colony();
        assert_eq!(colony.capacity(100.0), 138.0);
    }

    #[test]
    fn test_warehouse_raises_capacity() {
        let mut colony = earth_colony();
        colony
            .add_module(Module::Infrastructure(InfrastructureModule::new(
                InfraKind::Warehouse,
            )))
            .unwrap();
        assert_eq!(colony.capacity(100.0), 338.0);
    }

    #[test]
    fn test_module_slot_limit() {
        let mut colony = earth_colony();
        for _ in 0..3 {
            colony
                .add_module(Module::Production(ProductionModule::new(GoodId(0), 2.0)))
                .unwrap();
        }
        let result = colony.add_module(Module::Production(ProductionModule::new(GoodId(0), 2.0)));
        assert_eq!(result, Err(Denied::ModuleSlotsFull { allowed: 3 }));
        assert_eq!(colony.modules.len(), 3);
    }

    #[test]
    fn test_finalize_sol_deposits_production() {
        let registry = GoodsRegistry::standard();
        let config = test_config();
        let mut colony = earth_colony();
        colony
            .add_module(Module::Production(ProductionModule::new(GoodId(0), 2.0)))
            .unwrap();

        let outcome = colony.finalize_sol(&registry, &config);
        assert!(outcome.overflows.is_empty());
        assert!((colony.storage.quantity_of(GoodId(0)) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_sol_partial_deposit_on_overflow() {
        let registry = GoodsRegistry::standard();
        let config = test_config();
        let mut colony = earth_colony();
        colony
            .add_module(Module::Production(ProductionModule::new(GoodId(0), 2.0)))
            .unwrap();
        // Nearly full: only 1 unit of room left
        assert!(colony.storage.add(GoodId(1), 137.0, colony.capacity(100.0)));

        let outcome = colony.finalize_sol(&registry, &config);
        assert_eq!(outcome.overflows.len(), 1);
        let (good, lost, credited) = outcome.overflows[0];
        assert_eq!(good, GoodId(0));
        assert!((lost - 1.0).abs() < 1e-9);
        assert_eq!(credited, 0.0);
        assert!((colony.storage.quantity_of(GoodId(0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_sol_autosell_credits_excess() {
        let registry = GoodsRegistry::standard();
        let config = GameConfig {
            overflow_policy: OverflowPolicy::AutoSell,
            ..GameConfig::default()
        };
        let mut colony = earth_colony();
        colony
            .add_module(Module::Production(ProductionModule::new(GoodId(0), 2.0)))
            .unwrap();
        assert!(colony.storage.add(GoodId(1), 138.0, colony.capacity(100.0)));

        let outcome = colony.finalize_sol(&registry, &config);
        let sell = registry.get(GoodId(0)).unwrap().sell_price;
        assert!((outcome.credited - 2.0 * sell).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_uses_location_and_level() {
        let mut colony = Colony::new(1, "Olympus", LocationKind::Mars);
        assert!((colony.multiplier() - 1.44).abs() < 1e-9);
        colony.level.increment();
        assert!((colony.multiplier() - 1.44 * 1.02).abs() < 1e-9);
    }

    #[test]
    fn test_hangar_allowance() {
        let mut colony = earth_colony();
        assert_eq!(colony.hangar_allowance(), 0);
        colony
            .add_module(Module::Infrastructure(InfrastructureModule::new(
                InfraKind::Hangar,
            )))
            .unwrap();
        assert_eq!(colony.hangar_allowance(), 1);
    }
}
