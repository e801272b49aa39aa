//! Synchronous player actions.
//!
//! Every action validates first and mutates only once all checks pass, so a
//! rejected action leaves the session exactly as it was. Rejections come
//! back as [`Denied`] values; they are expected rule violations, not errors.

use solhaul_logic::exploration::{self, ExplorationQuote};
use solhaul_logic::goods::{GoodId, GoodsRegistry};
use solhaul_logic::location::LocationKind;
use solhaul_logic::modules::{
    modules_allowed, InfraKind, InfrastructureModule, Module, ProductionModule,
};

use crate::rules::Denied;
use crate::session::{ExplorationMission, GameSession};

/// What to install when building a colony module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModuleBlueprint {
    Production(GoodId),
    Infrastructure(InfraKind),
}

impl GameSession {
    /// Send a docked rocket along an existing connection. Plain travel burns
    /// no fuel; only automation and exploration price their legs.
    pub fn start_travel(&mut self, rocket_id: u32, destination: LocationKind) -> Result<(), Denied> {
        let idx = self
            .rocket_index(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        let location = self.rockets[idx].location;
        if self.rockets[idx].is_traveling() {
            return Err(Denied::InvalidTransition("Rocket is already traveling"));
        }
        let connection = self
            .find_connection(location, destination)
            .ok_or(Denied::InvalidRoute {
                from: location,
                to: destination,
            })?;
        let minutes_per_sol = self.config.minutes_per_sol;
        self.rockets[idx].start_travel(destination, connection.travel_time_sols, minutes_per_sol)
    }

    /// Price an exploration mission without committing to it.
    pub fn exploration_quote(
        &self,
        rocket_id: u32,
        target: LocationKind,
    ) -> Result<ExplorationQuote, Denied> {
        let rocket = self
            .rocket(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        let connection =
            self.find_connection(rocket.location, target)
                .ok_or(Denied::InvalidRoute {
                    from: rocket.location,
                    to: target,
                })?;
        Ok(exploration::quote(
            &connection,
            self.company.colonies.len(),
            self.config.exploration_stat_factor,
        ))
    }

    /// Dispatch a rocket to found a colony. All checks run before anything
    /// is deducted; the mission price leaves the treasury and the fuel
    /// leaves the origin colony's stock only together.
    pub fn start_exploration(
        &mut self,
        rocket_id: u32,
        target: LocationKind,
        registry: &GoodsRegistry,
    ) -> Result<(), Denied> {
        let idx = self
            .rocket_index(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        if self.rockets[idx].is_traveling() {
            return Err(Denied::InvalidTransition("Rocket is already traveling"));
        }
        if self.missions.iter().any(|m| m.rocket_id == rocket_id) {
            return Err(Denied::InvalidTransition(
                "Rocket already has an exploration mission",
            ));
        }
        if self.company.colony_at(target).is_some() {
            return Err(Denied::MissingPrerequisite("target is already colonized"));
        }
        let location = self.rockets[idx].location;
        let origin = self
            .company
            .colony_at(location)
            .ok_or(Denied::MissingPrerequisite("no colony at the rocket's location"))?;
        let connection = self
            .find_connection(location, target)
            .ok_or(Denied::InvalidRoute {
                from: location,
                to: target,
            })?;
        let quote = exploration::quote(
            &connection,
            self.company.colonies.len(),
            self.config.exploration_stat_factor,
        );

        let fuel = registry
            .fuel()
            .ok_or(Denied::MissingPrerequisite("no fuel good defined"))?;
        let available = origin.storage.quantity_of(fuel.id);
        if available < quote.fuel {
            return Err(Denied::InsufficientFuel {
                needed: quote.fuel,
                available,
            });
        }

        self.company.spend(quote.price)?;
        let fuel_id = fuel.id;
        if let Some(origin) = self.company.colony_at_mut(location) {
            origin.storage.reduce(fuel_id, quote.fuel);
        }
        let minutes_per_sol = self.config.minutes_per_sol;
        if let Err(denied) =
            self.rockets[idx].start_travel(target, quote.travel_time_sols, minutes_per_sol)
        {
            // Checked above, but a refusal here must not eat the deposit
            self.company.earn(quote.price);
            if let Some(origin) = self.company.colony_at_mut(location) {
                let _ = origin.storage.deposit_clamped(fuel_id, quote.fuel, f64::INFINITY);
            }
            return Err(denied);
        }
        self.missions.push(ExplorationMission { rocket_id, target });
        Ok(())
    }

    /// Enable trade-route mode on a docked rocket and immediately run the
    /// first cycle. Any failure clears the flags again.
    pub fn start_trade_route(
        &mut self,
        rocket_id: u32,
        market: LocationKind,
        registry: &GoodsRegistry,
    ) -> Result<(), Denied> {
        let idx = self
            .rocket_index(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        if self.rockets[idx].is_traveling() {
            return Err(Denied::InvalidTransition("Rocket is already traveling"));
        }
        let location = self.rockets[idx].location;
        if market == location {
            return Err(Denied::InvalidTransition("market is the current location"));
        }
        let origin = self
            .company
            .colony_at(location)
            .ok_or(Denied::MissingPrerequisite("no colony at the rocket's location"))?;
        let origin_id = origin.id;

        self.rockets[idx].sell_route = true;
        self.rockets[idx].route_origin = Some(origin_id);
        self.rockets[idx].route_market = Some(market);
        if let Err(denied) = self.trade_depart(idx, registry) {
            self.rockets[idx].clear_route();
            return Err(denied);
        }
        Ok(())
    }

    /// Drop trade-route mode. An in-flight rocket finishes its leg as a
    /// plain flight.
    pub fn stop_trade_route(&mut self, rocket_id: u32) -> Result<(), Denied> {
        let rocket = self
            .rocket_mut(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        rocket.clear_route();
        Ok(())
    }

    /// Install a new module at a colony, paying the flat build cost.
    pub fn build_colony_module(
        &mut self,
        colony_id: u32,
        blueprint: ModuleBlueprint,
        registry: &GoodsRegistry,
    ) -> Result<(), Denied> {
        let module = match blueprint {
            ModuleBlueprint::Production(good) => {
                let def = registry.get(good).ok_or(Denied::UnknownEntity("good"))?;
                Module::Production(ProductionModule::new(good, def.base_per_sol))
            }
            ModuleBlueprint::Infrastructure(kind) => {
                Module::Infrastructure(InfrastructureModule::new(kind))
            }
        };
        let colony = self
            .company
            .colony(colony_id)
            .ok_or(Denied::UnknownEntity("colony"))?;
        let allowed = modules_allowed(colony.level.current());
        if colony.modules.len() >= allowed {
            return Err(Denied::ModuleSlotsFull { allowed });
        }
        self.company.spend(self.config.module_build_cost)?;
        if let Some(colony) = self.company.colony_mut(colony_id) {
            colony.add_module(module)?;
        }
        Ok(())
    }

    /// Build a rocket berthed at a colony. Requires free fleet allowance
    /// from hangars.
    pub fn build_rocket(&mut self, colony_id: u32, name: &str) -> Result<u32, Denied> {
        let location = self
            .company
            .colony(colony_id)
            .map(|c| c.location)
            .ok_or(Denied::UnknownEntity("colony"))?;
        let allowance = self.company.fleet_allowance() as usize;
        if self.rockets.len() >= allowance {
            return Err(Denied::MissingPrerequisite(
                "no hangar capacity for another rocket",
            ));
        }
        self.company.spend(self.config.rocket_build_cost)?;
        Ok(self.spawn_rocket(name, location))
    }

    pub fn upgrade_company(&mut self) -> Result<(), Denied> {
        if self.company.level.is_max() {
            return Err(Denied::InvalidTransition("already at max level"));
        }
        let cost = self.company.level.upgrade_cost();
        self.company.spend(cost)?;
        self.company.level.increment();
        Ok(())
    }

    pub fn upgrade_colony(&mut self, colony_id: u32) -> Result<(), Denied> {
        let level = self
            .company
            .colony(colony_id)
            .map(|c| c.level)
            .ok_or(Denied::UnknownEntity("colony"))?;
        if level.is_max() {
            return Err(Denied::InvalidTransition("already at max level"));
        }
        self.company.spend(level.upgrade_cost())?;
        if let Some(colony) = self.company.colony_mut(colony_id) {
            colony.level.increment();
        }
        Ok(())
    }

    pub fn upgrade_rocket(&mut self, rocket_id: u32) -> Result<(), Denied> {
        let idx = self
            .rocket_index(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        let level = self.rockets[idx].level;
        if level.is_max() {
            return Err(Denied::InvalidTransition("already at max level"));
        }
        self.company.spend(level.upgrade_cost())?;
        self.rockets[idx].level.increment();
        Ok(())
    }

    /// Upgrade one module, addressed by its slot index within the colony.
    pub fn upgrade_module(&mut self, colony_id: u32, slot: usize) -> Result<(), Denied> {
        let level = self
            .company
            .colony(colony_id)
            .ok_or(Denied::UnknownEntity("colony"))?
            .modules
            .get(slot)
            .map(|m| *m.level())
            .ok_or(Denied::UnknownEntity("module"))?;
        if level.is_max() {
            return Err(Denied::InvalidTransition("already at max level"));
        }
        self.company.spend(level.upgrade_cost())?;
        if let Some(module) = self
            .company
            .colony_mut(colony_id)
            .and_then(|c| c.modules.get_mut(slot))
        {
            module.level_mut().increment();
        }
        Ok(())
    }

    /// Buy goods into a colony's storage at market buy price.
    pub fn buy_goods(
        &mut self,
        colony_id: u32,
        good: GoodId,
        quantity: f64,
        registry: &GoodsRegistry,
    ) -> Result<(), Denied> {
        let def = registry.get(good).ok_or(Denied::UnknownEntity("good"))?;
        let capacity = self
            .company
            .colony(colony_id)
            .map(|c| c.capacity(self.config.colony_base_capacity))
            .ok_or(Denied::UnknownEntity("colony"))?;
        let cost = quantity * def.buy_price;
        if self.company.credits < cost {
            return Err(Denied::InsufficientFunds {
                needed: cost,
                available: self.company.credits,
            });
        }
        let added = self
            .company
            .colony_mut(colony_id)
            .map(|c| c.storage.add(good, quantity, capacity))
            .unwrap_or(false);
        if !added {
            return Err(Denied::CapacityExceeded);
        }
        self.company.spend(cost)
    }

    /// Sell goods out of a colony's storage at market sell price. Returns
    /// the credits earned.
    pub fn sell_goods(
        &mut self,
        colony_id: u32,
        good: GoodId,
        quantity: f64,
        registry: &GoodsRegistry,
    ) -> Result<f64, Denied> {
        let def = registry.get(good).ok_or(Denied::UnknownEntity("good"))?;
        let colony = self
            .company
            .colony_mut(colony_id)
            .ok_or(Denied::UnknownEntity("colony"))?;
        if !colony.storage.reduce(good, quantity) {
            return Err(Denied::InsufficientCargo);
        }
        let earned = quantity * def.sell_price;
        self.company.earn(earned);
        Ok(earned)
    }

    /// Move goods from the co-located colony into a docked rocket.
    pub fn load_rocket(&mut self, rocket_id: u32, good: GoodId, quantity: f64) -> Result<(), Denied> {
        let idx = self
            .rocket_index(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        if self.rockets[idx].is_traveling() {
            return Err(Denied::InvalidTransition("Rocket is traveling"));
        }
        let location = self.rockets[idx].location;
        let capacity = self.rockets[idx].capacity(self.config.rocket_base_capacity);
        if self.rockets[idx].cargo.total_exact() + quantity > capacity {
            return Err(Denied::CapacityExceeded);
        }
        let colony = self
            .company
            .colony_at_mut(location)
            .ok_or(Denied::MissingPrerequisite("no colony at the rocket's location"))?;
        if !colony.storage.reduce(good, quantity) {
            return Err(Denied::InsufficientCargo);
        }
        self.rockets[idx].cargo.add(good, quantity, capacity);
        Ok(())
    }

    /// Move goods from a docked rocket into the co-located colony.
    pub fn unload_rocket(
        &mut self,
        rocket_id: u32,
        good: GoodId,
        quantity: f64,
    ) -> Result<(), Denied> {
        let idx = self
            .rocket_index(rocket_id)
            .ok_or(Denied::UnknownEntity("rocket"))?;
        if self.rockets[idx].is_traveling() {
            return Err(Denied::InvalidTransition("Rocket is traveling"));
        }
        let location = self.rockets[idx].location;
        let colony_capacity = self
            .company
            .colony_at(location)
            .map(|c| c.capacity(self.config.colony_base_capacity))
            .ok_or(Denied::MissingPrerequisite("no colony at the rocket's location"))?;
        if self.rockets[idx].cargo.quantity_of(good) < quantity {
            return Err(Denied::InsufficientCargo);
        }
        let accepted = self
            .company
            .colony_at_mut(location)
            .map(|c| c.storage.add(good, quantity, colony_capacity))
            .unwrap_or(false);
        if !accepted {
            return Err(Denied::CapacityExceeded);
        }
        self.rockets[idx].cargo.reduce(good, quantity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rocket::TradeState;

    fn registry() -> GoodsRegistry {
        GoodsRegistry::standard()
    }

    #[test]
    fn test_start_travel_rejects_unknown_route() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        // Earth-Titan has no direct connection
        let result = session.start_travel(rocket_id, LocationKind::Titan);
        assert!(matches!(result, Err(Denied::InvalidRoute { .. })));
        assert!(!session.rocket(rocket_id).unwrap().is_traveling());
    }

    #[test]
    fn test_start_travel_rejects_unknown_rocket() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let result = session.start_travel(99, LocationKind::Moon);
        assert_eq!(result, Err(Denied::UnknownEntity("rocket")));
    }

    #[test]
    fn test_exploration_quote_prices_escalate_per_colony() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        let first = session
            .exploration_quote(rocket_id, LocationKind::Moon)
            .unwrap();
        assert_eq!(first.price, 100_000.0);
        // Doubled connection stats: Earth-Moon is 1 sol / 20_000 fuel
        assert_eq!(first.travel_time_sols, 2.0);
        assert_eq!(first.fuel, 40_000.0);

        session.company.found_colony("Olympus", LocationKind::Mars);
        let second = session
            .exploration_quote(rocket_id, LocationKind::Moon)
            .unwrap();
        assert_eq!(second.price, 400_000.0);
    }

    #[test]
    fn test_exploration_rejected_without_fuel_leaves_state() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        let credits_before = session.company.credits;

        let result = session.start_exploration(rocket_id, LocationKind::Moon, &registry);
        assert!(matches!(result, Err(Denied::InsufficientFuel { .. })));
        assert_eq!(session.company.credits, credits_before);
        assert!(session.missions.is_empty());
        assert!(!session.rocket(rocket_id).unwrap().is_traveling());
    }

    #[test]
    fn test_exploration_rejected_for_colonized_target() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        session.company.found_colony("Tycho Station", LocationKind::Moon);
        let result = session.start_exploration(rocket_id, LocationKind::Moon, &registry);
        assert!(matches!(result, Err(Denied::MissingPrerequisite(_))));
    }

    #[test]
    fn test_exploration_deducts_price_and_fuel_together() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        let fuel = registry.fuel().unwrap().id;
        let home = session.company.colony_mut(0).unwrap();
        let _ = home.storage.deposit_clamped(fuel, 50_000.0, f64::INFINITY);
        let credits_before = session.company.credits;

        session
            .start_exploration(rocket_id, LocationKind::Moon, &registry)
            .unwrap();
        assert_eq!(session.company.credits, credits_before - 100_000.0);
        let home = session.company.colony(0).unwrap();
        assert_eq!(home.storage.quantity_of(fuel), 10_000.0);
        assert_eq!(session.missions.len(), 1);
    }

    #[test]
    fn test_build_rocket_needs_hangar_allowance() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        // Allowance is 1 and Pioneer already uses it
        let result = session.build_rocket(0, "Endeavour");
        assert!(matches!(result, Err(Denied::MissingPrerequisite(_))));

        session
            .build_colony_module(0, ModuleBlueprint::Infrastructure(InfraKind::Hangar), &registry)
            .unwrap();
        let id = session.build_rocket(0, "Endeavour").unwrap();
        assert_eq!(session.rockets.len(), 2);
        assert_eq!(
            session.rocket(id).unwrap().location,
            LocationKind::Earth
        );
    }

    #[test]
    fn test_build_module_respects_slots_and_cost() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let credits_before = session.company.credits;
        // New game uses 2 of 3 level-1 slots
        session
            .build_colony_module(0, ModuleBlueprint::Production(GoodId(0)), &registry)
            .unwrap();
        assert_eq!(
            session.company.credits,
            credits_before - session.config.module_build_cost
        );
        let result =
            session.build_colony_module(0, ModuleBlueprint::Production(GoodId(1)), &registry);
        assert_eq!(result, Err(Denied::ModuleSlotsFull { allowed: 3 }));
    }

    #[test]
    fn test_upgrade_spends_and_increments() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let credits_before = session.company.credits;
        // Level 1 -> 2 costs floor(50·1.2) = 60
        session.upgrade_colony(0).unwrap();
        assert_eq!(session.company.colony(0).unwrap().level.current(), 2);
        assert_eq!(session.company.credits, credits_before - 60.0);
    }

    #[test]
    fn test_upgrade_rejected_when_broke() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        session.company.credits = 10.0;
        let result = session.upgrade_colony(0);
        assert!(matches!(result, Err(Denied::InsufficientFunds { .. })));
        assert_eq!(session.company.colony(0).unwrap().level.current(), 1);
    }

    #[test]
    fn test_upgrade_module_by_slot() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        session.upgrade_module(0, 0).unwrap();
        let colony = session.company.colony(0).unwrap();
        assert_eq!(colony.modules[0].level().current(), 2);
        assert!(matches!(
            session.upgrade_module(0, 9),
            Err(Denied::UnknownEntity("module"))
        ));
    }

    #[test]
    fn test_buy_goods_checks_funds_then_capacity() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        session.buy_goods(0, GoodId(0), 10.0, &registry).unwrap();
        let colony = session.company.colony(0).unwrap();
        assert_eq!(colony.storage.quantity_of(GoodId(0)), 10.0);

        // Capacity 138: a second huge buy must fail after the funds check
        let result = session.buy_goods(0, GoodId(0), 1_000.0, &registry);
        assert_eq!(result, Err(Denied::CapacityExceeded));

        session.company.credits = 0.0;
        let result = session.buy_goods(0, GoodId(0), 1.0, &registry);
        assert!(matches!(result, Err(Denied::InsufficientFunds { .. })));
    }

    #[test]
    fn test_sell_goods_requires_stock() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let result = session.sell_goods(0, GoodId(0), 5.0, &registry);
        assert_eq!(result, Err(Denied::InsufficientCargo));

        session.buy_goods(0, GoodId(0), 10.0, &registry).unwrap();
        let credits_before = session.company.credits;
        let earned = session.sell_goods(0, GoodId(0), 10.0, &registry).unwrap();
        assert_eq!(earned, 80.0);
        assert_eq!(session.company.credits, credits_before + 80.0);
    }

    #[test]
    fn test_load_and_unload_rocket() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        session.buy_goods(0, GoodId(0), 20.0, &registry).unwrap();

        session.load_rocket(rocket_id, GoodId(0), 15.0).unwrap();
        assert_eq!(
            session.rocket(rocket_id).unwrap().cargo.quantity_of(GoodId(0)),
            15.0
        );
        assert_eq!(
            session.company.colony(0).unwrap().storage.quantity_of(GoodId(0)),
            5.0
        );

        session.unload_rocket(rocket_id, GoodId(0), 15.0).unwrap();
        assert!(session
            .rocket(rocket_id)
            .unwrap()
            .cargo
            .quantity_of(GoodId(0))
            .abs()
            < 1e-9);
        assert_eq!(
            session.company.colony(0).unwrap().storage.quantity_of(GoodId(0)),
            20.0
        );
    }

    #[test]
    fn test_load_rejects_overfull_rocket() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        session.buy_goods(0, GoodId(0), 100.0, &registry).unwrap();
        // Rocket capacity at level 1: floor(50·1.2²) = 72
        let result = session.load_rocket(rocket_id, GoodId(0), 80.0);
        assert_eq!(result, Err(Denied::CapacityExceeded));
        assert!(session.rocket(rocket_id).unwrap().cargo.is_empty());
    }

    #[test]
    fn test_stop_trade_route_clears_flags() {
        let registry = registry();
        let mut session = GameSession::new_game(&registry);
        let rocket_id = session.rockets[0].id;
        {
            let rocket = session.rocket_mut(rocket_id).unwrap();
            rocket.sell_route = true;
            rocket.route_state = TradeState::Outbound;
            rocket.route_origin = Some(0);
            rocket.route_market = Some(LocationKind::Moon);
        }
        session.stop_trade_route(rocket_id).unwrap();
        let rocket = session.rocket(rocket_id).unwrap();
        assert!(!rocket.sell_route);
        assert_eq!(rocket.route_state, TradeState::Idle);
    }
}
