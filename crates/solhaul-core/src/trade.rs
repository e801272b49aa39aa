//! Trade-route automation.
//!
//! A cyclic state machine carried on a rocket and driven entirely by travel
//! completion: Idle -> Outbound -> Returning -> Idle. Every step either
//! completes in full or disables the route, so a trade rocket is never left
//! mid-cycle in a state the rest of the engine cannot handle. A disabled
//! rocket is simply docked with no destination.

use solhaul_logic::goods::{GoodCategory, GoodId, GoodsRegistry};
use solhaul_logic::location::LocationKind;

use crate::events::GameEvent;
use crate::rocket::TradeState;
use crate::rules::Denied;
use crate::session::GameSession;

impl GameSession {
    /// Arrival hook for a rocket with an enabled route. Failures disable the
    /// route and report the reason instead of bubbling up.
    pub(crate) fn trade_on_arrival(&mut self, idx: usize, registry: &GoodsRegistry) {
        let step = match self.rockets[idx].route_state {
            TradeState::Idle => Ok(()),
            TradeState::Outbound => self.trade_arrive_at_market(idx, registry),
            TradeState::Returning => {
                self.rockets[idx].route_state = TradeState::Idle;
                // Back home: immediately restart the cycle
                self.trade_depart(idx, registry)
            }
        };
        if let Err(denied) = step {
            self.disable_route(idx, denied.to_string());
        }
    }

    /// The Idle branch: load cargo at the origin colony, fuel up, and depart
    /// for the market. Leaves the rocket untouched on failure.
    pub(crate) fn trade_depart(&mut self, idx: usize, registry: &GoodsRegistry) -> Result<(), Denied> {
        let (origin_id, market) = match (
            self.rockets[idx].route_origin,
            self.rockets[idx].route_market,
        ) {
            (Some(origin_id), Some(market)) => (origin_id, market),
            _ => return Err(Denied::MissingPrerequisite("trade route not configured")),
        };
        let location = self.rockets[idx].location;
        match self.company.colony_at(location) {
            Some(colony) if colony.id == origin_id => {}
            _ => return Err(Denied::MissingPrerequisite("origin colony no longer exists")),
        }
        let connection = self
            .find_connection(location, market)
            .ok_or(Denied::InvalidRoute {
                from: location,
                to: market,
            })?;

        // Affordability first, so a fuel failure never strands loaded cargo.
        self.check_leg_fuel(location, connection.fuel_cost, registry)?;

        self.load_tradeable_goods(idx, origin_id, registry);
        self.consume_leg_fuel(location, connection.fuel_cost, registry)?;

        let minutes_per_sol = self.config.minutes_per_sol;
        self.rockets[idx].start_travel(market, connection.travel_time_sols, minutes_per_sol)?;
        self.rockets[idx].route_state = TradeState::Outbound;
        Ok(())
    }

    /// Outbound arrival: sell everything, fuel the return leg, fly home.
    fn trade_arrive_at_market(&mut self, idx: usize, registry: &GoodsRegistry) -> Result<(), Denied> {
        let origin_id = self.rockets[idx]
            .route_origin
            .ok_or(Denied::MissingPrerequisite("trade route not configured"))?;
        let origin_location = self
            .company
            .colony(origin_id)
            .map(|c| c.location)
            .ok_or(Denied::MissingPrerequisite("origin colony no longer exists"))?;

        let earned = self.sell_all_cargo(idx, registry);
        if earned > 0.0 {
            let rocket_id = self.rockets[idx].id;
            log::info!("Rocket {} sold cargo for {:.0} credits", rocket_id, earned);
            self.push_event(GameEvent::CargoSold { rocket_id, earned });
        }

        let location = self.rockets[idx].location;
        let connection =
            self.find_connection(location, origin_location)
                .ok_or(Denied::InvalidRoute {
                    from: location,
                    to: origin_location,
                })?;
        self.consume_leg_fuel(location, connection.fuel_cost, registry)?;

        let minutes_per_sol = self.config.minutes_per_sol;
        self.rockets[idx].start_travel(
            origin_location,
            connection.travel_time_sols,
            minutes_per_sol,
        )?;
        self.rockets[idx].route_state = TradeState::Returning;
        Ok(())
    }

    /// Move every non-fuel position from the origin colony into the rocket,
    /// up to the rocket's free capacity. Partial loads are fine here; the
    /// all-or-nothing rule applies to a single transfer, not the sweep.
    fn load_tradeable_goods(&mut self, idx: usize, origin_id: u32, registry: &GoodsRegistry) {
        let rocket_capacity = self.rockets[idx].capacity(self.config.rocket_base_capacity);
        let stock: Vec<(GoodId, f64)> = match self.company.colony(origin_id) {
            Some(colony) => colony
                .storage
                .positions()
                .iter()
                .map(|p| (p.good, p.quantity))
                .collect(),
            None => return,
        };
        for (good, quantity) in stock {
            if quantity <= 0.0 {
                continue;
            }
            let is_fuel = registry
                .get(good)
                .map(|g| g.category == GoodCategory::Fuel)
                .unwrap_or(false);
            if is_fuel {
                continue;
            }
            let free = rocket_capacity - self.rockets[idx].cargo.total_exact();
            if free <= 0.0 {
                break;
            }
            let take = quantity.min(free);
            if let Some(colony) = self.company.colony_mut(origin_id) {
                if colony.storage.reduce(good, take) {
                    self.rockets[idx].cargo.add(good, take, rocket_capacity);
                }
            }
        }
    }

    /// Sell every unit of cargo at market sell price and credit the
    /// treasury. Returns the total earned.
    fn sell_all_cargo(&mut self, idx: usize, registry: &GoodsRegistry) -> f64 {
        let mut earned = 0.0;
        let positions: Vec<(GoodId, f64)> = self.rockets[idx]
            .cargo
            .positions()
            .iter()
            .map(|p| (p.good, p.quantity))
            .collect();
        for (good, quantity) in positions {
            if let Some(def) = registry.get(good) {
                earned += quantity * def.sell_price;
            }
            self.rockets[idx].cargo.remove(good);
        }
        self.company.earn(earned);
        earned
    }

    /// Verify one leg's fuel is coverable: stock at `location` first, any
    /// shortfall bought at market buy price. Mutates nothing.
    fn check_leg_fuel(
        &self,
        location: LocationKind,
        needed: f64,
        registry: &GoodsRegistry,
    ) -> Result<(), Denied> {
        let fuel = registry
            .fuel()
            .ok_or(Denied::MissingPrerequisite("no fuel good defined"))?;
        let available = self.fuel_stock_at(location, fuel.id);
        let shortfall = (needed - available).max(0.0);
        let cost = shortfall * fuel.buy_price;
        if self.company.credits < cost {
            return Err(Denied::InsufficientFunds {
                needed: cost,
                available: self.company.credits,
            });
        }
        Ok(())
    }

    /// Burn one leg's fuel: colony stock first, shortfall auto-purchased.
    fn consume_leg_fuel(
        &mut self,
        location: LocationKind,
        needed: f64,
        registry: &GoodsRegistry,
    ) -> Result<(), Denied> {
        let fuel = registry
            .fuel()
            .ok_or(Denied::MissingPrerequisite("no fuel good defined"))?;
        let available = self.fuel_stock_at(location, fuel.id);
        let from_stock = needed.min(available);
        let shortfall = needed - from_stock;
        if shortfall > 0.0 {
            self.company.spend(shortfall * fuel.buy_price)?;
        }
        if from_stock > 0.0 {
            if let Some(colony) = self.company.colony_at_mut(location) {
                colony.storage.reduce(fuel.id, from_stock);
            }
        }
        Ok(())
    }

    /// Shut the route down and report why. The rocket stays docked wherever
    /// it is (or finishes its current leg as a plain flight).
    pub(crate) fn disable_route(&mut self, idx: usize, reason: String) {
        let rocket_id = self.rockets[idx].id;
        self.rockets[idx].clear_route();
        log::warn!("Trade route on rocket {} disabled: {}", rocket_id, reason);
        self.push_event(GameEvent::TradeRouteDisabled { rocket_id, reason });
    }
}
