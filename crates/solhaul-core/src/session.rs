//! The aggregate root and tick driver.
//!
//! A `GameSession` owns every mutable piece of game state. An external
//! scheduler calls [`GameSession::tick`] with the elapsed wall-clock delta;
//! the UI calls the synchronous actions in `actions.rs`. Both paths mutate
//! the same aggregate on a single call stack, so each operation is atomic by
//! construction.

use serde::{Deserialize, Serialize};

use solhaul_logic::goods::{GoodId, GoodsRegistry};
use solhaul_logic::location::{connection_table, find_connection, Connection, LocationKind};
use solhaul_logic::modules::{InfraKind, InfrastructureModule, Module, ProductionModule};

use crate::company::Company;
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::rocket::Rocket;

/// A pending colonization job bound to a traveling rocket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationMission {
    pub rocket_id: u32,
    pub target: LocationKind,
}

/// The whole game state plus the static connection graph.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub company: Company,
    pub rockets: Vec<Rocket>,
    pub missions: Vec<ExplorationMission>,
    /// Completed sols since the start of the game.
    pub sol: u64,
    /// Fraction of the current sol elapsed, in [0, 1).
    pub sol_progress: f64,
    pub config: GameConfig,

    pub(crate) next_rocket_id: u32,
    pub(crate) connections: Vec<Connection>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Start a new game: an Earth colony with fuel production and a hangar,
    /// one rocket, and the configured starting treasury.
    pub fn new_game(registry: &GoodsRegistry) -> Self {
        Self::new_game_with(GameConfig::default(), registry)
    }

    pub fn new_game_with(config: GameConfig, registry: &GoodsRegistry) -> Self {
        let mut company = Company::new(config.starting_credits);
        let home_id = company.found_colony("Gaia Base", LocationKind::Earth);
        if let Some(home) = company.colony_mut(home_id) {
            if let Some(fuel) = registry.fuel() {
                let _ = home.add_module(Module::Production(ProductionModule::new(
                    fuel.id,
                    fuel.base_per_sol,
                )));
            }
            let _ = home.add_module(Module::Infrastructure(InfrastructureModule::new(
                InfraKind::Hangar,
            )));
        }

        let mut session = Self {
            company,
            rockets: Vec::new(),
            missions: Vec::new(),
            sol: 0,
            sol_progress: 0.0,
            config,
            next_rocket_id: 0,
            connections: connection_table(),
            events: Vec::new(),
        };
        session.spawn_rocket("Pioneer", LocationKind::Earth);
        session
    }

    /// Reassemble a session from persisted parts. Used by `persistence`.
    pub(crate) fn from_parts(
        company: Company,
        rockets: Vec<Rocket>,
        missions: Vec<ExplorationMission>,
        sol: u64,
        sol_progress: f64,
        config: GameConfig,
    ) -> Self {
        let next_rocket_id = rockets.iter().map(|r| r.id + 1).max().unwrap_or(0);
        Self {
            company,
            rockets,
            missions,
            sol,
            sol_progress,
            config,
            next_rocket_id,
            connections: connection_table(),
            events: Vec::new(),
        }
    }

    pub(crate) fn spawn_rocket(&mut self, name: &str, location: LocationKind) -> u32 {
        let id = self.next_rocket_id;
        self.next_rocket_id += 1;
        self.rockets.push(Rocket::new(id, name, location));
        id
    }

    pub fn rocket(&self, id: u32) -> Option<&Rocket> {
        self.rockets.iter().find(|r| r.id == id)
    }

    pub fn rocket_mut(&mut self, id: u32) -> Option<&mut Rocket> {
        self.rockets.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn rocket_index(&self, id: u32) -> Option<usize> {
        self.rockets.iter().position(|r| r.id == id)
    }

    pub(crate) fn find_connection(
        &self,
        from: LocationKind,
        to: LocationKind,
    ) -> Option<Connection> {
        find_connection(&self.connections, from, to)
    }

    /// Take all queued events. The consumer decides how to present them.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Advance the simulation by `elapsed_minutes` of wall-clock time.
    /// Returns whether visible state changed, so the consumer can decide
    /// whether to re-render.
    ///
    /// Travel timers advance by the raw delta every call; sol progress is an
    /// independent accumulator that may finalize several sols at once after
    /// a long pause.
    pub fn tick(&mut self, elapsed_minutes: f64, registry: &GoodsRegistry) -> bool {
        if elapsed_minutes <= 0.0 {
            return false;
        }
        let events_before = self.events.len();
        let mut changed = false;

        // Travel.
        let mut arrivals: Vec<u32> = Vec::new();
        for rocket in &mut self.rockets {
            if rocket.is_traveling() {
                changed = true;
                if rocket.advance_travel(elapsed_minutes) {
                    arrivals.push(rocket.id);
                }
            }
        }
        for rocket_id in arrivals {
            self.handle_arrival(rocket_id, registry);
        }

        // Sol progress. Visible on its own only when the displayed whole
        // percent moves.
        let displayed_before = (self.sol_progress * 100.0).floor();
        self.sol_progress += elapsed_minutes / self.config.minutes_per_sol;
        while self.sol_progress >= 1.0 {
            self.sol_progress -= 1.0;
            self.sol += 1;
            self.finalize_sol(registry);
            changed = true;
        }
        if (self.sol_progress * 100.0).floor() != displayed_before {
            changed = true;
        }

        changed || self.events.len() > events_before
    }

    /// Dock a rocket and run arrival side effects: trade-route automation
    /// first, then exploration resolution.
    fn handle_arrival(&mut self, rocket_id: u32, registry: &GoodsRegistry) {
        let idx = match self.rocket_index(rocket_id) {
            Some(idx) => idx,
            None => return,
        };
        self.rockets[idx].complete_travel();
        let location = self.rockets[idx].location;
        log::info!("Rocket {} arrived at {}", rocket_id, location.name());
        self.push_event(GameEvent::TravelCompleted {
            rocket_id,
            location,
        });

        if self.rockets[idx].sell_route {
            self.trade_on_arrival(idx, registry);
        }

        if let Some(mission_pos) = self
            .missions
            .iter()
            .position(|m| m.rocket_id == rocket_id && m.target == location)
        {
            self.missions.remove(mission_pos);
            if self.company.colony_at(location).is_none() {
                let colony_id = self
                    .company
                    .found_colony(format!("{} Outpost", location.name()), location);
                log::info!("Colony founded at {}", location.name());
                self.push_event(GameEvent::ColonyFounded {
                    colony_id,
                    location,
                });
            }
        }
    }

    /// Commit one sol of production into every colony's storage.
    fn finalize_sol(&mut self, registry: &GoodsRegistry) {
        for i in 0..self.company.colonies.len() {
            let outcome = self.company.colonies[i].finalize_sol(registry, &self.config);
            if outcome.credited > 0.0 {
                self.company.earn(outcome.credited);
            }
            let colony_id = self.company.colonies[i].id;
            for (good, lost, credited) in outcome.overflows {
                log::warn!(
                    "Colony {} overflow: {:.1} units of good {:?} lost",
                    colony_id,
                    lost,
                    good
                );
                self.push_event(GameEvent::ProductionOverflow {
                    colony_id,
                    good,
                    lost,
                    credited,
                });
            }
        }
        self.push_event(GameEvent::SolCompleted { sol: self.sol });
    }

    /// Exact fuel stock at a location (0 when uncolonized).
    pub(crate) fn fuel_stock_at(&self, location: LocationKind, fuel: GoodId) -> f64 {
        self.company
            .colony_at(location)
            .map(|c| c.storage.quantity_of(fuel))
            .unwrap_or(0.0)
    }
}
