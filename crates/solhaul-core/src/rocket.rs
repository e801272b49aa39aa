//! Rocket aggregate and its travel state machine.
//!
//! A rocket is Docked when it has no destination and both travel timers are
//! zero, and Traveling when a destination is set and the remaining timer is
//! counting down. Trade-route automation rides on top of this lifecycle in
//! `trade.rs`; the rocket itself only knows how to fly.

use serde::{Deserialize, Serialize};

use solhaul_logic::inventory::{self, Inventory, ROCKET_STORAGE_SCALE};
use solhaul_logic::leveling::Level;
use solhaul_logic::location::LocationKind;

use crate::rules::Denied;

/// Level cap for rockets.
pub const ROCKET_MAX_LEVEL: u32 = 100;

/// Position in the automated trade cycle. Meaningful only while
/// `sell_route` is set; a disabled route is always Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TradeState {
    #[default]
    Idle,
    /// Loaded and flying toward the market.
    Outbound,
    /// Sold out and flying back to the origin colony.
    Returning,
}

/// Mobile cargo unit capable of travel between connected locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    pub id: u32,
    pub name: String,
    /// Departure point while traveling, current berth while docked.
    pub location: LocationKind,
    pub destination: Option<LocationKind>,
    /// Minutes left until arrival. Zero while docked.
    pub travel_remaining_min: f64,
    /// Full duration of the current leg. Zero while docked.
    pub travel_initial_min: f64,
    pub level: Level,
    pub cargo: Inventory,

    // Trade-route fields. Older snapshots without them load as a disabled
    // route in the Idle state.
    #[serde(default)]
    pub sell_route: bool,
    #[serde(default)]
    pub route_state: TradeState,
    #[serde(default)]
    pub route_origin: Option<u32>,
    #[serde(default)]
    pub route_market: Option<LocationKind>,
}

impl Rocket {
    pub fn new(id: u32, name: impl Into<String>, location: LocationKind) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            destination: None,
            travel_remaining_min: 0.0,
            travel_initial_min: 0.0,
            level: Level::new(ROCKET_MAX_LEVEL),
            cargo: Inventory::new(),
            sell_route: false,
            route_state: TradeState::Idle,
            route_origin: None,
            route_market: None,
        }
    }

    pub fn is_traveling(&self) -> bool {
        self.destination.is_some()
    }

    /// Cargo capacity at the current level.
    pub fn capacity(&self, base: f64) -> f64 {
        inventory::capacity(base, ROCKET_STORAGE_SCALE, self.level.current())
    }

    /// Depart for `destination`. The caller has already resolved the
    /// connection; `travel_time_sols` is the (possibly scaled) leg duration.
    pub fn start_travel(
        &mut self,
        destination: LocationKind,
        travel_time_sols: f64,
        minutes_per_sol: f64,
    ) -> Result<(), Denied> {
        if self.is_traveling() {
            return Err(Denied::InvalidTransition("Rocket is already traveling"));
        }
        if destination == self.location {
            return Err(Denied::InvalidTransition("Rocket is already there"));
        }
        let duration = travel_time_sols * minutes_per_sol;
        self.destination = Some(destination);
        self.travel_initial_min = duration;
        self.travel_remaining_min = duration;
        Ok(())
    }

    /// Count down the travel timer. Returns true once the rocket is due to
    /// arrive. Docked rockets are unaffected, so calling this after
    /// completion never drives the timer negative.
    pub fn advance_travel(&mut self, elapsed_min: f64) -> bool {
        if !self.is_traveling() {
            return false;
        }
        self.travel_remaining_min -= elapsed_min;
        self.travel_remaining_min <= 0.0
    }

    /// Dock at the destination and reset both timers.
    pub fn complete_travel(&mut self) {
        if let Some(destination) = self.destination.take() {
            self.location = destination;
        }
        self.travel_remaining_min = 0.0;
        self.travel_initial_min = 0.0;
    }

    /// Drop out of trade-route mode. The next tick or action observes the
    /// cleared flags; an in-flight rocket simply finishes its leg.
    pub fn clear_route(&mut self) {
        self.sell_route = false;
        self.route_state = TradeState::Idle;
        self.route_origin = None;
        self.route_market = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docked_rocket() -> Rocket {
        Rocket::new(0, "Pioneer", LocationKind::Earth)
    }

    #[test]
    fn test_start_travel_sets_timers() {
        let mut rocket = docked_rocket();
        // Earth->Mars at 6 sols, 0.5 minutes per sol => 3 minutes
        rocket
            .start_travel(LocationKind::Mars, 6.0, 0.5)
            .unwrap();
        assert!(rocket.is_traveling());
        assert_eq!(rocket.travel_initial_min, 3.0);
        assert_eq!(rocket.travel_remaining_min, 3.0);
    }

    #[test]
    fn test_double_start_travel_fails_unchanged() {
        let mut rocket = docked_rocket();
        rocket.start_travel(LocationKind::Mars, 6.0, 0.5).unwrap();
        let before = rocket.clone();
        let result = rocket.start_travel(LocationKind::Moon, 1.0, 0.5);
        assert!(matches!(result, Err(Denied::InvalidTransition(_))));
        assert_eq!(rocket, before);
    }

    #[test]
    fn test_travel_to_current_location_fails() {
        let mut rocket = docked_rocket();
        let result = rocket.start_travel(LocationKind::Earth, 0.0, 0.5);
        assert!(matches!(result, Err(Denied::InvalidTransition(_))));
        assert!(!rocket.is_traveling());
    }

    #[test]
    fn test_advance_and_complete() {
        let mut rocket = docked_rocket();
        rocket.start_travel(LocationKind::Mars, 6.0, 0.5).unwrap();
        assert!(!rocket.advance_travel(1.0));
        assert!(!rocket.advance_travel(1.0));
        assert!(rocket.advance_travel(1.0));
        rocket.complete_travel();
        assert_eq!(rocket.location, LocationKind::Mars);
        assert!(rocket.destination.is_none());
        assert_eq!(rocket.travel_remaining_min, 0.0);
        assert_eq!(rocket.travel_initial_min, 0.0);
    }

    #[test]
    fn test_advance_after_docking_is_noop() {
        let mut rocket = docked_rocket();
        rocket.start_travel(LocationKind::Mars, 6.0, 0.5).unwrap();
        rocket.advance_travel(10.0);
        rocket.complete_travel();
        // Further advances must not drive the timer negative
        assert!(!rocket.advance_travel(5.0));
        assert_eq!(rocket.travel_remaining_min, 0.0);
    }

    #[test]
    fn test_remaining_never_exceeds_initial() {
        let mut rocket = docked_rocket();
        rocket.start_travel(LocationKind::Mars, 6.0, 0.5).unwrap();
        rocket.advance_travel(0.5);
        assert!(rocket.travel_remaining_min <= rocket.travel_initial_min);
        assert!(rocket.travel_remaining_min > 0.0);
    }

    #[test]
    fn test_capacity_law() {
        let rocket = docked_rocket();
        // floor(50 · 1.2²) = 72
        assert_eq!(rocket.capacity(50.0), 72.0);
    }

    #[test]
    fn test_clear_route_resets_all_fields() {
        let mut rocket = docked_rocket();
        rocket.sell_route = true;
        rocket.route_state = TradeState::Outbound;
        rocket.route_origin = Some(3);
        rocket.route_market = Some(LocationKind::Mars);
        rocket.clear_route();
        assert!(!rocket.sell_route);
        assert_eq!(rocket.route_state, TradeState::Idle);
        assert!(rocket.route_origin.is_none());
        assert!(rocket.route_market.is_none());
    }
}
