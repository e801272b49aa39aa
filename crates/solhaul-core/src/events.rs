//! Reported, non-fatal engine events.
//!
//! The session queues these for the consumer (toasts, message log) and
//! mirrors the important ones to the `log` facade. Events are transient and
//! never persisted.

use solhaul_logic::goods::GoodId;
use solhaul_logic::location::LocationKind;

/// Something the UI may want to surface.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A full sol elapsed and production was finalized.
    SolCompleted { sol: u64 },
    /// Sol-end production exceeded colony capacity. `credited` is nonzero
    /// only under the auto-sell overflow policy.
    ProductionOverflow {
        colony_id: u32,
        good: GoodId,
        lost: f64,
        credited: f64,
    },
    /// A rocket docked at its destination.
    TravelCompleted {
        rocket_id: u32,
        location: LocationKind,
    },
    /// A trade-route rocket sold its cargo at the market.
    CargoSold { rocket_id: u32, earned: f64 },
    /// A trade route shut itself down.
    TradeRouteDisabled { rocket_id: u32, reason: String },
    /// An exploration mission founded a new colony.
    ColonyFounded {
        colony_id: u32,
        location: LocationKind,
    },
}
