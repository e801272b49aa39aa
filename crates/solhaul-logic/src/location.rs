//! Location types, environment modifiers, and the travel connection table.
//!
//! Locations are a closed, fixed set compared by value. The modifier reflects
//! environmental difficulty: 1.0 is the Earth baseline, low-gravity bodies
//! run higher to compensate for harsher conditions.

use serde::{Deserialize, Serialize};

/// A point in the location graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Earth,
    Moon,
    Mars,
    Venus,
    Mercury,
    Ceres,
    Europa,
    Titan,
}

impl LocationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Earth => "Earth",
            Self::Moon => "Moon",
            Self::Mars => "Mars",
            Self::Venus => "Venus",
            Self::Mercury => "Mercury",
            Self::Ceres => "Ceres",
            Self::Europa => "Europa",
            Self::Titan => "Titan",
        }
    }

    /// Per-location production/capacity modifier.
    pub fn modifier(&self) -> f64 {
        match self {
            Self::Earth => 1.0,
            Self::Moon => 1.3,
            Self::Mars => 1.2,
            Self::Venus => 0.9,
            Self::Mercury => 1.1,
            Self::Ceres => 1.4,
            Self::Europa => 1.35,
            Self::Titan => 1.25,
        }
    }

    pub fn all() -> [LocationKind; 8] {
        [
            Self::Earth,
            Self::Moon,
            Self::Mars,
            Self::Venus,
            Self::Mercury,
            Self::Ceres,
            Self::Europa,
            Self::Titan,
        ]
    }
}

/// A bidirectional edge between two location types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: LocationKind,
    pub to: LocationKind,
    /// Travel time in sols.
    pub travel_time_sols: f64,
    /// Fuel units consumed for one leg.
    pub fuel_cost: f64,
}

/// The static connection table. Edges are stored once and matched in either
/// direction by [`find_connection`].
pub fn connection_table() -> Vec<Connection> {
    use LocationKind::*;
    vec![
        Connection { from: Earth, to: Moon, travel_time_sols: 1.0, fuel_cost: 20_000.0 },
        Connection { from: Earth, to: Mars, travel_time_sols: 6.0, fuel_cost: 100_000.0 },
        Connection { from: Earth, to: Venus, travel_time_sols: 5.0, fuel_cost: 80_000.0 },
        Connection { from: Moon, to: Mars, travel_time_sols: 5.0, fuel_cost: 80_000.0 },
        Connection { from: Venus, to: Mercury, travel_time_sols: 4.0, fuel_cost: 60_000.0 },
        Connection { from: Mars, to: Ceres, travel_time_sols: 4.0, fuel_cost: 60_000.0 },
        Connection { from: Mars, to: Europa, travel_time_sols: 7.0, fuel_cost: 110_000.0 },
        Connection { from: Ceres, to: Europa, travel_time_sols: 5.0, fuel_cost: 90_000.0 },
        Connection { from: Europa, to: Titan, travel_time_sols: 6.0, fuel_cost: 100_000.0 },
    ]
}

/// Find the edge between two locations, matching the stored direction or its
/// reverse. Returns `None` when the locations are not connected.
pub fn find_connection(
    table: &[Connection],
    from: LocationKind,
    to: LocationKind,
) -> Option<Connection> {
    table
        .iter()
        .find(|c| (c.from == from && c.to == to) || (c.from == to && c.to == from))
        .copied()
}
