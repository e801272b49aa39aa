//! Colonization quotes.
//!
//! An exploration mission is priced from the company's current colony count
//! and the target connection alone; the quote is a pure function so the UI
//! can display it without committing anything.

use serde::{Deserialize, Serialize};

use crate::location::Connection;

/// Exploration legs cost this multiple of the base connection's fuel and
/// travel time. Kept configurable; the source applies a flat 2× with no
/// further rationale.
pub const DEFAULT_STAT_FACTOR: f64 = 2.0;

/// Price, fuel, and time required to found a colony over one connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationQuote {
    /// Credits deducted from the treasury.
    pub price: f64,
    /// Fuel units drawn from the origin colony.
    pub fuel: f64,
    /// Travel time in sols.
    pub travel_time_sols: f64,
}

/// Mission price: `floor(100_000 · 4^max(0, colony_count - 1))`.
pub fn mission_price(colony_count: usize) -> f64 {
    let exponent = colony_count.saturating_sub(1) as i32;
    (100_000.0 * 4.0f64.powi(exponent)).floor()
}

/// Quote a mission over `connection` given the current colony count.
pub fn quote(connection: &Connection, colony_count: usize, stat_factor: f64) -> ExplorationQuote {
    ExplorationQuote {
        price: mission_price(colony_count),
        fuel: connection.fuel_cost * stat_factor,
        travel_time_sols: connection.travel_time_sols * stat_factor,
    }
}
