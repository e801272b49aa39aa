//! Colony-level production multiplier and capacity formulas.

use crate::inventory::{self, COLONY_STORAGE_SCALE};

/// Production multiplier for a colony: `modifier² · 1.02^(level-1)`.
pub fn colony_multiplier(location_modifier: f64, colony_level: u32) -> f64 {
    location_modifier.powi(2) * 1.02f64.powi(colony_level as i32 - 1)
}

/// Leveled base storage capacity of a colony, scaled by the squared location
/// modifier. Warehouse bonuses are added by the colony aggregate on top.
pub fn colony_base_capacity(base: f64, location_modifier: f64, colony_level: u32) -> f64 {
    (inventory::capacity(base, COLONY_STORAGE_SCALE, colony_level) * location_modifier.powi(2))
        .floor()
}
