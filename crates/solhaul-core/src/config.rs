//! Engine configuration, constructed at startup and carried by the session.

use serde::{Deserialize, Serialize};

use solhaul_logic::exploration;

/// What happens to sol-end production that exceeds colony capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Excess is discarded (source behavior).
    #[default]
    Discard,
    /// Excess is sold immediately at the good's market sell price.
    AutoSell,
}

/// Tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Real-time duration of one sol, in minutes.
    pub minutes_per_sol: f64,
    /// Multiplier applied to a connection's fuel and travel time for
    /// exploration missions.
    pub exploration_stat_factor: f64,
    /// Sol-end overflow handling.
    pub overflow_policy: OverflowPolicy,
    /// Base storage capacity of a colony before leveling and modifiers.
    pub colony_base_capacity: f64,
    /// Base cargo capacity of a rocket before leveling.
    pub rocket_base_capacity: f64,
    /// Credits to build a new rocket.
    pub rocket_build_cost: f64,
    /// Credits to build a new colony module.
    pub module_build_cost: f64,
    /// Treasury at the start of a new game.
    pub starting_credits: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            minutes_per_sol: 0.5,
            exploration_stat_factor: exploration::DEFAULT_STAT_FACTOR,
            overflow_policy: OverflowPolicy::Discard,
            colony_base_capacity: 100.0,
            rocket_base_capacity: 50.0,
            rocket_build_cost: 50_000.0,
            module_build_cost: 1_000.0,
            starting_credits: 200_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.minutes_per_sol, 0.5);
        assert_eq!(config.exploration_stat_factor, 2.0);
        assert_eq!(config.overflow_policy, OverflowPolicy::Discard);
    }
}
