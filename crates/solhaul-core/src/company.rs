//! Company aggregate: the treasury and the colony list.

use serde::{Deserialize, Serialize};

use solhaul_logic::leveling::Level;
use solhaul_logic::location::LocationKind;

use crate::colony::Colony;
use crate::rules::Denied;

/// Level cap for the company itself.
pub const COMPANY_MAX_LEVEL: u32 = 50;

/// The player's economic root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub credits: f64,
    pub level: Level,
    pub colonies: Vec<Colony>,
    next_colony_id: u32,
}

impl Company {
    pub fn new(starting_credits: f64) -> Self {
        Self {
            credits: starting_credits,
            level: Level::new(COMPANY_MAX_LEVEL),
            colonies: Vec::new(),
            next_colony_id: 0,
        }
    }

    /// Deduct credits, refusing the whole amount when short.
    pub fn spend(&mut self, amount: f64) -> Result<(), Denied> {
        if self.credits < amount {
            return Err(Denied::InsufficientFunds {
                needed: amount,
                available: self.credits,
            });
        }
        self.credits -= amount;
        Ok(())
    }

    pub fn earn(&mut self, amount: f64) {
        self.credits += amount;
    }

    /// Found a colony at a location and return its id.
    pub fn found_colony(&mut self, name: impl Into<String>, location: LocationKind) -> u32 {
        let id = self.next_colony_id;
        self.next_colony_id += 1;
        self.colonies.push(Colony::new(id, name, location));
        id
    }

    pub fn colony_at(&self, location: LocationKind) -> Option<&Colony> {
        self.colonies.iter().find(|c| c.location == location)
    }

    pub fn colony_at_mut(&mut self, location: LocationKind) -> Option<&mut Colony> {
        self.colonies.iter_mut().find(|c| c.location == location)
    }

    pub fn colony(&self, id: u32) -> Option<&Colony> {
        self.colonies.iter().find(|c| c.id == id)
    }

    pub fn colony_mut(&mut self, id: u32) -> Option<&mut Colony> {
        self.colonies.iter_mut().find(|c| c.id == id)
    }

    /// Rockets the company may operate, granted by hangars across colonies.
    pub fn fleet_allowance(&self) -> u32 {
        self.colonies.iter().map(|c| c.hangar_allowance()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_rejects_when_short() {
        let mut company = Company::new(100.0);
        let result = company.spend(150.0);
        assert_eq!(
            result,
            Err(Denied::InsufficientFunds {
                needed: 150.0,
                available: 100.0
            })
        );
        assert_eq!(company.credits, 100.0);
    }

    #[test]
    fn test_spend_and_earn() {
        let mut company = Company::new(100.0);
        assert!(company.spend(40.0).is_ok());
        company.earn(10.0);
        assert_eq!(company.credits, 70.0);
    }

    #[test]
    fn test_found_colony_assigns_ids() {
        let mut company = Company::new(0.0);
        let a = company.found_colony("Gaia Base", LocationKind::Earth);
        let b = company.found_colony("Olympus", LocationKind::Mars);
        assert_ne!(a, b);
        assert_eq!(company.colony_at(LocationKind::Mars).unwrap().id, b);
        assert!(company.colony_at(LocationKind::Titan).is_none());
    }
}
