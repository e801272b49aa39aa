//! Good definitions and the read-only goods registry.
//!
//! The registry is startup configuration: built once, passed by reference to
//! whatever needs it. Nothing in the engine reaches for a global lookup.

use serde::{Deserialize, Serialize};

/// Identifier of a good in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoodId(pub u8);

/// Broad commodity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoodCategory {
    RawMaterial,
    Refined,
    Consumable,
    /// Rocket propellant. Trade routes never load fuel as cargo.
    Fuel,
}

/// A tradeable commodity definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Good {
    pub id: GoodId,
    pub name: &'static str,
    pub category: GoodCategory,
    /// Base production per sol for a level-1 production module.
    pub base_per_sol: f64,
    /// Market price when the company buys a unit.
    pub buy_price: f64,
    /// Market price when the company sells a unit.
    pub sell_price: f64,
}

/// Read-only lookup from good id to definition.
#[derive(Debug, Clone)]
pub struct GoodsRegistry {
    goods: Vec<Good>,
}

impl GoodsRegistry {
    /// Build a registry from explicit definitions.
    pub fn new(goods: Vec<Good>) -> Self {
        Self { goods }
    }

    /// The standard commodity set.
    pub fn standard() -> Self {
        Self::new(vec![
            Good {
                id: GoodId(0),
                name: "Iron Ore",
                category: GoodCategory::RawMaterial,
                base_per_sol: 2.0,
                buy_price: 12.0,
                sell_price: 8.0,
            },
            Good {
                id: GoodId(1),
                name: "Water Ice",
                category: GoodCategory::RawMaterial,
                base_per_sol: 3.0,
                buy_price: 8.0,
                sell_price: 5.0,
            },
            Good {
                id: GoodId(2),
                name: "Silicates",
                category: GoodCategory::RawMaterial,
                base_per_sol: 1.5,
                buy_price: 18.0,
                sell_price: 12.0,
            },
            Good {
                id: GoodId(3),
                name: "Alloys",
                category: GoodCategory::Refined,
                base_per_sol: 0.8,
                buy_price: 60.0,
                sell_price: 42.0,
            },
            Good {
                id: GoodId(4),
                name: "Electronics",
                category: GoodCategory::Refined,
                base_per_sol: 0.4,
                buy_price: 130.0,
                sell_price: 90.0,
            },
            Good {
                id: GoodId(5),
                name: "Rations",
                category: GoodCategory::Consumable,
                base_per_sol: 2.5,
                buy_price: 10.0,
                sell_price: 7.0,
            },
            Good {
                id: GoodId(6),
                name: "Fuel",
                category: GoodCategory::Fuel,
                base_per_sol: 5.0,
                buy_price: 2.0,
                sell_price: 1.0,
            },
        ])
    }

    pub fn get(&self, id: GoodId) -> Option<&Good> {
        self.goods.iter().find(|g| g.id == id)
    }

    /// The propellant good. The standard registry always defines one.
    pub fn fuel(&self) -> Option<&Good> {
        self.goods
            .iter()
            .find(|g| g.category == GoodCategory::Fuel)
    }

    pub fn all(&self) -> &[Good] {
        &self.goods
    }
}
