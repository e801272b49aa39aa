//! Capacity-bounded item storage.
//!
//! An inventory holds one position per distinct good, in insertion order.
//! Capacity is owned by the container's aggregate (colony or rocket) and
//! passed into each mutating call, so the same inventory type serves both
//! without a shared base class.

use serde::{Deserialize, Serialize};

use crate::goods::GoodId;

/// Storage capacity scale factor for rockets.
pub const ROCKET_STORAGE_SCALE: f64 = 1.2;
/// Storage capacity scale factor for colonies.
pub const COLONY_STORAGE_SCALE: f64 = 1.175;

/// Capacity law: `floor(base · scale^(level+1))`.
pub fn capacity(base: f64, scale: f64, level: u32) -> f64 {
    (base * scale.powi(level as i32 + 1)).floor()
}

/// Quantity of one good held by a storage owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPosition {
    pub good: GoodId,
    pub quantity: f64,
}

/// Insertion-ordered list of item positions, one per distinct good.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    positions: Vec<ItemPosition>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[ItemPosition] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Exact stored quantity of one good (0 when no position exists).
    pub fn quantity_of(&self, good: GoodId) -> f64 {
        self.positions
            .iter()
            .find(|p| p.good == good)
            .map(|p| p.quantity)
            .unwrap_or(0.0)
    }

    /// Summed quantity across all positions, reported as whole units.
    /// Fractional accrual is allowed internally.
    pub fn total_quantity(&self) -> f64 {
        self.positions.iter().map(|p| p.quantity).sum::<f64>().floor()
    }

    /// Exact (unfloored) summed quantity, used for capacity checks.
    pub fn total_exact(&self) -> f64 {
        self.positions.iter().map(|p| p.quantity).sum()
    }

    /// Add `qty` of a good, merging into an existing position or appending a
    /// new one. All-or-nothing: fails without mutation when the result would
    /// exceed `capacity`.
    pub fn add(&mut self, good: GoodId, qty: f64, capacity: f64) -> bool {
        if qty < 0.0 || self.total_exact() + qty > capacity {
            return false;
        }
        match self.positions.iter_mut().find(|p| p.good == good) {
            Some(pos) => pos.quantity += qty,
            None => self.positions.push(ItemPosition { good, quantity: qty }),
        }
        true
    }

    /// Deposit up to the remaining free capacity and return the discarded
    /// excess. This is the sol-end production path; everywhere else storage
    /// is all-or-nothing.
    pub fn deposit_clamped(&mut self, good: GoodId, qty: f64, capacity: f64) -> f64 {
        let free = (capacity - self.total_exact()).max(0.0);
        let deposited = qty.min(free);
        if deposited > 0.0 {
            match self.positions.iter_mut().find(|p| p.good == good) {
                Some(pos) => pos.quantity += deposited,
                None => self.positions.push(ItemPosition {
                    good,
                    quantity: deposited,
                }),
            }
        }
        qty - deposited
    }

    /// Decrement a position by `qty`. Fails without mutation when no position
    /// holds at least `qty`. A position that reaches exactly 0 stays in the
    /// list until removed explicitly.
    pub fn reduce(&mut self, good: GoodId, qty: f64) -> bool {
        if qty < 0.0 {
            return false;
        }
        match self.positions.iter_mut().find(|p| p.good == good) {
            Some(pos) if pos.quantity >= qty => {
                pos.quantity -= qty;
                true
            }
            _ => false,
        }
    }

    /// Delete a position unconditionally.
    pub fn remove(&mut self, good: GoodId) {
        self.positions.retain(|p| p.good != good);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRON: GoodId = GoodId(0);
    const ICE: GoodId = GoodId(1);

    #[test]
    fn test_capacity_law() {
        // Colony at base 100, level 1: floor(100 · 1.175²) = 138
        assert_eq!(capacity(100.0, COLONY_STORAGE_SCALE, 1), 138.0);
        // Rocket at base 50, level 1: floor(50 · 1.2²) = 72
        assert_eq!(capacity(50.0, ROCKET_STORAGE_SCALE, 1), 72.0);
    }

    #[test]
    fn test_add_merges_positions() {
        let mut inv = Inventory::new();
        assert!(inv.add(IRON, 10.0, 100.0));
        assert!(inv.add(IRON, 5.0, 100.0));
        assert_eq!(inv.positions().len(), 1);
        assert_eq!(inv.quantity_of(IRON), 15.0);
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let mut inv = Inventory::new();
        assert!(inv.add(IRON, 100.0, 138.0));
        let before = inv.clone();
        // 100 + 140 > 138: must fail and leave storage untouched
        assert!(!inv.add(ICE, 140.0, 138.0));
        assert_eq!(inv, before);
    }

    #[test]
    fn test_overfull_deposit_into_empty_fails() {
        let mut inv = Inventory::new();
        assert!(!inv.add(IRON, 140.0, 138.0));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_reduce_requires_full_quantity() {
        let mut inv = Inventory::new();
        inv.add(IRON, 10.0, 100.0);
        assert!(!inv.reduce(IRON, 10.5));
        assert_eq!(inv.quantity_of(IRON), 10.0);
        assert!(inv.reduce(IRON, 10.0));
        assert_eq!(inv.quantity_of(IRON), 0.0);
        // Zero-quantity position persists until removed
        assert_eq!(inv.positions().len(), 1);
        inv.remove(IRON);
        assert!(inv.is_empty());
    }

    #[test]
    fn test_reduce_unknown_good_fails() {
        let mut inv = Inventory::new();
        inv.add(IRON, 10.0, 100.0);
        assert!(!inv.reduce(ICE, 1.0));
    }

    #[test]
    fn test_total_quantity_floors() {
        let mut inv = Inventory::new();
        inv.add(IRON, 1.4, 100.0);
        inv.add(ICE, 1.4, 100.0);
        assert_eq!(inv.total_quantity(), 2.0);
        assert!((inv.total_exact() - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_deposit_clamped_reports_excess() {
        let mut inv = Inventory::new();
        inv.add(IRON, 130.0, 138.0);
        let lost = inv.deposit_clamped(ICE, 20.0, 138.0);
        assert!((lost - 12.0).abs() < 1e-9);
        assert!((inv.quantity_of(ICE) - 8.0).abs() < 1e-9);
        // Full: everything overflows
        let lost = inv.deposit_clamped(ICE, 5.0, 138.0);
        assert!((lost - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_invariant_under_random_ops() {
        let cap = 138.0;
        let mut inv = Inventory::new();
        let ops: [(GoodId, f64); 8] = [
            (IRON, 50.0),
            (ICE, 50.0),
            (IRON, 50.0),
            (ICE, -30.0),
            (IRON, 20.0),
            (ICE, 100.0),
            (IRON, -10.0),
            (ICE, 8.0),
        ];
        for (good, qty) in ops {
            if qty >= 0.0 {
                inv.add(good, qty, cap);
            } else {
                inv.reduce(good, -qty);
            }
            assert!(inv.total_quantity() <= cap, "capacity invariant violated");
        }
    }
}
