//! Pure simulation logic for Solhaul.
//!
//! This crate contains all game formulas and static data that are independent
//! of the engine and of any runtime. Functions take plain data and return
//! results, making them unit-testable and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`exploration`] | Colonization quotes: price, fuel, and time multipliers |
//! | [`goods`] | Good definitions and the read-only goods registry |
//! | [`inventory`] | Capacity-bounded item storage and capacity formulas |
//! | [`leveling`] | Level/upgrade-cost law shared by every upgradeable entity |
//! | [`location`] | Location types, modifiers, and the connection table |
//! | [`modules`] | Colony module variants (production / infrastructure) |
//! | [`production`] | Colony-level production multiplier and capacity |

pub mod exploration;
pub mod goods;
pub mod inventory;
pub mod leveling;
pub mod location;
pub mod modules;
pub mod production;
