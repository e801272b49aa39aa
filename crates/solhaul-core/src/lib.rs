//! Solhaul Core - Idle Space-Freight Simulation Engine
//!
//! The engine drives a company that produces goods at colonies, ships them
//! between locations with rockets, and reinvests proceeds into leveled
//! upgrades. State lives in explicit aggregates owned by a single
//! [`session::GameSession`]; an external scheduler polls
//! [`session::GameSession::tick`] with the elapsed wall-clock delta, and the
//! UI collaborator invokes the synchronous action surface in [`actions`].
//!
//! # Example
//!
//! ```rust,no_run
//! use solhaul_core::prelude::*;
//! use solhaul_logic::goods::GoodsRegistry;
//!
//! let registry = GoodsRegistry::standard();
//! let mut session = GameSession::new_game(&registry);
//!
//! loop {
//!     let changed = session.tick(1.0 / 60.0, &registry);
//!     if changed {
//!         // re-render
//!     }
//! }
//! ```

pub mod actions;
pub mod colony;
pub mod company;
pub mod config;
pub mod events;
pub mod persistence;
pub mod rocket;
pub mod rules;
pub mod session;
pub mod trade;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::{GameConfig, OverflowPolicy};
    pub use crate::events::GameEvent;
    pub use crate::rules::Denied;
    pub use crate::session::GameSession;
}
