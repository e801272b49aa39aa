//! Game-rule violations.
//!
//! Every denied action is an expected game state, not a defect, so actions
//! return `Result<_, Denied>` instead of panicking or throwing. The `Display`
//! impl is the user-facing message handed to the UI collaborator.

use solhaul_logic::location::LocationKind;

/// Why an action was refused. State is always left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Denied {
    /// Treasury deduction rejected.
    InsufficientFunds { needed: f64, available: f64 },
    /// Fuel stock check failed before any deduction.
    InsufficientFuel { needed: f64, available: f64 },
    /// A goods quantity check failed before any transfer.
    InsufficientCargo,
    /// Storage add rejected in full.
    CapacityExceeded,
    /// The colony has no free module slot at its level.
    ModuleSlotsFull { allowed: usize },
    /// No connection between two location types.
    InvalidRoute { from: LocationKind, to: LocationKind },
    /// The state machine does not permit this transition.
    InvalidTransition(&'static str),
    /// Something the action depends on is missing.
    MissingPrerequisite(&'static str),
    /// The UI referenced an id that no longer exists.
    UnknownEntity(&'static str),
}

impl std::fmt::Display for Denied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denied::InsufficientFunds { needed, available } => {
                write!(
                    f,
                    "Not enough credits: need {:.0}, have {:.0}",
                    needed, available
                )
            }
            Denied::InsufficientFuel { needed, available } => {
                write!(f, "Not enough fuel: need {:.0}, have {:.0}", needed, available)
            }
            Denied::InsufficientCargo => write!(f, "Not enough goods in storage"),
            Denied::CapacityExceeded => write!(f, "Storage capacity exceeded"),
            Denied::ModuleSlotsFull { allowed } => {
                write!(f, "All {} module slots are in use", allowed)
            }
            Denied::InvalidRoute { from, to } => {
                write!(f, "No route between {} and {}", from.name(), to.name())
            }
            Denied::InvalidTransition(reason) => write!(f, "{}", reason),
            Denied::MissingPrerequisite(reason) => write!(f, "{}", reason),
            Denied::UnknownEntity(kind) => write!(f, "Unknown {}", kind),
        }
    }
}
