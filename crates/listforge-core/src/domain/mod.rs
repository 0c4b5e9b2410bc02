//! Domain model traits and value types
//!
//! - [`PlanningSolution`] - the working state searched by the solver
//! - [`ElementRef`] / [`SubList`] - positional references into list variables
//! - [`ListVariable`] - typed accessor bundle acting as the position oracle
//! - [`SupplyManager`] - demand-keyed cache for derived data

mod element;
mod list_variable;
pub mod supply;
mod traits;

pub use element::{ElementPosition, ElementRef, SubList};
pub use list_variable::ListVariable;
pub use supply::{MemoizingSupply, Supply, SupplyDemand, SupplyManager};
pub use traits::PlanningSolution;
