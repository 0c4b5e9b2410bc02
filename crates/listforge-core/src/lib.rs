//! ListForge Core - Core types and traits for list-variable local search
//!
//! This crate provides the fundamental abstractions shared by every ListForge crate:
//! - Score types for representing solution quality
//! - Element and sub-list references into list variables
//! - The list-variable accessor bundle used as the position oracle
//! - The supply manager that memoizes expensive derived data

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{
    ElementPosition, ElementRef, ListVariable, MemoizingSupply, PlanningSolution, SubList, Supply,
    SupplyDemand, SupplyManager,
};
pub use error::{ListForgeError, Result};
pub use score::{Score, SimpleScore};
