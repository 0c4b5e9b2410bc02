//! Nearby selection for list variables.
//!
//! Nearby selection biases destinations toward candidates close to an
//! origin, which matters for routing: relocating a visit next to a nearby
//! visit is far more likely to improve a tour than a random relocation.
//!
//! # Architecture
//!
//! - [`ListDistanceMeter`]: user-supplied metric, also part of the cache key
//! - [`NearbyDistanceMatrix`]: per-origin ranking, built once per demand
//! - [`NearbyMatrixDemand`]: supply-manager key; equal demands share a matrix
//! - [`NearbyRandom`]: rank distributions favoring near candidates
//! - [`NearbyDestinationSelector`] / [`NearbySubListSelector`]: selectors
//!   driven by a mimic-replayed origin

mod destination;
mod distribution;
mod matrix;
mod meter;
mod sublist;

#[cfg(test)]
mod tests;

pub use destination::NearbyDestinationSelector;
pub use distribution::NearbyRandom;
pub use matrix::{check_matrix_capacity, NearbyDistanceMatrix, NearbyMatrixDemand};
pub use meter::{Destination, FnDistanceMeter, ListDistanceMeter};
pub use sublist::NearbySubListSelector;
