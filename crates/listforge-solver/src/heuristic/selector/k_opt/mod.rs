//! K-opt move generation for list variables.
//!
//! A k-opt move removes `k` edges of one list, read as a closed tour, and
//! reconnects the pieces into a single tour again. Moves are built the
//! Lin-Kernighan way:
//!
//! 1. Pick `t1` and a neighbour `t2`, removing edge `(t1, t2)`.
//! 2. For each further level pick `t3` (not adjacent to the previous node)
//!    and a neighbour `t4`, adding `(t2, t3)` and removing `(t3, t4)`.
//! 3. Close with `(t2k, t1)` and test whether one cycle remains.
//! 4. If the exchange splits into a few cycles, bridge the shortest cycle
//!    into the rest with extra edge pairs.
//!
//! The accepted exchange is turned into list reversals by sorting its
//! signed permutation of tour pieces, so applying it is a handful of
//! [`flip_sublist`](crate::heuristic::r#move::flip_sublist) calls.
//!
//! # Example
//!
//! ```
//! use listforge_solver::heuristic::selector::k_opt::{KOptDescriptor, Ring};
//!
//! // Remove (1,2), (5,4), (7,6) from the tour 0..8.
//! let descriptor = KOptDescriptor::sequential(Ring::new(8), &[0, 1, 2, 5, 4, 7, 6]);
//! assert!(descriptor.is_feasible());
//!
//! let (flips, shift) = descriptor.reversals().unwrap();
//! let mut tour: Vec<usize> = (0..8).collect();
//! for flip in &flips {
//!     listforge_solver::heuristic::r#move::flip_sublist(&mut tour, *flip);
//! }
//! tour.rotate_left(shift);
//! assert_eq!(tour, vec![0, 1, 6, 5, 2, 3, 4, 7]);
//! ```

mod descriptor;
mod generator;
mod selector;
#[cfg(test)]
mod tests;

pub use descriptor::{KOptCycleInfo, KOptDescriptor, Ring, Slots};
pub use selector::{binomial, KOptListMoveSelector};
