//! Shared test fixtures for ListForge crates.
//!
//! - [`routing`] - a small vehicle routing model with one list variable
//! - [`tracking`] - a score director that records every list notification
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! listforge-test = { workspace = true }
//! ```
//!
//! ```
//! use listforge_scoring::ScoreDirector;
//! use listforge_test::{create_director, plan, routes};
//!
//! let director = create_director(plan(&[&[1, 2], &[]]));
//! assert_eq!(routes(director.working_solution()), vec![vec![1, 2], vec![]]);
//! ```

pub mod routing;
pub mod tracking;

pub use routing::{
    create_director, list_variable, plan, route_cost, routes, stop_distance, Plan, PlanDirector,
    Vehicle,
};
pub use tracking::{ListEvent, TrackingScoreDirector};
