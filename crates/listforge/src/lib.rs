//! ListForge - list-variable local search moves in Rust
//!
//! Moves and selectors for planning problems whose decision variable is an
//! ordered list per entity, such as vehicle routes.
//!
//! # Example
//!
//! ```rust
//! use listforge::prelude::*;
//!
//! let config = ListForgeConfig::from_toml_str(
//!     r#"
//!     random_seed = 7
//!
//!     [[move_selectors]]
//!     type = "k_opt_list_move_selector"
//!     minimum_k = 2
//!     maximum_k = 4
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.random_seed, Some(7));
//! assert!(config.validate().is_ok());
//! ```

pub mod logging;

// Configuration
pub use listforge_config::{ConfigError, ListForgeConfig, MoveSelectorConfig};

// Core types
pub use listforge_core::{
    ElementPosition, ElementRef, ListForgeError, ListVariable, PlanningSolution, Result, Score,
    SimpleScore, SubList, SupplyManager,
};

// Score directors
pub use listforge_scoring::{RecordingScoreDirector, ScoreDirector, SimpleScoreDirector};

// Move generation
pub use listforge_solver::heuristic::selector::nearby::{Destination, FnDistanceMeter};
pub use listforge_solver::{
    ListMoveImpl, ListMoveSelectorBuilder, ListMoveSelectorImpl, ListDistanceMeter, Move,
    MoveSelector, SelectorLifecycle, WorkingRandom,
};

/// Everything needed to build and drive list move selectors.
pub mod prelude {
    pub use crate::{
        Destination, ElementRef, FnDistanceMeter, ListDistanceMeter, ListForgeConfig,
        ListMoveImpl, ListMoveSelectorBuilder, ListVariable, Move, MoveSelector,
        MoveSelectorConfig, PlanningSolution, ScoreDirector, SelectorLifecycle, SubList,
        SupplyManager,
    };
}
