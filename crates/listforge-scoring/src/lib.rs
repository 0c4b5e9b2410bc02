//! Score directors for ListForge.
//!
//! The score director owns the working solution during search and is the only
//! channel through which moves mutate it. Every mutation of a list variable is
//! bracketed by a before/after notification so incremental scoring backends
//! can retract and re-insert the affected contributions.
//!
//! - [`ScoreDirector`] - the contract consumed by moves and selectors
//! - [`SimpleScoreDirector`] - full recalculation on demand
//! - [`RecordingScoreDirector`] - wrapper collecting typed undo closures

pub mod director;

pub use director::{RecordingScoreDirector, ScoreDirector, SimpleScoreDirector};
