//! Core domain traits

use crate::score::Score;

/// Marker trait for planning solutions.
///
/// A planning solution holds the planning entities (each owning a list
/// variable) together with the problem facts and the current score.
///
/// # Example
///
/// ```
/// use listforge_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct Plan {
///     routes: Vec<Vec<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for Plan {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Planning solutions must be `Send + Sync` so moves holding accessors can be
/// shipped between threads by the surrounding search loop.
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the current score of this solution, if calculated.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this solution.
    fn set_score(&mut self, score: Option<Self::Score>);
}
