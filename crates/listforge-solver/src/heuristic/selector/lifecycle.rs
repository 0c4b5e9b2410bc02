//! Selector lifecycle hooks.
//!
//! A selector is driven through the same lifecycle as the search that owns
//! it: solving started, then per phase, then per step. Selectors that hold
//! caches or shared supplies use these hooks to build and release them;
//! composite selectors forward every hook to their children.

use listforge_core::domain::{PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

/// Lifecycle hooks shared by all selectors.
///
/// Every hook defaults to doing nothing.
pub trait SelectorLifecycle<S: PlanningSolution> {
    /// Called once before the first phase. Shared supplies are acquired here.
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        _supply_manager: &mut SupplyManager,
        _score_director: &D,
    ) -> Result<()> {
        Ok(())
    }

    /// Called at the start of every phase. Lazily memoized supplies are read here.
    fn phase_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) -> Result<()> {
        Ok(())
    }

    /// Called at the start of every step. Step caches are rebuilt here.
    fn step_started<D: ScoreDirector<S>>(&mut self, _score_director: &D) {}

    fn phase_ended(&mut self) {}

    /// Called once after the last phase. Shared supplies are released here.
    fn solving_ended(&mut self, _supply_manager: &mut SupplyManager) {}
}
