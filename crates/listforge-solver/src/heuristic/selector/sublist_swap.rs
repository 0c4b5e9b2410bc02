//! Sub-list swap move selector.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_core::domain::{ListVariable, PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use crate::heuristic::r#move::SubListSwapMove;

use super::lifecycle::SelectorLifecycle;
use super::random::WorkingRandom;
use super::selection_order::OrderedIter;
use super::sublist::SubListSelector;
use super::typed_move_selector::MoveSelector;

/// A move selector that swaps two sub-lists, optionally reversing both.
///
/// Exhaustively, overlapping pairs are skipped. Randomly, each left
/// sub-list gets one fresh right sub-list; overlapping draws are left to
/// [`SubListSwapMove::is_doable`].
pub struct SubListSwapMoveSelector<S, V, LS, RS> {
    left: LS,
    right: RS,
    variable: ListVariable<S, V>,
    select_reversing_move_too: bool,
    random: WorkingRandom,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V, LS, RS> SubListSwapMoveSelector<S, V, LS, RS> {
    pub fn new(
        left: LS,
        right: RS,
        variable: ListVariable<S, V>,
        select_reversing_move_too: bool,
        random: WorkingRandom,
    ) -> Self {
        Self {
            left,
            right,
            variable,
            select_reversing_move_too,
            random,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, LS: Debug, RS: Debug> Debug for SubListSwapMoveSelector<S, V, LS, RS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubListSwapMoveSelector")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("select_reversing_move_too", &self.select_reversing_move_too)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V, LS, RS> SelectorLifecycle<S> for SubListSwapMoveSelector<S, V, LS, RS>
where
    S: PlanningSolution,
    LS: SelectorLifecycle<S>,
    RS: SelectorLifecycle<S>,
{
    fn solving_started<D: ScoreDirector<S>>(
        &mut self,
        supply_manager: &mut SupplyManager,
        score_director: &D,
    ) -> Result<()> {
        self.left.solving_started(supply_manager, score_director)?;
        self.right.solving_started(supply_manager, score_director)
    }

    fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.left.phase_started(score_director)?;
        self.right.phase_started(score_director)
    }

    fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
        self.left.step_started(score_director);
        self.right.step_started(score_director);
    }

    fn phase_ended(&mut self) {
        self.left.phase_ended();
        self.right.phase_ended();
    }

    fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
        self.left.solving_ended(supply_manager);
        self.right.solving_ended(supply_manager);
    }
}

impl<S, V, LS, RS> MoveSelector<S, SubListSwapMove<S, V>> for SubListSwapMoveSelector<S, V, LS, RS>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    LS: SubListSelector<S>,
    RS: SubListSelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = SubListSwapMove<S, V>> + 'a {
        let variable = self.variable;
        let reversing_too = self.select_reversing_move_too;
        if self.left.is_never_ending() {
            let mut lefts = self.left.iter(score_director);
            OrderedIter::Random(std::iter::from_fn(move || {
                let left = lefts.next()?;
                let right = self.right.iter(score_director).next()?;
                let reversing = reversing_too && self.random.next_bool();
                Some(SubListSwapMove::new(left, right, reversing, variable))
            }))
        } else {
            OrderedIter::Original(self.left.iter(score_director).flat_map(move |left| {
                self.right
                    .iter(score_director)
                    .filter(move |right| !left.overlaps(right))
                    .flat_map(move |right| {
                        let forward = SubListSwapMove::new(left, right, false, variable);
                        let reversed = reversing_too
                            .then(|| SubListSwapMove::new(left, right, true, variable));
                        std::iter::once(forward).chain(reversed)
                    })
            }))
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let pairs = self.left.size(score_director) * self.right.size(score_director);
        if self.select_reversing_move_too {
            pairs * 2
        } else {
            pairs
        }
    }

    fn is_never_ending(&self) -> bool {
        self.left.is_never_ending() || self.right.is_never_ending()
    }
}
