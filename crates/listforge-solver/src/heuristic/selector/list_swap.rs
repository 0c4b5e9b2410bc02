//! List swap move selector.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_core::domain::{ListVariable, PlanningSolution, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use crate::heuristic::r#move::ListSwapMove;

use super::element::ElementSelector;
use super::lifecycle::SelectorLifecycle;
use super::selection_order::OrderedIter;
use super::typed_move_selector::MoveSelector;

/// A move selector that swaps two elements.
///
/// Finite left selectors are combined with every right element except the
/// identical slot. Never-ending left selectors get one fresh right element
/// per draw.
pub struct ListSwapMoveSelector<S, V, LS, RS> {
    left: LS,
    right: RS,
    variable: ListVariable<S, V>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V, LS, RS> ListSwapMoveSelector<S, V, LS, RS> {
    pub fn new(left: LS, right: RS, variable: ListVariable<S, V>) -> Self {
        Self {
            left,
            right,
            variable,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, LS: Debug, RS: Debug> Debug for ListSwapMoveSelector<S, V, LS, RS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSwapMoveSelector")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S, V, LS, RS> SelectorLifecycle<S> for ListSwapMoveSelector<S, V, LS, RS>
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

impl<S, V, LS, RS> MoveSelector<S, ListSwapMove<S, V>> for ListSwapMoveSelector<S, V, LS, RS>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    LS: ElementSelector<S>,
    RS: ElementSelector<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ListSwapMove<S, V>> + 'a {
        let variable = self.variable;
        if self.left.is_never_ending() {
            let mut lefts = self.left.iter(score_director);
            OrderedIter::Random(std::iter::from_fn(move || {
                let left = lefts.next()?;
                let right = self.right.iter(score_director).next()?;
                Some(ListSwapMove::new(left, right, variable))
            }))
        } else {
            OrderedIter::Original(self.left.iter(score_director).flat_map(move |left| {
                self.right
                    .iter(score_director)
                    .filter(move |right| *right != left)
                    .map(move |right| ListSwapMove::new(left, right, variable))
            }))
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.left.size(score_director) * self.right.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.left.is_never_ending() || self.right.is_never_ending()
    }
}
