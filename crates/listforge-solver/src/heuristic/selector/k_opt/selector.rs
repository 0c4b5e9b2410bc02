//! K-opt move selector for list variables.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use listforge_config::KOptMoveSelectorConfig;
use listforge_core::domain::{ListVariable, PlanningSolution};
use listforge_core::{ListForgeError, Result};
use listforge_scoring::ScoreDirector;
use tracing::trace;

use crate::heuristic::r#move::{KOptListMove, ListMoveImpl, TwoOptMove};

use super::super::lifecycle::SelectorLifecycle;
use super::super::random::WorkingRandom;
use super::super::typed_move_selector::MoveSelector;
use super::descriptor::Ring;
use super::generator::KOptGenerator;

/// A never-ending selector of random k-opt moves.
///
/// Every draw picks `k` uniformly in `[minimum_k, maximum_k]` and an entity
/// long enough for it (see `pick_entity`), lowering `k` until one exists.
/// `k = 2` yields a [`TwoOptMove`]; larger `k` yields a [`KOptListMove`],
/// which is empty (never doable) when no feasible exchange was found. The
/// iterator never ends, even without any entity.
pub struct KOptListMoveSelector<S, V> {
    variable: ListVariable<S, V>,
    minimum_k: usize,
    maximum_k: usize,
    random: WorkingRandom,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, V> KOptListMoveSelector<S, V> {
    /// Creates a k-opt selector.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `minimum_k < 2` or
    /// `minimum_k > maximum_k`.
    pub fn new(
        variable: ListVariable<S, V>,
        minimum_k: usize,
        maximum_k: usize,
        random: WorkingRandom,
    ) -> Result<Self> {
        if minimum_k < 2 {
            return Err(ListForgeError::config(format!(
                "minimum_k ({minimum_k}) must be at least 2"
            )));
        }
        if minimum_k > maximum_k {
            return Err(ListForgeError::config(format!(
                "minimum_k ({minimum_k}) must not exceed maximum_k ({maximum_k})"
            )));
        }
        Ok(Self {
            variable,
            minimum_k,
            maximum_k,
            random,
            _phantom: PhantomData,
        })
    }

    pub fn from_config(
        config: &KOptMoveSelectorConfig,
        variable: ListVariable<S, V>,
        random: WorkingRandom,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|err| ListForgeError::config(err.to_string()))?;
        Self::new(variable, config.minimum_k, config.maximum_k, random)
    }

    pub fn minimum_k(&self) -> usize {
        self.minimum_k
    }

    pub fn maximum_k(&self) -> usize {
        self.maximum_k
    }

    /// Picks an entity for a `k`-opt draw and the `k` actually used.
    ///
    /// For `k >= 3` lists of at least `2k` elements come first, since shorter
    /// rings rarely admit `k` pairwise disjoint edges. Otherwise any list
    /// holding `k` elements qualifies, lowering `k` until one exists. Returns
    /// `None` below 2.
    pub(super) fn pick_entity(&self, solution: &S, mut k: usize) -> Option<(usize, usize)> {
        let entity_count = self.variable.entity_count(solution);
        let eligible = |minimum_len: usize| -> Vec<usize> {
            (0..entity_count)
                .filter(|&entity| self.variable.list_size(solution, entity) >= minimum_len)
                .collect()
        };
        if k >= 3 {
            let roomy = eligible(2 * k);
            if !roomy.is_empty() {
                return Some((roomy[self.random.next_index(roomy.len())], k));
            }
        }
        while k >= 2 {
            let candidates = eligible(k);
            if !candidates.is_empty() {
                return Some((candidates[self.random.next_index(candidates.len())], k));
            }
            k -= 1;
        }
        None
    }

    fn next_move(&self, solution: &S) -> ListMoveImpl<S, V> {
        let k = self.random.next_in_inclusive(self.minimum_k, self.maximum_k);
        let Some((entity, k)) = self.pick_entity(solution, k) else {
            trace!(k, outcome = "empty", "No list long enough for k-opt");
            return ListMoveImpl::KOpt(KOptListMove::empty(self.variable));
        };
        let len = self.variable.list_size(solution, entity);

        if k == 2 {
            let first = self.random.next_index(len);
            let mut second = self.random.next_index(len);
            while second == first {
                second = self.random.next_index(len);
            }
            trace!(k, entity, outcome = "two_opt", "K-opt draw");
            return ListMoveImpl::TwoOpt(TwoOptMove::new(entity, len, first, second, self.variable));
        }

        let outcome = KOptGenerator::new(Ring::new(len), &self.random, self.maximum_k).pick(k);
        trace!(k, entity, outcome = outcome.label(), "K-opt draw");
        let kopt = match outcome.into_descriptor() {
            Some(descriptor) => descriptor.to_list_move(entity, self.variable),
            None => KOptListMove::empty(self.variable),
        };
        ListMoveImpl::KOpt(kopt)
    }
}

impl<S, V> Debug for KOptListMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KOptListMoveSelector")
            .field("minimum_k", &self.minimum_k)
            .field("maximum_k", &self.maximum_k)
            .field("variable_name", &self.variable.variable_name())
            .finish()
    }
}

impl<S: PlanningSolution, V> SelectorLifecycle<S> for KOptListMoveSelector<S, V> {}

impl<S, V> MoveSelector<S, ListMoveImpl<S, V>> for KOptListMoveSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ListMoveImpl<S, V>> + 'a {
        std::iter::repeat_with(move || self.next_move(score_director.working_solution()))
    }

    /// Sum over entities of the ways to choose `k` removed edges, for every
    /// `k` in range.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        (0..self.variable.entity_count(solution))
            .map(|entity| {
                let len = self.variable.list_size(solution, entity);
                (self.minimum_k..=self.maximum_k)
                    .map(|k| binomial(len, k))
                    .fold(0usize, usize::saturating_add)
            })
            .fold(0usize, usize::saturating_add)
    }

    fn is_never_ending(&self) -> bool {
        true
    }
}

/// Binomial coefficient C(n, k), saturating at `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result.saturating_mul((n - i) as u128) / (i as u128 + 1);
        if result >= usize::MAX as u128 {
            return usize::MAX;
        }
    }
    result as usize
}
