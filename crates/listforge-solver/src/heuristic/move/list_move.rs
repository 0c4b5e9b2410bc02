//! ListMoveImpl - closed union of every list move.
//!
//! Selectors that mix move kinds (for example a union of change and k-opt
//! selectors) yield this enum, so the search loop stays monomorphic.

use std::fmt::Debug;

use listforge_core::domain::PlanningSolution;
use listforge_scoring::ScoreDirector;

use super::{
    KOptListMove, ListAssignMove, ListChangeMove, ListRestoreMove, ListSwapMove,
    ListUnassignMove, Move, SubListChangeMove, SubListSwapMove, TwoOptMove,
};

/// Any list move.
pub enum ListMoveImpl<S, V> {
    Change(ListChangeMove<S, V>),
    Swap(ListSwapMove<S, V>),
    SubListChange(SubListChangeMove<S, V>),
    SubListSwap(SubListSwapMove<S, V>),
    Assign(ListAssignMove<S, V>),
    Unassign(ListUnassignMove<S, V>),
    TwoOpt(TwoOptMove<S, V>),
    KOpt(KOptListMove<S, V>),
    Restore(ListRestoreMove<S, V>),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            ListMoveImpl::Change($m) => $body,
            ListMoveImpl::Swap($m) => $body,
            ListMoveImpl::SubListChange($m) => $body,
            ListMoveImpl::SubListSwap($m) => $body,
            ListMoveImpl::Assign($m) => $body,
            ListMoveImpl::Unassign($m) => $body,
            ListMoveImpl::TwoOpt($m) => $body,
            ListMoveImpl::KOpt($m) => $body,
            ListMoveImpl::Restore($m) => $body,
        }
    };
}

impl<S, V: Clone> Clone for ListMoveImpl<S, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Change(m) => Self::Change(*m),
            Self::Swap(m) => Self::Swap(*m),
            Self::SubListChange(m) => Self::SubListChange(*m),
            Self::SubListSwap(m) => Self::SubListSwap(*m),
            Self::Assign(m) => Self::Assign(m.clone()),
            Self::Unassign(m) => Self::Unassign(m.clone()),
            Self::TwoOpt(m) => Self::TwoOpt(*m),
            Self::KOpt(m) => Self::KOpt(m.clone()),
            Self::Restore(m) => Self::Restore(m.clone()),
        }
    }
}

impl<S, V: Debug> Debug for ListMoveImpl<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        dispatch!(self, m => m.fmt(f))
    }
}

impl<S, V> Move<S> for ListMoveImpl<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    type Undo = Self;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        dispatch!(self, m => m.is_doable(score_director))
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        dispatch!(self, m => m.do_move(score_director))
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self::Undo {
        dispatch!(self, m => m.create_undo_move(score_director).into())
    }

    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Self {
        dispatch!(self, m => m.rebase(destination).into())
    }

    fn descriptor_index(&self) -> usize {
        dispatch!(self, m => m.descriptor_index())
    }

    fn entity_indices(&self) -> &[usize] {
        dispatch!(self, m => m.entity_indices())
    }

    fn variable_name(&self) -> &str {
        dispatch!(self, m => m.variable_name())
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl<S, V> From<$ty<S, V>> for ListMoveImpl<S, V> {
                fn from(m: $ty<S, V>) -> Self {
                    Self::$variant(m)
                }
            }
        )*
    };
}

impl_from!(
    Change(ListChangeMove),
    Swap(ListSwapMove),
    SubListChange(SubListChangeMove),
    SubListSwap(SubListSwapMove),
    Assign(ListAssignMove),
    Unassign(ListUnassignMove),
    TwoOpt(TwoOptMove),
    KOpt(KOptListMove),
    Restore(ListRestoreMove),
);
