//! Mimic selectors: one selector replays what another one just produced.
//!
//! Nearby selection needs to know "the thing actually used last". A
//! recording selector wraps a child and publishes every item it yields into
//! a shared [`MimicRecorder`]; replaying selectors read the published item
//! without advancing anything. The replayed value stays frozen until the
//! recording side advances again.
//!
//! - [`MimicRecordingElementSelector`] / [`MimicReplayingElementSelector`]
//! - [`MimicRecordingSubListSelector`] / [`MimicReplayingSubListSelector`]

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use listforge_core::domain::{ElementRef, PlanningSolution, SubList, SupplyManager};
use listforge_core::Result;
use listforge_scoring::ScoreDirector;

use super::element::ElementSelector;
use super::lifecycle::SelectorLifecycle;
use super::sublist::SubListSelector;

#[derive(Debug)]
struct CursorState<T> {
    recorded: Option<T>,
    exhausted: bool,
}

/// Shared cursor written by a recording selector and read by replaying ones.
pub struct MimicRecorder<T> {
    state: Arc<RwLock<CursorState<T>>>,
    id: &'static str,
}

impl<T> Clone for MimicRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            id: self.id,
        }
    }
}

impl<T: Copy + Debug> MimicRecorder<T> {
    pub fn new(id: &'static str) -> Self {
        Self {
            state: Arc::new(RwLock::new(CursorState {
                recorded: None,
                exhausted: false,
            })),
            id,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    fn record(&self, item: T) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.recorded = Some(item);
        state.exhausted = false;
    }

    fn record_exhausted(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .exhausted = true;
    }

    fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.recorded = None;
        state.exhausted = false;
    }

    /// Returns the item the recording side currently stands on.
    ///
    /// `None` once the recording side has run out.
    ///
    /// # Panics
    ///
    /// If nothing has been recorded since the recording side started a pass:
    /// replay must never run ahead of recording.
    pub fn current(&self) -> Option<T> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.exhausted {
            return None;
        }
        match state.recorded {
            Some(item) => Some(item),
            None => panic!(
                "mimic cursor {:?} replayed before its recording selector produced anything",
                self.id
            ),
        }
    }
}

impl<T: Debug> Debug for MimicRecorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MimicRecorder")
            .field("id", &self.id)
            .field("recorded", &state.recorded)
            .field("exhausted", &state.exhausted)
            .finish()
    }
}

/// Publishes each item of `inner` before handing it out.
struct RecordingIter<'a, I, T> {
    inner: I,
    recorder: &'a MimicRecorder<T>,
}

impl<I, T> Iterator for RecordingIter<'_, I, T>
where
    I: Iterator<Item = T>,
    T: Copy + Debug,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.inner.next() {
            Some(item) => {
                self.recorder.record(item);
                Some(item)
            }
            None => {
                self.recorder.record_exhausted();
                None
            }
        }
    }
}

macro_rules! forward_lifecycle {
    ($field:ident) => {
        fn solving_started<D: ScoreDirector<S>>(
            &mut self,
            supply_manager: &mut SupplyManager,
            score_director: &D,
        ) -> Result<()> {
            self.$field.solving_started(supply_manager, score_director)
        }

        fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
            self.$field.phase_started(score_director)
        }

        fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) {
            self.$field.step_started(score_director);
        }

        fn phase_ended(&mut self) {
            self.$field.phase_ended();
        }

        fn solving_ended(&mut self, supply_manager: &mut SupplyManager) {
            self.$field.solving_ended(supply_manager);
        }
    };
}

/// Element selector that records every element it yields.
pub struct MimicRecordingElementSelector<S, ES> {
    child: ES,
    recorder: MimicRecorder<ElementRef>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, ES> MimicRecordingElementSelector<S, ES> {
    pub fn new(child: ES, recorder: MimicRecorder<ElementRef>) -> Self {
        Self {
            child,
            recorder,
            _phantom: PhantomData,
        }
    }

    /// Returns the recorder for building replaying selectors.
    pub fn recorder(&self) -> MimicRecorder<ElementRef> {
        self.recorder.clone()
    }
}

impl<S, ES: Debug> Debug for MimicRecordingElementSelector<S, ES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimicRecordingElementSelector")
            .field("child", &self.child)
            .field("recorder_id", &self.recorder.id)
            .finish()
    }
}

impl<S: PlanningSolution, ES: SelectorLifecycle<S>> SelectorLifecycle<S>
    for MimicRecordingElementSelector<S, ES>
{
    forward_lifecycle!(child);
}

impl<S, ES> ElementSelector<S> for MimicRecordingElementSelector<S, ES>
where
    S: PlanningSolution,
    ES: ElementSelector<S>,
{
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        self.recorder.reset();
        RecordingIter {
            inner: self.child.iter(score_director),
            recorder: &self.recorder,
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.child.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
    }
}

#[derive(Debug)]
enum ReplaySource {
    Element(MimicRecorder<ElementRef>),
    SubListHead(MimicRecorder<SubList>),
}

/// Element selector yielding the element its recorder currently stands on.
///
/// Each pass yields at most one element.
#[derive(Debug)]
pub struct MimicReplayingElementSelector {
    source: ReplaySource,
}

impl MimicReplayingElementSelector {
    pub fn new(recorder: MimicRecorder<ElementRef>) -> Self {
        Self {
            source: ReplaySource::Element(recorder),
        }
    }

    /// Replays the first element of the sub-list `recorder` stands on.
    pub fn sub_list_head(recorder: MimicRecorder<SubList>) -> Self {
        Self {
            source: ReplaySource::SubListHead(recorder),
        }
    }

    /// The recorded element, read without advancing anything.
    pub fn current(&self) -> Option<ElementRef> {
        match &self.source {
            ReplaySource::Element(recorder) => recorder.current(),
            ReplaySource::SubListHead(recorder) => recorder.current().map(|sub_list| sub_list.first()),
        }
    }
}

impl<S: PlanningSolution> SelectorLifecycle<S> for MimicReplayingElementSelector {}

impl<S: PlanningSolution> ElementSelector<S> for MimicReplayingElementSelector {
    fn iter<'a, D: ScoreDirector<S>>(
        &'a self,
        _score_director: &'a D,
    ) -> impl Iterator<Item = ElementRef> + 'a {
        std::iter::once_with(|| self.current()).flatten()
    }

    fn size<D: ScoreDirector<S>>(&self, _score_director: &D) -> usize {
        1
    }
}

/// Sub-list selector that records every sub-list it yields.
pub struct MimicRecordingSubListSelector<S, SS> {
    child: SS,
    recorder: MimicRecorder<SubList>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, SS> MimicRecordingSubListSelector<S, SS> {
    pub fn new(child: SS, recorder: MimicRecorder<SubList>) -> Self {
        Self {
            child,
            recorder,
            _phantom: PhantomData,
        }
    }

    pub fn recorder(&self) -> MimicRecorder<SubList> {
        self.recorder.clone()
    }
}

impl<S, SS: Debug> Debug for MimicRecordingSubListSelector<S, SS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimicRecordingSubListSelector")
            .field("child", &self.child)
            .field("recorder_id", &self.recorder.id)
            .finish()
    }
}

impl<S: PlanningSolution, SS: SelectorLifecycle<S>> SelectorLifecycle<S>
    for MimicRecordingSubListSelector<S, SS>
{
    forward_lifecycle!(child);
}

impl<S, SS> SubListSelector<S> for MimicRecordingSubListSelector<S, SS>
where
    S: PlanningSolution,
    SS: SubListSelector<S>,
{
    fn iter<'a, D: ScoreDirector<S>>(&'a self, score_director: &'a D) -> impl Iterator<Item = SubList> + 'a {
        self.recorder.reset();
        RecordingIter {
            inner: self.child.iter(score_director),
            recorder: &self.recorder,
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.child.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.child.is_never_ending()
    }

    fn minimum_sub_list_size(&self) -> usize {
        self.child.minimum_sub_list_size()
    }

    fn maximum_sub_list_size(&self) -> usize {
        self.child.maximum_sub_list_size()
    }
}

/// Sub-list selector yielding the sub-list its recorder currently stands on.
#[derive(Debug)]
pub struct MimicReplayingSubListSelector {
    recorder: MimicRecorder<SubList>,
    minimum_sub_list_size: usize,
    maximum_sub_list_size: usize,
}

impl MimicReplayingSubListSelector {
    /// Creates a replaying selector; the bounds mirror the recording child's.
    pub fn new(
        recorder: MimicRecorder<SubList>,
        minimum_sub_list_size: usize,
        maximum_sub_list_size: usize,
    ) -> Self {
        Self {
            recorder,
            minimum_sub_list_size,
            maximum_sub_list_size,
        }
    }

    /// Creates a replaying selector for `recording`.
    pub fn replaying<S, SS>(recording: &MimicRecordingSubListSelector<S, SS>) -> Self
    where
        S: PlanningSolution,
        SS: SubListSelector<S>,
    {
        Self::new(
            recording.recorder(),
            recording.child.minimum_sub_list_size(),
            recording.child.maximum_sub_list_size(),
        )
    }

    pub fn current(&self) -> Option<SubList> {
        self.recorder.current()
    }
}

impl<S: PlanningSolution> SelectorLifecycle<S> for MimicReplayingSubListSelector {}

impl<S: PlanningSolution> SubListSelector<S> for MimicReplayingSubListSelector {
    fn iter<'a, D: ScoreDirector<S>>(&'a self, _score_director: &'a D) -> impl Iterator<Item = SubList> + 'a {
        std::iter::once_with(|| self.current()).flatten()
    }

    fn size<D: ScoreDirector<S>>(&self, _score_director: &D) -> usize {
        1
    }

    fn minimum_sub_list_size(&self) -> usize {
        self.minimum_sub_list_size
    }

    fn maximum_sub_list_size(&self) -> usize {
        self.maximum_sub_list_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::selector::element::FromListElementSelector;
    use crate::heuristic::selector::random::WorkingRandom;
    use crate::heuristic::selector::selection_order::SelectionOrder;
    use crate::heuristic::selector::sublist::FromSolutionSubListSelector;
    use listforge_test::{create_director, list_variable, plan, Plan};

    #[test]
    fn replay_follows_recording() {
        let director = create_director(plan(&[&[1, 2], &[3]]));
        let recording: MimicRecordingElementSelector<Plan, _> =
            MimicRecordingElementSelector::new(
                FromListElementSelector::original(list_variable()),
                MimicRecorder::new("origin"),
            );
        let replaying = MimicReplayingElementSelector::new(recording.recorder());

        let mut recorded = recording.iter(&director);
        let first = recorded.next().unwrap();
        assert_eq!(
            ElementSelector::<Plan>::iter(&replaying, &director).collect::<Vec<_>>(),
            vec![first]
        );
        // Frozen until the recording side moves.
        assert_eq!(replaying.current(), Some(first));
        assert_eq!(replaying.current(), Some(first));

        let second = recorded.next().unwrap();
        assert_eq!(replaying.current(), Some(second));
    }

    #[test]
    fn replay_ends_with_recording() {
        let director = create_director(plan(&[&[1]]));
        let recording: MimicRecordingElementSelector<Plan, _> =
            MimicRecordingElementSelector::new(
                FromListElementSelector::original(list_variable()),
                MimicRecorder::new("origin"),
            );
        let replaying = MimicReplayingElementSelector::new(recording.recorder());

        let mut recorded = recording.iter(&director);
        recorded.next();
        assert_eq!(recorded.next(), None);
        assert_eq!(replaying.current(), None);
    }

    #[test]
    #[should_panic(expected = "replayed before its recording selector")]
    fn replay_before_recording_panics() {
        let recorder: MimicRecorder<ElementRef> = MimicRecorder::new("origin");
        let replaying = MimicReplayingElementSelector::new(recorder);
        replaying.current();
    }

    #[test]
    fn sub_list_replay_mirrors_bounds_and_value() {
        let director = create_director(plan(&[&[1, 2, 3]]));
        let child = FromSolutionSubListSelector::new(
            list_variable(),
            2,
            3,
            SelectionOrder::Original,
            WorkingRandom::seeded(0),
        )
        .unwrap();
        let recording: MimicRecordingSubListSelector<Plan, _> =
            MimicRecordingSubListSelector::new(child, MimicRecorder::new("sub-list origin"));
        let replaying = MimicReplayingSubListSelector::replaying(&recording);

        assert_eq!(SubListSelector::<Plan>::minimum_sub_list_size(&replaying), 2);
        assert_eq!(SubListSelector::<Plan>::maximum_sub_list_size(&replaying), 3);

        let first = recording.iter(&director).next().unwrap();
        assert_eq!(first, SubList::new(0, 0, 2));
        assert_eq!(replaying.current(), Some(first));
    }

    #[test]
    fn element_replay_reads_sub_list_head() {
        let director = create_director(plan(&[&[1, 2, 3], &[4, 5]]));
        let child = FromSolutionSubListSelector::new(
            list_variable(),
            2,
            2,
            SelectionOrder::Original,
            WorkingRandom::seeded(0),
        )
        .unwrap();
        let recording: MimicRecordingSubListSelector<Plan, _> =
            MimicRecordingSubListSelector::new(child, MimicRecorder::new("sub-list origin"));
        let head = MimicReplayingElementSelector::sub_list_head(recording.recorder());

        let mut recorded = recording.iter(&director);
        let first = recorded.next().unwrap();
        assert_eq!(head.current(), Some(ElementRef::new(first.entity_index, first.from_index)));
        let second = recorded.next().unwrap();
        assert_eq!(head.current(), Some(ElementRef::new(second.entity_index, second.from_index)));
    }
}
