//! A score director that records list notifications.

use listforge_core::domain::PlanningSolution;
use listforge_scoring::ScoreDirector;

/// One notification received by [`TrackingScoreDirector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    BeforeChanged { entity: usize, from: usize, to: usize },
    AfterChanged { entity: usize, from: usize, to: usize },
    BeforeAssigned { entity: usize, index: usize },
    AfterAssigned { entity: usize, index: usize },
    BeforeUnassigned { entity: usize, index: usize },
    AfterUnassigned { entity: usize, index: usize },
}

/// Holds a working solution and records every list notification it receives.
///
/// Scores are computed by the supplied calculator; undo closures are kept so
/// tests can replay them with [`TrackingScoreDirector::undo_all`].
pub struct TrackingScoreDirector<S: PlanningSolution> {
    solution: S,
    calculator: fn(&S) -> S::Score,
    events: Vec<ListEvent>,
    undo_stack: Vec<Box<dyn FnOnce(&mut S) + Send>>,
}

impl<S: PlanningSolution> TrackingScoreDirector<S> {
    pub fn new(solution: S, calculator: fn(&S) -> S::Score) -> Self {
        Self {
            solution,
            calculator,
            events: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    pub fn events(&self) -> &[ListEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ListEvent> {
        std::mem::take(&mut self.events)
    }

    /// Runs every registered undo closure in reverse order.
    pub fn undo_all(&mut self) {
        while let Some(undo) = self.undo_stack.pop() {
            undo(&mut self.solution);
        }
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}

impl<S: PlanningSolution> ScoreDirector<S> for TrackingScoreDirector<S> {
    fn working_solution(&self) -> &S {
        &self.solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        &mut self.solution
    }

    fn calculate_score(&mut self) -> S::Score {
        let score = (self.calculator)(&self.solution);
        self.solution.set_score(Some(score));
        score
    }

    fn clone_working_solution(&self) -> S {
        self.solution.clone()
    }

    fn before_variable_changed(&mut self, _: usize, _: usize, _: &str) {}

    fn after_variable_changed(&mut self, _: usize, _: usize, _: &str) {}

    fn before_list_variable_changed(
        &mut self,
        _descriptor_index: usize,
        entity: usize,
        _variable_name: &str,
        from: usize,
        to: usize,
    ) {
        self.events.push(ListEvent::BeforeChanged { entity, from, to });
    }

    fn after_list_variable_changed(
        &mut self,
        _descriptor_index: usize,
        entity: usize,
        _variable_name: &str,
        from: usize,
        to: usize,
    ) {
        self.events.push(ListEvent::AfterChanged { entity, from, to });
    }

    fn before_list_element_assigned(&mut self, _: usize, entity: usize, _: &str, index: usize) {
        self.events.push(ListEvent::BeforeAssigned { entity, index });
    }

    fn after_list_element_assigned(&mut self, _: usize, entity: usize, _: &str, index: usize) {
        self.events.push(ListEvent::AfterAssigned { entity, index });
    }

    fn before_list_element_unassigned(&mut self, _: usize, entity: usize, _: &str, index: usize) {
        self.events.push(ListEvent::BeforeUnassigned { entity, index });
    }

    fn after_list_element_unassigned(&mut self, _: usize, entity: usize, _: &str, index: usize) {
        self.events.push(ListEvent::AfterUnassigned { entity, index });
    }

    fn register_undo(&mut self, undo: Box<dyn FnOnce(&mut S) + Send>) {
        self.undo_stack.push(undo);
    }
}
