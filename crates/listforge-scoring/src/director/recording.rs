// Recording score director for automatic undo tracking.
//
// The `RecordingScoreDirector` wraps an existing score director and stores
// typed undo closures registered by moves:
//
// ```text
// let mut recording = RecordingScoreDirector::new(&mut inner_sd);
// move.do_move(&mut recording);  // Move registers typed undo closure
// let score = recording.calculate_score();
// recording.undo_changes();  // Calls undo closures in reverse order
// ```

use listforge_core::domain::PlanningSolution;

use super::ScoreDirector;

// A score director wrapper that stores typed undo closures.
//
// Every notification is forwarded to the inner director unchanged. Entities
// touched by an `after_*` notification are remembered so `undo_changes` can
// bracket the restore with entity-level notifications.
//
// # Example
//
// ```
// use listforge_core::{PlanningSolution, SimpleScore};
// use listforge_scoring::{RecordingScoreDirector, ScoreDirector, SimpleScoreDirector};
//
// #[derive(Clone)]
// struct Route { stops: Vec<u32>, score: Option<SimpleScore> }
//
// impl PlanningSolution for Route {
//     type Score = SimpleScore;
//     fn score(&self) -> Option<Self::Score> { self.score }
//     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
// }
//
// let mut sd = SimpleScoreDirector::new(
//     Route { stops: vec![1, 2, 3], score: None },
//     |r: &Route| SimpleScore::of(-(r.stops.len() as i64)),
// );
//
// let mut recording = RecordingScoreDirector::new(&mut sd);
// let removed = recording.working_solution_mut().stops.remove(0);
// recording.register_undo(Box::new(move |r: &mut Route| r.stops.insert(0, removed)));
//
// assert_eq!(recording.working_solution().stops, vec![2, 3]);
// recording.undo_changes();
// assert_eq!(recording.working_solution().stops, vec![1, 2, 3]);
// ```
pub struct RecordingScoreDirector<'a, S: PlanningSolution> {
    inner: &'a mut dyn ScoreDirector<S>,
    // Typed undo closures registered by moves.
    undo_stack: Vec<Box<dyn FnOnce(&mut S) + Send>>,
    // (descriptor_index, entity_index, variable_name) touched since the last reset.
    modified_entities: Vec<(usize, usize, String)>,
}

impl<'a, S: PlanningSolution> RecordingScoreDirector<'a, S> {
    // Creates a new recording score director wrapping the inner director.
    pub fn new(inner: &'a mut dyn ScoreDirector<S>) -> Self {
        Self {
            inner,
            undo_stack: Vec::with_capacity(16),
            modified_entities: Vec::with_capacity(8),
        }
    }

    // Undoes all recorded changes in reverse order.
    //
    // 1. Retract current (post-move) contributions from each modified entity
    // 2. Run undo closures to restore list contents
    // 3. Insert restored contributions
    pub fn undo_changes(&mut self) {
        for (descriptor_index, entity_index, variable_name) in &self.modified_entities {
            self.inner
                .before_variable_changed(*descriptor_index, *entity_index, variable_name);
        }

        while let Some(undo) = self.undo_stack.pop() {
            undo(self.inner.working_solution_mut());
        }

        for (descriptor_index, entity_index, variable_name) in self.modified_entities.drain(..) {
            self.inner
                .after_variable_changed(descriptor_index, entity_index, &variable_name);
        }
    }

    // Resets the recording state for reuse.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.modified_entities.clear();
    }

    // Returns the number of recorded undo closures.
    pub fn change_count(&self) -> usize {
        self.undo_stack.len()
    }

    // Returns true if there are no recorded changes.
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    fn track(&mut self, descriptor_index: usize, entity_index: usize, variable_name: &str) {
        let known = self.modified_entities.iter().any(|(d, e, v)| {
            *d == descriptor_index && *e == entity_index && v == variable_name
        });
        if !known {
            self.modified_entities
                .push((descriptor_index, entity_index, variable_name.to_string()));
        }
    }
}

impl<S: PlanningSolution> ScoreDirector<S> for RecordingScoreDirector<'_, S> {
    fn working_solution(&self) -> &S {
        self.inner.working_solution()
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.inner.working_solution_mut()
    }

    fn calculate_score(&mut self) -> S::Score {
        self.inner.calculate_score()
    }

    fn clone_working_solution(&self) -> S {
        self.inner.clone_working_solution()
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.inner
            .before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.inner
            .after_variable_changed(descriptor_index, entity_index, variable_name);
        self.track(descriptor_index, entity_index, variable_name);
    }

    fn before_list_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        from_index: usize,
        to_index: usize,
    ) {
        self.inner.before_list_variable_changed(
            descriptor_index,
            entity_index,
            variable_name,
            from_index,
            to_index,
        );
    }

    fn after_list_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        from_index: usize,
        to_index: usize,
    ) {
        self.inner.after_list_variable_changed(
            descriptor_index,
            entity_index,
            variable_name,
            from_index,
            to_index,
        );
        self.track(descriptor_index, entity_index, variable_name);
    }

    fn before_list_element_assigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        index: usize,
    ) {
        self.inner
            .before_list_element_assigned(descriptor_index, entity_index, variable_name, index);
    }

    fn after_list_element_assigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        index: usize,
    ) {
        self.inner
            .after_list_element_assigned(descriptor_index, entity_index, variable_name, index);
        self.track(descriptor_index, entity_index, variable_name);
    }

    fn before_list_element_unassigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        index: usize,
    ) {
        self.inner
            .before_list_element_unassigned(descriptor_index, entity_index, variable_name, index);
    }

    fn after_list_element_unassigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        index: usize,
    ) {
        self.inner
            .after_list_element_unassigned(descriptor_index, entity_index, variable_name, index);
        self.track(descriptor_index, entity_index, variable_name);
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.undo_stack.clear();
        self.modified_entities.clear();
    }

    fn register_undo(&mut self, undo: Box<dyn FnOnce(&mut S) + Send>) {
        self.undo_stack.push(undo);
    }
}
