// Score director trait definition.

use listforge_core::domain::PlanningSolution;

// The score director manages solution state and score calculation.
//
// It is responsible for:
// - Maintaining the working solution
// - Calculating scores
// - Receiving before/after notifications around every list mutation
// - Collecting undo closures when wrapped by a recording director
//
// The list notifications default to the entity-level hooks, so a director
// that only tracks dirty entities needs to implement just those two.
pub trait ScoreDirector<S: PlanningSolution>: Send {
    // Returns a reference to the working solution.
    fn working_solution(&self) -> &S;

    // Returns a mutable reference to the working solution.
    fn working_solution_mut(&mut self) -> &mut S;

    // Calculates and returns the current score.
    fn calculate_score(&mut self) -> S::Score;

    // Clones the working solution.
    fn clone_working_solution(&self) -> S;

    // Called before an entity's planning variable is changed.
    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    // Called after an entity's planning variable is changed.
    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    // Called before elements in `[from_index, to_index)` of an entity's list
    // are moved, reordered, or overwritten in bulk.
    fn before_list_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        _from_index: usize,
        _to_index: usize,
    ) {
        self.before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    // Called after elements in `[from_index, to_index)` of an entity's list
    // were moved, reordered, or overwritten in bulk.
    fn after_list_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        _from_index: usize,
        _to_index: usize,
    ) {
        self.after_variable_changed(descriptor_index, entity_index, variable_name);
    }

    // Called before a value is added to an entity's list at `index`.
    fn before_list_element_assigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        _index: usize,
    ) {
        self.before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    // Called after a value was added to an entity's list at `index`.
    fn after_list_element_assigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        _index: usize,
    ) {
        self.after_variable_changed(descriptor_index, entity_index, variable_name);
    }

    // Called before the value at `index` is removed from an entity's list.
    fn before_list_element_unassigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        _index: usize,
    ) {
        self.before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    // Called after the value at `index` was removed from an entity's list.
    fn after_list_element_unassigned(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
        _index: usize,
    ) {
        self.after_variable_changed(descriptor_index, entity_index, variable_name);
    }

    // Resets the score director state.
    fn reset(&mut self) {}

    // Registers a typed undo closure.
    //
    // Called by moves after applying changes to enable automatic undo.
    // The closure will be called in reverse order during `undo_changes()`.
    //
    // Default implementation does nothing (for non-recording directors).
    fn register_undo(&mut self, _undo: Box<dyn FnOnce(&mut S) + Send>) {}
}
