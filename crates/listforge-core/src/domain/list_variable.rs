//! Typed accessor bundle for a list variable.
//!
//! # Zero-Erasure Design
//!
//! The bundle stores plain function pointers into the user's solution type.
//! Moves and selectors copy it around freely; no `dyn Any`, no downcasting.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use super::element::{ElementPosition, ElementRef};

/// Accessors for one list variable of one entity type.
///
/// Acts as the position oracle: every query reads the working solution it is
/// handed, so nothing is cached across a mutation.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The list element value type
///
/// # Example
///
/// ```
/// use listforge_core::{ElementPosition, ElementRef, ListVariable};
///
/// struct Plan { routes: Vec<Vec<u32>> }
///
/// fn entity_count(s: &Plan) -> usize { s.routes.len() }
/// fn list_len(s: &Plan, e: usize) -> usize { s.routes.get(e).map_or(0, |r| r.len()) }
/// fn list_get(s: &Plan, e: usize, i: usize) -> Option<u32> {
///     s.routes.get(e).and_then(|r| r.get(i)).copied()
/// }
/// fn list_insert(s: &mut Plan, e: usize, i: usize, v: u32) { s.routes[e].insert(i, v); }
/// fn list_remove(s: &mut Plan, e: usize, i: usize) -> Option<u32> {
///     s.routes.get_mut(e).filter(|r| i < r.len()).map(|r| r.remove(i))
/// }
/// fn sublist_remove(s: &mut Plan, e: usize, from: usize, to: usize) -> Vec<u32> {
///     s.routes[e].drain(from..to).collect()
/// }
/// fn sublist_insert(s: &mut Plan, e: usize, at: usize, values: Vec<u32>) {
///     s.routes[e].splice(at..at, values);
/// }
///
/// let variable = ListVariable::<Plan, u32>::new(
///     entity_count, list_len, list_get, list_insert, list_remove,
///     sublist_remove, sublist_insert, "stops", 0,
/// );
/// let plan = Plan { routes: vec![vec![7, 8], vec![9]] };
///
/// assert_eq!(variable.list_size(&plan, 0), 2);
/// assert_eq!(variable.position_of(&plan, &9), ElementPosition::Assigned(ElementRef::new(1, 0)));
/// assert_eq!(variable.owning_entity(&plan, &8), Some(0));
/// assert_eq!(variable.position_of(&plan, &5), ElementPosition::Unassigned);
/// ```
pub struct ListVariable<S, V> {
    entity_count: fn(&S) -> usize,
    list_len: fn(&S, usize) -> usize,
    list_get: fn(&S, usize, usize) -> Option<V>,
    list_insert: fn(&mut S, usize, usize, V),
    list_remove: fn(&mut S, usize, usize) -> Option<V>,
    sublist_remove: fn(&mut S, usize, usize, usize) -> Vec<V>,
    sublist_insert: fn(&mut S, usize, usize, Vec<V>),
    /// Optional O(1) inverse lookup maintained by the user's model.
    position_lookup: Option<fn(&S, &V) -> Option<ElementRef>>,
    variable_name: &'static str,
    descriptor_index: usize,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V> Clone for ListVariable<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for ListVariable<S, V> {}

impl<S, V> Debug for ListVariable<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListVariable")
            .field("variable_name", &self.variable_name)
            .field("descriptor_index", &self.descriptor_index)
            .field("indexed", &self.position_lookup.is_some())
            .finish()
    }
}

impl<S, V> ListVariable<S, V> {
    /// Creates a new accessor bundle.
    ///
    /// # Arguments
    /// * `entity_count` - Number of entities owning this list variable
    /// * `list_len` - Length of an entity's list
    /// * `list_get` - Value at a position
    /// * `list_insert` - Inserts a value at a position
    /// * `list_remove` - Removes and returns the value at a position
    /// * `sublist_remove` - Removes and returns `[from, to)`
    /// * `sublist_insert` - Inserts values starting at a position
    /// * `variable_name` - Name of the list variable
    /// * `descriptor_index` - Entity descriptor index
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity_count: fn(&S) -> usize,
        list_len: fn(&S, usize) -> usize,
        list_get: fn(&S, usize, usize) -> Option<V>,
        list_insert: fn(&mut S, usize, usize, V),
        list_remove: fn(&mut S, usize, usize) -> Option<V>,
        sublist_remove: fn(&mut S, usize, usize, usize) -> Vec<V>,
        sublist_insert: fn(&mut S, usize, usize, Vec<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_count,
            list_len,
            list_get,
            list_insert,
            list_remove,
            sublist_remove,
            sublist_insert,
            position_lookup: None,
            variable_name,
            descriptor_index,
            _phantom: PhantomData,
        }
    }

    /// Installs an inverse lookup, replacing the default linear scan.
    pub fn with_position_lookup(mut self, index_of: fn(&S, &V) -> Option<ElementRef>) -> Self {
        self.position_lookup = Some(index_of);
        self
    }

    /// Returns the variable name.
    pub fn variable_name(&self) -> &'static str {
        self.variable_name
    }

    /// Returns the entity descriptor index.
    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    /// Returns the number of entities.
    #[inline]
    pub fn entity_count(&self, solution: &S) -> usize {
        (self.entity_count)(solution)
    }

    /// Returns the length of an entity's list.
    #[inline]
    pub fn list_size(&self, solution: &S, entity_index: usize) -> usize {
        (self.list_len)(solution, entity_index)
    }

    /// Returns the value at a slot.
    #[inline]
    pub fn get(&self, solution: &S, entity_index: usize, index: usize) -> Option<V> {
        (self.list_get)(solution, entity_index, index)
    }

    /// Inserts a value at a slot.
    #[inline]
    pub fn insert(&self, solution: &mut S, entity_index: usize, index: usize, value: V) {
        (self.list_insert)(solution, entity_index, index, value)
    }

    /// Removes the value at a slot.
    #[inline]
    pub fn remove(&self, solution: &mut S, entity_index: usize, index: usize) -> Option<V> {
        (self.list_remove)(solution, entity_index, index)
    }

    /// Removes the values in `[from_index, to_index)`.
    #[inline]
    pub fn remove_range(
        &self,
        solution: &mut S,
        entity_index: usize,
        from_index: usize,
        to_index: usize,
    ) -> Vec<V> {
        (self.sublist_remove)(solution, entity_index, from_index, to_index)
    }

    /// Inserts values starting at `index`.
    #[inline]
    pub fn insert_all(&self, solution: &mut S, entity_index: usize, index: usize, values: Vec<V>) {
        (self.sublist_insert)(solution, entity_index, index, values)
    }

    /// Returns the total number of assigned values across all entities.
    pub fn assigned_count(&self, solution: &S) -> usize {
        (0..self.entity_count(solution))
            .map(|entity_index| self.list_size(solution, entity_index))
            .sum()
    }
}

impl<S, V: PartialEq> ListVariable<S, V> {
    /// Returns where a value currently lives.
    pub fn position_of(&self, solution: &S, value: &V) -> ElementPosition {
        if let Some(index_of) = self.position_lookup {
            return match index_of(solution, value) {
                Some(element) => ElementPosition::Assigned(element),
                None => ElementPosition::Unassigned,
            };
        }
        for entity_index in 0..self.entity_count(solution) {
            for index in 0..self.list_size(solution, entity_index) {
                if self.get(solution, entity_index, index).as_ref() == Some(value) {
                    return ElementPosition::Assigned(ElementRef::new(entity_index, index));
                }
            }
        }
        ElementPosition::Unassigned
    }

    /// Returns the entity whose list contains the value.
    pub fn owning_entity(&self, solution: &S, value: &V) -> Option<usize> {
        self.position_of(solution, value)
            .element_ref()
            .map(|element| element.entity_index)
    }

    /// Returns the index of the value within its owner's list.
    pub fn index_of(&self, solution: &S, value: &V) -> Option<usize> {
        self.position_of(solution, value)
            .element_ref()
            .map(|element| element.index)
    }
}

impl<S, V> ListVariable<S, V> {
    /// Copies an entity's list out of the solution.
    pub fn snapshot(&self, solution: &S, entity_index: usize) -> Vec<V> {
        (0..self.list_size(solution, entity_index))
            .filter_map(|index| self.get(solution, entity_index, index))
            .collect()
    }
}
