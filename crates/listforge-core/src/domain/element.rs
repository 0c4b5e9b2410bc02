//! Positional references into list variables.

use std::fmt;

/// A single slot in an entity's list.
///
/// Used both to locate an existing element and as an insertion point. When
/// used as an insertion point, `index` may equal the list length, and
/// `ElementRef::new(entity, 0)` means "prepend to this entity".
///
/// Entity identity is the entity index, not domain equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRef {
    /// Index of the owning entity.
    pub entity_index: usize,
    /// Position in the entity's list.
    pub index: usize,
}

impl ElementRef {
    /// Creates a new element reference.
    #[inline]
    pub const fn new(entity_index: usize, index: usize) -> Self {
        Self {
            entity_index,
            index,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.entity_index, self.index)
    }
}

/// A contiguous, non-wrapping run of an entity's list.
///
/// Bounds are not enforced eagerly: the list may have changed since the
/// reference was captured, so moves re-validate `to_index() <= list_len`
/// before mutating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubList {
    /// Index of the owning entity.
    pub entity_index: usize,
    /// First position (inclusive).
    pub from_index: usize,
    /// Number of elements.
    pub length: usize,
}

impl SubList {
    /// Creates a new sub-list reference.
    #[inline]
    pub const fn new(entity_index: usize, from_index: usize, length: usize) -> Self {
        Self {
            entity_index,
            from_index,
            length,
        }
    }

    /// Returns the exclusive end position.
    #[inline]
    pub const fn to_index(&self) -> usize {
        self.from_index + self.length
    }

    /// Returns the first element of this sub-list as an element reference.
    #[inline]
    pub const fn first(&self) -> ElementRef {
        ElementRef::new(self.entity_index, self.from_index)
    }

    /// Returns true if both sub-lists live on the same entity and share a slot.
    pub fn overlaps(&self, other: &SubList) -> bool {
        self.entity_index == other.entity_index
            && self.from_index < other.to_index()
            && other.from_index < self.to_index()
    }
}

impl fmt::Display for SubList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}..{}]",
            self.entity_index,
            self.from_index,
            self.to_index()
        )
    }
}

/// Where a value currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementPosition {
    /// The value sits in a list at the given slot.
    Assigned(ElementRef),
    /// The value is not part of any list.
    Unassigned,
}

impl ElementPosition {
    /// Returns the slot if assigned.
    pub fn element_ref(self) -> Option<ElementRef> {
        match self {
            ElementPosition::Assigned(element) => Some(element),
            ElementPosition::Unassigned => None,
        }
    }

    /// Returns true if the value sits in some list.
    pub fn is_assigned(self) -> bool {
        matches!(self, ElementPosition::Assigned(_))
    }
}
