//! Selection order for selectors.

use listforge_config::SelectionOrder as ConfiguredOrder;

/// Defines the order in which elements are selected from a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionOrder {
    /// Select elements in their original order.
    ///
    /// The sequence is finite and deterministic; each call to `iter` starts
    /// a fresh pass.
    Original,

    /// Select elements randomly, with replacement.
    ///
    /// The sequence is endless and draws from the shared working random.
    #[default]
    Random,
}

impl SelectionOrder {
    /// Returns `true` if this selection order implies random selection.
    pub fn is_random(&self) -> bool {
        matches!(self, SelectionOrder::Random)
    }
}

impl From<ConfiguredOrder> for SelectionOrder {
    fn from(order: ConfiguredOrder) -> Self {
        match order {
            ConfiguredOrder::Original => SelectionOrder::Original,
            ConfiguredOrder::Random => SelectionOrder::Random,
        }
    }
}

/// Iterator returned by selectors that switch on their selection order.
pub(crate) enum OrderedIter<O, R> {
    Original(O),
    Random(R),
}

impl<T, O, R> Iterator for OrderedIter<O, R>
where
    O: Iterator<Item = T>,
    R: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            OrderedIter::Original(iter) => iter.next(),
            OrderedIter::Random(iter) => iter.next(),
        }
    }
}
