//! Uniform sampling of sub-lists through triangular numbers.
//!
//! Number the sub-lists of a list of length `n` on a staircase: level `L`
//! holds the `L` sub-lists of length `n - L + 1`. The first `T(L)` integers
//! (where `T(k) = k(k+1)/2`) cover levels `1..=L`, so one uniform integer
//! decodes into a `(start, length)` pair in O(1) and every pair is equally
//! likely.

use listforge_core::{ListForgeError, Result};

use super::random::WorkingRandom;

/// Largest `k` for which `T(k)` fits a signed 32-bit integer.
pub const MAX_TRIANGLE_SIDE: usize = 65_535;

/// Returns the `k`-th triangular number, `k(k+1)/2`.
#[inline]
pub const fn triangle(k: usize) -> usize {
    k * (k + 1) / 2
}

fn checked_triangle(k: usize) -> Result<usize> {
    if k > MAX_TRIANGLE_SIDE {
        return Err(ListForgeError::capacity(format!(
            "triangular number of side {k} overflows a 32-bit count (side limit {MAX_TRIANGLE_SIDE})"
        )));
    }
    Ok(triangle(k))
}

/// A position in the triangular numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleElement {
    /// 1-based ordinal.
    pub index: usize,
    /// 1-based level; level `L` holds `L` slots.
    pub level: usize,
    /// 1-based slot within the level.
    pub index_on_level: usize,
}

impl TriangleElement {
    /// Decodes a 1-based ordinal.
    ///
    /// # Panics
    ///
    /// If `index` is zero.
    pub fn value_of(index: usize) -> Self {
        assert!(index > 0, "triangle indices start at 1");
        let root = ((8.0 * index as f64 + 1.0).sqrt() - 1.0) / 2.0;
        let mut level = root.ceil() as usize;
        // Float rounding can land one level off on large inputs.
        while level > 1 && triangle(level - 1) >= index {
            level -= 1;
        }
        while triangle(level) < index {
            level += 1;
        }
        Self {
            index,
            level,
            index_on_level: index - triangle(level - 1),
        }
    }
}

/// Counts the contiguous sub-lists of a list of length `list_size` whose
/// length lies in `[minimum, maximum]`.
///
/// # Errors
///
/// Returns a capacity error when the count does not fit a 32-bit integer.
pub fn count_sub_lists(list_size: usize, minimum: usize, maximum: usize) -> Result<usize> {
    if list_size < minimum {
        return Ok(0);
    }
    let all = checked_triangle(list_size - minimum + 1)?;
    let too_long = if list_size <= maximum {
        0
    } else {
        triangle(list_size - maximum)
    };
    Ok(all - too_long)
}

/// Draws `(start, length)` pairs uniformly from the sub-lists of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangularSampler {
    minimum: usize,
    maximum: usize,
}

impl TriangularSampler {
    /// Creates a sampler for sub-list lengths in `[minimum, maximum]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `minimum` is zero or exceeds `maximum`.
    pub fn new(minimum: usize, maximum: usize) -> Result<Self> {
        if minimum == 0 {
            return Err(ListForgeError::config(
                "minimum sub-list size must be at least 1",
            ));
        }
        if minimum > maximum {
            return Err(ListForgeError::config(format!(
                "minimum sub-list size ({minimum}) exceeds maximum sub-list size ({maximum})"
            )));
        }
        Ok(Self { minimum, maximum })
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn maximum(&self) -> usize {
        self.maximum
    }

    /// Number of sub-lists a list of `list_size` elements admits.
    pub fn count(&self, list_size: usize) -> Result<usize> {
        count_sub_lists(list_size, self.minimum, self.maximum)
    }

    /// Longest sub-list length usable in a list of `list_size` elements.
    pub fn longest(&self, list_size: usize) -> usize {
        self.maximum.min(list_size)
    }

    /// Draws one `(start, length)` pair, or `None` when the list admits no sub-list.
    ///
    /// Lists whose count overflows are treated as admitting none; validate
    /// with [`count`](Self::count) beforehand.
    pub fn next_element(&self, list_size: usize, random: &WorkingRandom) -> Option<(usize, usize)> {
        if list_size < self.minimum || list_size - self.minimum + 1 > MAX_TRIANGLE_SIDE {
            return None;
        }
        let count = triangle(list_size - self.minimum + 1);
        let top_excluded = if list_size <= self.maximum {
            0
        } else {
            triangle(list_size - self.maximum)
        };
        if count <= top_excluded {
            return None;
        }
        let drawn = random.next_in_inclusive(top_excluded + 1, count);
        let element = TriangleElement::value_of(drawn);
        Some((element.index_on_level - 1, list_size - element.level + 1))
    }
}

#[cfg(test)]
#[path = "triangle_tests.rs"]
mod tests;
