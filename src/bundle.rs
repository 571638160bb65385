//! Splits the chronologically ordered list of published pages into
//! fixed-capacity groups for the blog navigation. The input is ordered
//! oldest-first; grouping is anchored to the *newest* end of the list so that
//! the newest navigation page is always full, while groups are emitted
//! oldest-first so that page numbers grow with age and the freshest page can
//! keep the stable `index.html` name.
//!
//! Concretely: reverse the input, chunk it into groups of `capacity` (the
//! trailing remainder becomes the partial group holding the very first
//! things ever published), then reverse the list of groups. Items inside
//! each group stay newest-first; that is the order the navigation tiles are
//! rendered in.

use std::fmt;

/// One navigation page worth of elements, newest-first. Only the first
/// (oldest) group of a bundling run may hold fewer than `capacity` elements.
#[derive(Debug)]
pub struct Group<'a, T> {
    elements: Vec<&'a T>,
}

impl<'a, T> Group<'a, T> {
    pub fn elements(&self) -> &[&'a T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Partitions `items` (ordered oldest-first; this precondition is a caller
/// contract and is not checked) into groups of at most `capacity`. Pure; the
/// input is only read.
pub fn bundle<T>(items: &[T], capacity: usize) -> Result<Vec<Group<T>>> {
    if capacity == 0 {
        return Err(Error::InvalidCapacity);
    }

    let mut groups = Vec::with_capacity(items.len() / capacity + 1);
    let mut current = Vec::with_capacity(capacity);
    for item in items.iter().rev() {
        current.push(item);
        if current.len() == capacity {
            groups.push(Group { elements: current });
            current = Vec::with_capacity(capacity);
        }
    }
    if !current.is_empty() {
        groups.push(Group { elements: current });
    }
    groups.reverse();
    Ok(groups)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for bundling. The only failure mode is a zero capacity;
/// everything else is pure allocation.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when `bundle` is called with a capacity of zero.
    InvalidCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidCapacity => {
                write!(f, "bundle capacity must be greater than zero")
            }
        }
    }
}

impl std::error::Error for Error {}
