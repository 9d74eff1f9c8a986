//! Strongly-typed identifiers.

use std::fmt;

/// Discovery index of a group inside one evaluation; also its slot in the
/// result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_discovery_index() {
        assert_eq!(GroupId::new(3).to_string(), "group #3");
        assert_eq!(GroupId::new(3).get(), 3);
    }
}
