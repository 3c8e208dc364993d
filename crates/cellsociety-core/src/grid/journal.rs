use std::collections::HashSet;

/// Record of cross-cell writes made during one decision pass.
///
/// Kinds whose decisions write a neighbor's pending state mark that neighbor
/// here; the neighbor then skips its own decision for the rest of the tick.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    acted: HashSet<usize>,
    foreign_writes: usize,
}

impl Journal {
    pub(crate) fn mark_acted(&mut self, pos: usize) {
        self.acted.insert(pos);
        self.foreign_writes += 1;
    }

    pub(crate) fn has_acted(&self, pos: usize) -> bool {
        self.acted.contains(&pos)
    }

    pub(crate) fn foreign_writes(&self) -> usize {
        self.foreign_writes
    }

    pub(crate) fn clear(&mut self) {
        self.acted.clear();
        self.foreign_writes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_forgets_acted_cells() {
        let mut journal = Journal::default();
        journal.mark_acted(3);
        journal.mark_acted(3);
        assert!(journal.has_acted(3));
        assert!(!journal.has_acted(4));
        assert_eq!(journal.foreign_writes(), 2);
        journal.clear();
        assert!(!journal.has_acted(3));
        assert_eq!(journal.foreign_writes(), 0);
    }
}
