/// PartitionSet maintains a total assignment of precincts to sets, with O(1) move/contains.
///
/// Set 0 is the unassigned pool; sets `1..num_sets` are communities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartitionSet {
    sets: Vec<Vec<usize>>,  // sets[s] = elements currently in set s
    index: Vec<usize>,      // index[e] = s when e is in sets[s]
    position: Vec<usize>    // position[e] = i when sets[s][i] is e
}

impl PartitionSet {
    /// Create a PartitionSet with `num_sets` sets and `num_elems` elements,
    /// initially assigning all elements to set 0.
    pub(crate) fn new(num_sets: usize, num_elems: usize) -> Self {
        assert!(num_sets > 0, "must have at least one set");
        let capacity = num_elems / num_sets + 1;
        let mut sets = (0..num_sets)
            .map(|_| Vec::with_capacity(capacity))
            .collect::<Vec<_>>();
        sets[0] = (0..num_elems).collect();

        Self { sets, index: vec![0; num_elems], position: (0..num_elems).collect() }
    }

    /// Number of sets, including the pool.
    #[inline] pub(crate) fn num_sets(&self) -> usize { self.sets.len() }

    /// Universe size (number of elements addressable by index).
    #[inline] pub(crate) fn num_elems(&self) -> usize { self.index.len() }

    /// Return the set that `elem` is currently in.
    #[inline]
    pub(crate) fn find(&self, elem: usize) -> usize {
        debug_assert!(elem < self.index.len(), "element out of range");
        self.index[elem]
    }

    /// Returns the elements currently in `set`, in no particular order.
    #[inline]
    pub(crate) fn get(&self, set: usize) -> &[usize] {
        debug_assert!(set < self.sets.len(), "set out of range");
        &self.sets[set]
    }

    /// Get a complete vector of assignments for each element.
    #[inline] pub(crate) fn assignments(&self) -> &[usize] { &self.index }

    /// Rebuild partition from a complete slice of assignments.
    pub(crate) fn rebuild(&mut self, assignments: &[usize]) {
        assert!(assignments.len() == self.num_elems(), "assignments length mismatch");

        self.sets.iter_mut().for_each(|v| v.clear());
        for (elem, &set) in assignments.iter().enumerate() {
            assert!(set < self.num_sets(), "set out of range");
            self.index[elem] = set;
            self.position[elem] = self.sets[set].len();
            self.sets[set].push(elem);
        }
    }

    /// Move `elem` to `set`, returning the set it left.
    pub(crate) fn move_to(&mut self, elem: usize, set: usize) -> usize {
        debug_assert!(elem < self.index.len(), "element out of range");
        debug_assert!(set < self.sets.len(), "set out of range");

        let (prev, pos) = (self.index[elem], self.position[elem]);
        if prev == set { return prev }

        // Remove from previous set by swapping with last element.
        self.sets[prev].swap_remove(pos);
        if let Some(&moved) = self.sets[prev].get(pos) {
            self.position[moved] = pos;
        }

        self.index[elem] = set;
        self.position[elem] = self.sets[set].len();
        self.sets[set].push(elem);
        prev
    }
}
