use crate::automaton::StateId;

/// Disjoint-set forest over the states `0..n` with path compression. The representative of
/// a class is always its smallest member, which keeps the class numbering independent of the
/// order in which merges happen. There is no union by rank, so chains are only flattened by
/// [`UnionFind::find`].
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<StateId>,
    classes: usize,
}

impl UnionFind {
    /// Creates a forest where every element of `0..size` is its own class.
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as StateId).collect(),
            classes: size,
        }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// The number of distinct classes.
    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Returns the representative of the class containing `element`.
    pub fn find(&mut self, element: StateId) -> StateId {
        let mut root = element;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut current = element;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        root
    }

    /// Returns `true` if `left` and `right` are in the same class.
    pub fn same(&mut self, left: StateId, right: StateId) -> bool {
        self.find(left) == self.find(right)
    }

    /// Merges the classes of `left` and `right` and returns the representative of the
    /// merged class.
    pub fn union(&mut self, left: StateId, right: StateId) -> StateId {
        let left = self.find(left);
        let right = self.find(right);
        match left.cmp(&right) {
            std::cmp::Ordering::Less => {
                self.parent[right as usize] = left;
                self.classes -= 1;
                left
            }
            std::cmp::Ordering::Equal => left,
            std::cmp::Ordering::Greater => {
                self.parent[left as usize] = right;
                self.classes -= 1;
                right
            }
        }
    }

    /// Flattens the forest and returns the representative of every element.
    pub fn compact(&mut self) -> Vec<StateId> {
        (0..self.len() as StateId).map(|q| self.find(q)).collect()
    }
}
