use std::fmt::Debug;

use itertools::Itertools;

use crate::{automaton::StateId, math::BitSet, Show};

/// Index of a block within a [`Partition`].
pub type BlockId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    offset: usize,
    len: usize,
}

/// The result of splitting a block, see [`Partition::split_marked`]. The block `original`
/// keeps the unmarked elements while the freshly allocated block `created` receives the
/// marked ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// The block that was split, it retains the unmarked elements.
    pub original: BlockId,
    /// The newly created block holding the marked elements.
    pub created: BlockId,
}

/// A partition of the states `0..n` into disjoint, non-empty blocks.
///
/// All states live in a single permutation array; each block is a contiguous range of that
/// array described by an offset and a length. Together with the lookup tables from state to
/// block and from state to its position in the array, this allows refining the partition in
/// time proportional to the number of states that are touched rather than the size of the
/// affected blocks: states are first [marked](Partition::mark), which moves them to the
/// front of their block, and then [`Partition::split_marked`] cuts every block that is only
/// partially marked into two.
///
/// Block ids are stable, a split only ever appends new blocks.
#[derive(Clone)]
pub struct Partition {
    elements: Vec<StateId>,
    position: Vec<usize>,
    block_of: Vec<BlockId>,
    blocks: Vec<Block>,
    marked: Vec<usize>,
    touched: Vec<BlockId>,
}

impl Partition {
    /// Creates the partition of `0..size` consisting of a single block, or no block at all
    /// if `size` is zero.
    pub fn new(size: usize) -> Self {
        Self::from_representatives(&vec![0; size])
    }

    /// Groups the states `0..size` by the boolean `classifier`. States for which it returns
    /// `true` form block 0 (if there are any), the remaining states form the next block.
    pub fn from_classifier<F: Fn(StateId) -> bool>(size: usize, classifier: F) -> Self {
        let representatives = (0..size as StateId)
            .map(|q| if classifier(q) { 0 } else { 1 })
            .collect_vec();
        let first_true = representatives.iter().position(|r| *r == 0);
        let mut partition = Self::from_representatives(&representatives);
        if let (Some(first), true) = (first_true, partition.size() == 2) {
            // make sure the `true` side is block 0 regardless of which state comes first
            if partition.block_of(first as StateId) != 0 {
                partition.blocks.swap(0, 1);
                partition.block_of.iter_mut().for_each(|b| *b = 1 - *b);
            }
        }
        partition
    }

    /// Builds the partition in which two states share a block if and only if they have the
    /// same entry in `representatives`. Blocks are numbered in order of their smallest member.
    pub fn from_representatives<R: Eq + std::hash::Hash + Copy>(representatives: &[R]) -> Self {
        let size = representatives.len();
        let mut block_ids = super::Map::default();
        let mut block_of = Vec::with_capacity(size);
        let mut lengths: Vec<usize> = vec![];
        for representative in representatives {
            let next = block_ids.len();
            let id = *block_ids.entry(*representative).or_insert(next);
            if id == lengths.len() {
                lengths.push(0);
            }
            lengths[id] += 1;
            block_of.push(id);
        }

        let mut blocks = Vec::with_capacity(lengths.len());
        let mut offset = 0;
        for len in &lengths {
            blocks.push(Block { offset, len: 0 });
            offset += len;
        }

        let mut elements = vec![0; size];
        let mut position = vec![0; size];
        for (q, b) in block_of.iter().enumerate() {
            let block = &mut blocks[*b];
            let at = block.offset + block.len;
            elements[at] = q as StateId;
            position[q] = at;
            block.len += 1;
        }

        Self {
            elements,
            position,
            block_of,
            marked: vec![0; blocks.len()],
            blocks,
            touched: vec![],
        }
    }

    /// The number of blocks.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// The number of states that are partitioned.
    pub fn state_count(&self) -> usize {
        self.elements.len()
    }

    /// The states in block `block`. The order within a block is unspecified.
    pub fn block(&self, block: BlockId) -> &[StateId] {
        let Block { offset, len } = self.blocks[block];
        &self.elements[offset..offset + len]
    }

    /// The number of states in block `block`.
    pub fn len_of(&self, block: BlockId) -> usize {
        self.blocks[block].len
    }

    /// The block that contains `state`.
    #[inline]
    pub fn block_of(&self, state: StateId) -> BlockId {
        self.block_of[state as usize]
    }

    /// Iterates over all blocks in order of their id.
    pub fn iter(&self) -> impl Iterator<Item = &[StateId]> + '_ {
        (0..self.size()).map(|b| self.block(b))
    }

    /// Returns the blocks as sorted vectors, sorted by their smallest element. Two
    /// partitions are equal if and only if their classes are equal.
    pub fn classes(&self) -> Vec<Vec<StateId>> {
        self.iter()
            .map(|block| block.iter().copied().sorted().collect_vec())
            .sorted()
            .collect()
    }

    /// Marks `state` for the next call to [`Partition::split_marked`]. Marking a state twice
    /// has no further effect.
    pub fn mark(&mut self, state: StateId) {
        let b = self.block_of[state as usize];
        let Block { offset, .. } = self.blocks[b];
        let marked = self.marked[b];
        let at = self.position[state as usize];
        let boundary = offset + marked;
        if at < boundary {
            return;
        }
        if marked == 0 {
            self.touched.push(b);
        }
        let other = self.elements[boundary];
        self.elements.swap(at, boundary);
        self.position[other as usize] = at;
        self.position[state as usize] = boundary;
        self.marked[b] += 1;
    }

    /// Splits every block in which some but not all states are marked and clears all marks.
    /// Returns the performed splits in the order in which the blocks were first marked.
    pub fn split_marked(&mut self) -> Vec<Split> {
        let mut splits = vec![];
        for b in std::mem::take(&mut self.touched) {
            let marked = std::mem::take(&mut self.marked[b]);
            let Block { offset, len } = self.blocks[b];
            if marked == len {
                continue;
            }
            let created = self.blocks.len();
            self.blocks.push(Block {
                offset,
                len: marked,
            });
            self.marked.push(0);
            self.blocks[b] = Block {
                offset: offset + marked,
                len: len - marked,
            };
            for q in &self.elements[offset..offset + marked] {
                self.block_of[*q as usize] = created;
            }
            splits.push(Split {
                original: b,
                created,
            });
        }
        splits
    }

    /// Splits every block into the states inside and outside of `set`.
    pub fn split_by(&mut self, set: &BitSet) -> Vec<Split> {
        for q in set.iter() {
            self.mark(q as StateId);
        }
        self.split_marked()
    }

    /// Checks that every block is non-empty and that the lookup tables agree with the
    /// permutation of states.
    pub(crate) fn is_consistent(&self) -> bool {
        self.blocks.iter().enumerate().all(|(b, block)| {
            block.len > 0
                && self.elements[block.offset..block.offset + block.len]
                    .iter()
                    .all(|q| self.block_of[*q as usize] == b)
        }) && self
            .elements
            .iter()
            .enumerate()
            .all(|(at, q)| self.position[*q as usize] == at)
    }
}

impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.state_count() == other.state_count()
            && self.size() == other.size()
            && self.classes() == other.classes()
    }
}
impl Eq for Partition {}

impl Show for Partition {
    fn show(&self) -> String {
        format!(
            "{{{}}}",
            self.classes()
                .into_iter()
                .map(|class| format!("{{{}}}", class.iter().join(", ")))
                .join(", ")
        )
    }
}

impl Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}
