use std::fmt::Debug;

use itertools::Itertools;

use crate::Show;

/// The unsigned word that backs a [`BitSet`].
pub type Token = u64;

const TOKEN_BITS: usize = Token::BITS as usize;

/// A dense set of integers in the range `0..capacity`, stored as a vector of
/// [`Token`]s where bit `b` of token `i` represents the element `i * 64 + b`.
///
/// Membership tests and updates are O(1), while the set operations ([`BitSet::union_with`],
/// [`BitSet::intersect_with`], [`BitSet::complement`], ...) run in time linear in the number of
/// tokens. Iterating over the members takes time proportional to the number of members plus
/// the number of tokens and always yields the members in strictly increasing order.
///
/// Bits beyond `capacity` in the last token are always zero, so two sets with the same
/// capacity and the same members are equal and hash to the same value. This allows sets of
/// states to be used as keys in maps, which is what the subset construction relies on.
///
/// # Example
/// ```
/// use automata_minimization::prelude::*;
///
/// let mut set = BitSet::new(10);
/// set.add(0);
/// set.add(3);
/// assert!(set.contains(3));
/// assert!(!set.contains(2));
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 3]);
///
/// set.complement();
/// assert_eq!(set.count(), 8);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitSet {
    tokens: Vec<Token>,
    capacity: usize,
}

impl BitSet {
    /// Creates an empty set that can hold the elements `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            tokens: vec![0; capacity.div_ceil(TOKEN_BITS)],
            capacity,
        }
    }

    /// Creates a set that contains every element in `0..capacity`.
    pub fn full(capacity: usize) -> Self {
        let mut out = Self {
            tokens: vec![Token::MAX; capacity.div_ceil(TOKEN_BITS)],
            capacity,
        };
        out.mask_last_token();
        out
    }

    /// Creates a set of the given capacity containing the elements produced by `iter`.
    /// Panics if any element is out of range.
    pub fn from_iter_with_capacity<I: IntoIterator<Item = usize>>(capacity: usize, iter: I) -> Self {
        let mut out = Self::new(capacity);
        for element in iter {
            out.add(element);
        }
        out
    }

    /// The number of elements the set can hold, i.e. the exclusive upper bound on elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The underlying tokens, low elements first.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    fn locate(&self, element: usize) -> (usize, Token) {
        assert!(
            element < self.capacity,
            "element {element} out of range for bit set of capacity {}",
            self.capacity
        );
        (element / TOKEN_BITS, 1 << (element % TOKEN_BITS))
    }

    fn last_token_mask(&self) -> Token {
        match self.capacity % TOKEN_BITS {
            0 => Token::MAX,
            offset => (1 << offset) - 1,
        }
    }

    fn mask_last_token(&mut self) {
        let mask = self.last_token_mask();
        if let Some(last) = self.tokens.last_mut() {
            *last &= mask;
        }
    }

    fn assert_same_capacity(&self, other: &BitSet) {
        assert_eq!(
            self.capacity, other.capacity,
            "bit set operation on sets of different capacity"
        );
    }

    /// Returns `true` if `element` is in the set.
    #[inline]
    pub fn contains(&self, element: usize) -> bool {
        let (token, bit) = self.locate(element);
        self.tokens[token] & bit != 0
    }

    /// Adds `element` to the set.
    #[inline]
    pub fn add(&mut self, element: usize) {
        let (token, bit) = self.locate(element);
        self.tokens[token] |= bit;
    }

    /// Removes `element` from the set.
    #[inline]
    pub fn remove(&mut self, element: usize) {
        let (token, bit) = self.locate(element);
        self.tokens[token] &= !bit;
    }

    /// Adds or removes `element` depending on `present`.
    #[inline]
    pub fn set(&mut self, element: usize, present: bool) {
        if present {
            self.add(element)
        } else {
            self.remove(element)
        }
    }

    /// Adds `element` and returns whether it was already a member.
    #[inline]
    pub fn test_and_add(&mut self, element: usize) -> bool {
        let (token, bit) = self.locate(element);
        let was_member = self.tokens[token] & bit != 0;
        self.tokens[token] |= bit;
        was_member
    }

    /// Removes `element` and returns whether it was a member.
    #[inline]
    pub fn test_and_remove(&mut self, element: usize) -> bool {
        let (token, bit) = self.locate(element);
        let was_member = self.tokens[token] & bit != 0;
        self.tokens[token] &= !bit;
        was_member
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.tokens.iter_mut().for_each(|token| *token = 0);
    }

    /// Replaces the set by its complement with respect to `0..capacity`.
    pub fn complement(&mut self) {
        self.tokens.iter_mut().for_each(|token| *token = !*token);
        self.mask_last_token();
    }

    /// Adds every element of `other`. Both sets must have the same capacity.
    pub fn union_with(&mut self, other: &BitSet) {
        self.assert_same_capacity(other);
        self.tokens
            .iter_mut()
            .zip(&other.tokens)
            .for_each(|(l, r)| *l |= *r);
    }

    /// Removes every element that is not in `other`. Both sets must have the same capacity.
    pub fn intersect_with(&mut self, other: &BitSet) {
        self.assert_same_capacity(other);
        self.tokens
            .iter_mut()
            .zip(&other.tokens)
            .for_each(|(l, r)| *l &= *r);
    }

    /// Removes every element of `other`. Both sets must have the same capacity.
    pub fn difference_with(&mut self, other: &BitSet) {
        self.assert_same_capacity(other);
        self.tokens
            .iter_mut()
            .zip(&other.tokens)
            .for_each(|(l, r)| *l &= !*r);
    }

    /// Returns `true` if the two sets share at least one element.
    pub fn intersects(&self, other: &BitSet) -> bool {
        self.assert_same_capacity(other);
        self.tokens
            .iter()
            .zip(&other.tokens)
            .any(|(l, r)| l & r != 0)
    }

    /// Returns `true` if every element of `self` is also in `other`.
    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.assert_same_capacity(other);
        self.tokens
            .iter()
            .zip(&other.tokens)
            .all(|(l, r)| l & !r == 0)
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|token| *token == 0)
    }

    /// The number of members.
    pub fn count(&self) -> usize {
        self.tokens
            .iter()
            .map(|token| token.count_ones() as usize)
            .sum()
    }

    /// The smallest member, if any.
    pub fn first(&self) -> Option<usize> {
        self.iter().next()
    }

    /// Iterates over the members in increasing order.
    pub fn iter(&self) -> Members<'_> {
        Members {
            tokens: &self.tokens,
            position: 0,
            current: self.tokens.first().copied().unwrap_or(0),
        }
    }

    /// Calls `callback` for every member in increasing order until it returns `false`.
    pub fn for_each_member<F: FnMut(usize) -> bool>(&self, mut callback: F) {
        for element in self.iter() {
            if !callback(element) {
                return;
            }
        }
    }
}

/// Iterator over the members of a [`BitSet`], see [`BitSet::iter`].
#[derive(Clone)]
pub struct Members<'a> {
    tokens: &'a [Token],
    position: usize,
    current: Token,
}

impl Iterator for Members<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current == 0 {
            self.position += 1;
            self.current = *self.tokens.get(self.position)?;
        }
        let offset = self.current.trailing_zeros() as usize;
        // clear lowest set bit
        self.current &= self.current - 1;
        Some(self.position * TOKEN_BITS + offset)
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Members<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl Show for BitSet {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::BitSet;

    fn members(set: &BitSet) -> Vec<usize> {
        set.iter().collect()
    }

    #[test]
    fn add_remove_contains() {
        let mut set = BitSet::new(10);
        set.add(0);
        set.add(3);
        assert!(set.contains(0));
        assert!(!set.contains(1));
        assert!(!set.contains(2));
        assert!(set.contains(3));
        assert_eq!(members(&set), vec![0, 3]);

        set.remove(0);
        assert!(!set.contains(0));
        assert_eq!(members(&set), vec![3]);
    }

    #[test]
    fn test_and_mutate() {
        let mut set = BitSet::new(130);
        assert!(!set.test_and_add(129));
        assert!(set.test_and_add(129));
        assert!(set.test_and_remove(129));
        assert!(!set.test_and_remove(129));
        assert!(set.is_empty());
    }

    #[test]
    fn complement_masks_high_bits() {
        for capacity in [0, 1, 63, 64, 65, 100, 128] {
            let mut set = BitSet::new(capacity);
            set.complement();
            assert_eq!(set.count(), capacity);
            assert_eq!(set, BitSet::full(capacity));
            assert_eq!(members(&set), (0..capacity).collect::<Vec<_>>());
            set.complement();
            assert!(set.is_empty());
        }
    }

    #[test]
    fn set_laws() {
        let a = BitSet::from_iter_with_capacity(200, [0, 5, 64, 65, 130, 199]);
        let b = BitSet::from_iter_with_capacity(200, [5, 6, 65, 131, 199]);

        let mut union = a.clone();
        union.union_with(&b);
        for x in 0..200 {
            assert_eq!(union.contains(x), a.contains(x) || b.contains(x));
        }

        let mut intersection = a.clone();
        intersection.intersect_with(&b);
        assert_eq!(members(&intersection), vec![5, 65, 199]);
        assert!(a.intersects(&b));
        assert!(intersection.is_subset(&a));
        assert!(intersection.is_subset(&b));

        let mut difference = a.clone();
        difference.difference_with(&b);
        assert_eq!(members(&difference), vec![0, 64, 130]);

        let mut twice = a.clone();
        twice.complement();
        twice.complement();
        assert_eq!(twice, a);

        assert_eq!(a.count(), (0..200).filter(|x| a.contains(*x)).count());
        let visited = members(&a);
        assert_eq!(visited.len(), a.count());
        assert!(visited.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn for_each_member_stops_early() {
        let set = BitSet::from_iter_with_capacity(300, [1, 70, 150, 299]);
        let mut seen = vec![];
        set.for_each_member(|x| {
            seen.push(x);
            x < 70
        });
        assert_eq!(seen, vec![1, 70]);
        assert_eq!(set.first(), Some(1));
        assert_eq!(BitSet::new(300).first(), None);
    }

    #[test]
    fn equal_sets_hash_equally() {
        use std::hash::{Hash, Hasher};
        let hash = |set: &BitSet| {
            let mut hasher = fxhash::FxHasher::default();
            set.hash(&mut hasher);
            hasher.finish()
        };
        let mut a = BitSet::new(70);
        a.add(69);
        let b = BitSet::from_iter_with_capacity(70, [69]);
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
        assert_eq!(format!("{a:?}"), "{69}");
    }

    #[test]
    #[should_panic]
    fn mismatched_capacity_fails_fast() {
        let mut a = BitSet::new(10);
        a.union_with(&BitSet::new(100));
    }

    #[test]
    #[should_panic]
    fn out_of_range_element() {
        BitSet::new(10).add(10);
    }
}
