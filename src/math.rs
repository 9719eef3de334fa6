/// Dense fixed-capacity bit sets, the set-of-states representation used by every algorithm.
pub mod bitset;
pub use bitset::BitSet;

/// Refinable partitions of a state space.
pub mod partition;
pub use partition::{BlockId, Partition, Split};

mod union_find;
pub use union_find::UnionFind;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiHashMap<L, R>;
