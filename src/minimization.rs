//! Minimization of deterministic finite automata.
//!
//! Five algorithms are provided. [`minimize_hopcroft`], [`minimize_incremental`] and
//! [`minimize_hybrid`] compute the Myhill-Nerode equivalence on all states of a [`Dfa`] as
//! a [`Partition`], which [`synthesize`] turns into the quotient automaton.
//! [`minimize_brzozowski`] and [`minimize_atomic`] directly produce the minimal DFA. The
//! DFA returned by [`minimize`] only consists of states reachable from the initial state,
//! whichever algorithm is used, so all five agree on it up to renaming of states.
//!
//! Every algorithm exists in a variant that reports its progress to an [`Observer`]. The
//! plain variants use the [`TracingObserver`], which emits `trace` level events.
use std::{fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{math::Partition, prelude::*};

mod atomic;
pub use atomic::{minimize_atomic, minimize_atomic_observed};

mod brzozowski;
pub use brzozowski::minimize_brzozowski;

mod hopcroft;
pub use hopcroft::{minimize_hopcroft, minimize_hopcroft_observed};

mod hybrid;
pub use hybrid::{minimize_hybrid, minimize_hybrid_observed};

mod incremental;
pub use incremental::{minimize_incremental, minimize_incremental_observed};

mod pairs;

mod synthesis;
pub use synthesis::synthesize;

/// The available minimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// Hopcroft's partition refinement, see [`minimize_hopcroft`].
    Hopcroft,
    /// Double reversal and determinization, see [`minimize_brzozowski`].
    Brzozowski,
    /// Pairwise equivalence testing, see [`minimize_incremental`].
    Incremental,
    /// Pairwise testing combined with partition refinement, see [`minimize_hybrid`].
    Hybrid,
    /// Inverse image replication, see [`minimize_atomic`].
    Atomic,
}

impl Algorithm {
    /// All algorithms in a fixed order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Hopcroft,
        Algorithm::Brzozowski,
        Algorithm::Incremental,
        Algorithm::Hybrid,
        Algorithm::Atomic,
    ];

    /// The lower case name of the algorithm, as accepted by [`Algorithm::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Hopcroft => "hopcroft",
            Algorithm::Brzozowski => "brzozowski",
            Algorithm::Incremental => "incremental",
            Algorithm::Hybrid => "hybrid",
            Algorithm::Atomic => "atomic",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MinimizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == name)
            .ok_or_else(|| MinimizationError::UnknownAlgorithm(s.to_string()))
    }
}

/// Errors that occur during minimization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinimizationError {
    /// The automaton has no final state, every algorithm requires at least one.
    #[error("automaton has no final states")]
    NoFinalStates,
    /// The given name does not denote an [`Algorithm`].
    #[error("unknown minimization algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// An intermediate automaton could not be built.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

pub(crate) fn ensure_final_states(dfa: &Dfa) -> Result<(), MinimizationError> {
    if dfa.final_states().is_empty() {
        Err(MinimizationError::NoFinalStates)
    } else {
        Ok(())
    }
}

/// The DFA with a single state that rejects every word.
pub(crate) fn rejecting(alphabet: usize) -> Dfa {
    let mut dfa = Dfa::allocate(alphabet, 1);
    dfa.set_initial(0, true);
    dfa
}

/// Receives the events of a running minimization algorithm. All methods do nothing by
/// default, so an implementation only has to provide the events it is interested in.
pub trait Observer {
    /// The states of `block` are used to split other blocks on `symbol`.
    fn splitter_chosen(&mut self, block: &[StateId], symbol: Symbol) {
        let _ = (block, symbol);
    }

    /// A block was split in two, `kept` retains the identity of the original block.
    fn block_split(&mut self, kept: &[StateId], split_off: &[StateId]) {
        let _ = (kept, split_off);
    }

    /// The states `p` and `q` were found to be equivalent or not.
    fn pair_resolved(&mut self, p: StateId, q: StateId, equivalent: bool) {
        let _ = (p, q, equivalent);
    }
}

/// Ignores all events.
impl Observer for () {}

/// Forwards all events to [`tracing`] at the `trace` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn splitter_chosen(&mut self, block: &[StateId], symbol: Symbol) {
        trace!("splitter {block:?} on symbol {symbol}");
    }

    fn block_split(&mut self, kept: &[StateId], split_off: &[StateId]) {
        trace!("split block into {kept:?} and {split_off:?}");
    }

    fn pair_resolved(&mut self, p: StateId, q: StateId, equivalent: bool) {
        if equivalent {
            trace!("states {p} and {q} are equivalent");
        } else {
            trace!("states {p} and {q} are distinguishable");
        }
    }
}

/// Minimizes `dfa` with the given algorithm, see [`minimize_observed`].
pub fn minimize(dfa: &Dfa, algorithm: Algorithm) -> Result<Dfa, MinimizationError> {
    minimize_observed(dfa, algorithm, &mut TracingObserver)
}

/// Minimizes `dfa` with the given algorithm and reports its progress to `observer`.
/// Brzozowski's algorithm emits no events.
pub fn minimize_observed<O: Observer>(
    dfa: &Dfa,
    algorithm: Algorithm,
    observer: &mut O,
) -> Result<Dfa, MinimizationError> {
    let quotient = |partition: Partition| reachable_quotient(dfa, &partition);
    let minimal = match algorithm {
        Algorithm::Hopcroft => minimize_hopcroft_observed(dfa, observer).map(quotient)?,
        Algorithm::Brzozowski => minimize_brzozowski(dfa)?,
        Algorithm::Incremental => minimize_incremental_observed(dfa, observer).map(quotient)?,
        Algorithm::Hybrid => minimize_hybrid_observed(dfa, observer).map(quotient)?,
        Algorithm::Atomic => minimize_atomic_observed(dfa, observer)?,
    };
    debug!(
        "{algorithm} minimized {} states to {}",
        dfa.state_count(),
        minimal.state_count()
    );
    Ok(minimal)
}

/// The part of the quotient of `dfa` by `partition` that is reachable from the initial
/// state. Blocks consisting of unreachable states only are dropped.
fn reachable_quotient(dfa: &Dfa, partition: &Partition) -> Dfa {
    let quotient = synthesize(dfa, partition).restrict_to_reachable();
    if quotient.state_count() < partition.size() {
        debug!(
            "dropped {} unreachable classes",
            partition.size() - quotient.state_count()
        );
    }
    if quotient.state_count() == 0 {
        rejecting(dfa.alphabet_size())
    } else {
        quotient
    }
}

/// Runs every algorithm on `dfa`, each on its own thread, and returns the results in the order
/// of [`Algorithm::ALL`].
pub fn cross_validate(dfa: &Dfa) -> Vec<(Algorithm, Result<Dfa, MinimizationError>)> {
    std::thread::scope(|scope| {
        let handles = Algorithm::ALL
            .into_iter()
            .map(|algorithm| (algorithm, scope.spawn(move || minimize(dfa, algorithm))))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|(algorithm, handle)| match handle.join() {
                Ok(result) => (algorithm, result),
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

impl Dfa {
    /// Computes the minimal DFA for the language of `self` with Hopcroft's algorithm.
    pub fn minimize(&self) -> Result<Dfa, MinimizationError> {
        minimize(self, Algorithm::Hopcroft)
    }

    /// Computes the minimal DFA for the language of `self` with the given algorithm.
    pub fn minimize_with(&self, algorithm: Algorithm) -> Result<Dfa, MinimizationError> {
        minimize(self, algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn four_states() -> Dfa {
        Dfa::from_parts(
            2,
            4,
            [0],
            [3],
            [
                (0, 0, 1),
                (0, 1, 2),
                (1, 0, 3),
                (1, 1, 1),
                (2, 0, 3),
                (2, 1, 2),
                (3, 0, 3),
                (3, 1, 3),
            ],
        )
        .unwrap()
    }

    /// Three chains of length three leave state 1, one per symbol, each ending in its own
    /// final state. Transitions that are not listed lead to the sink 0.
    pub(crate) fn bridge() -> Dfa {
        Dfa::from_parts(
            3,
            14,
            [1],
            [11, 12, 13],
            [
                (1, 0, 2),
                (1, 1, 3),
                (1, 2, 4),
                (2, 0, 5),
                (3, 0, 6),
                (4, 0, 7),
                (5, 0, 8),
                (6, 1, 9),
                (7, 2, 10),
                (8, 0, 11),
                (9, 1, 12),
                (10, 2, 13),
            ],
        )
        .unwrap()
    }

    /// The chains of [`bridge`] with additional links between them.
    pub(crate) fn crossed_bridge() -> Dfa {
        let mut transitions = vec![
            (1, 0, 2),
            (1, 1, 3),
            (1, 2, 4),
            (2, 0, 5),
            (3, 0, 6),
            (4, 0, 7),
            (5, 0, 8),
            (5, 1, 9),
            (5, 2, 9),
            (6, 1, 9),
            (6, 0, 10),
            (6, 2, 10),
            (9, 0, 11),
            (9, 1, 12),
            (9, 2, 13),
        ];
        for a in 0..3 {
            transitions.extend([(7, a, 10), (8, a, 11), (10, a, 13)]);
        }
        Dfa::from_parts(3, 14, [1], [11, 12, 13], transitions).unwrap()
    }

    /// State 2 is final but cannot be reached, and its only edge leads back to the start.
    pub(crate) fn unreachable_final() -> Dfa {
        Dfa::from_parts(1, 3, [0], [1, 2], [(0, 0, 1), (1, 0, 1), (2, 0, 0)]).unwrap()
    }

    macro_rules! algorithm_tests {
        ($($name:ident => $algorithm:expr),* $(,)?) => {
            paste::paste! {
                $(
                    #[test_log::test]
                    fn [<$name _merges_equivalent_branches>]() {
                        let minimal = minimize(&four_states(), $algorithm).unwrap();
                        assert_eq!(minimal.state_count(), 3);
                        assert!(minimal.is_isomorphic_to(&four_states().minimize().unwrap()));
                    }

                    #[test]
                    fn [<$name _keeps_distinct_chains>]() {
                        assert_eq!(minimize(&bridge(), $algorithm).unwrap().state_count(), 12);
                    }

                    #[test]
                    fn [<$name _collapses_cross_links>]() {
                        assert_eq!(
                            minimize(&crossed_bridge(), $algorithm).unwrap().state_count(),
                            6
                        );
                    }

                    #[test]
                    fn [<$name _is_idempotent>]() {
                        for dfa in [four_states(), bridge(), crossed_bridge()] {
                            let once = minimize(&dfa, $algorithm).unwrap();
                            let twice = minimize(&once, $algorithm).unwrap();
                            assert_eq!(once.state_count(), twice.state_count());
                            assert!(once.is_isomorphic_to(&twice));
                        }
                    }

                    #[test]
                    fn [<$name _drops_unreachable_states>]() {
                        let minimal = minimize(&unreachable_final(), $algorithm).unwrap();
                        assert_eq!(minimal.state_count(), 2);
                        assert_eq!(minimal.initial_states().count(), 1);
                        assert!(minimal.accepts([0]));
                        assert!(minimal.accepts([0, 0]));
                        assert!(!minimal.accepts([]));
                    }

                    #[test]
                    fn [<$name _requires_final_states>]() {
                        let mut dfa = four_states();
                        dfa.set_final(3, false);
                        assert_eq!(
                            minimize(&dfa, $algorithm),
                            Err(MinimizationError::NoFinalStates)
                        );
                    }
                )*
            }
        };
    }

    algorithm_tests! {
        hopcroft => Algorithm::Hopcroft,
        brzozowski => Algorithm::Brzozowski,
        incremental => Algorithm::Incremental,
        hybrid => Algorithm::Hybrid,
        atomic => Algorithm::Atomic,
    }

    #[test]
    fn algorithm_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!("Hybrid".parse::<Algorithm>(), Ok(Algorithm::Hybrid));
        assert_eq!(
            "moore".parse::<Algorithm>(),
            Err(MinimizationError::UnknownAlgorithm("moore".to_string()))
        );
    }

    #[test]
    fn partitions_agree() {
        for dfa in [four_states(), bridge(), crossed_bridge(), unreachable_final()] {
            let hopcroft = minimize_hopcroft(&dfa).unwrap();
            assert_eq!(minimize_incremental(&dfa).unwrap(), hopcroft);
            assert_eq!(minimize_hybrid(&dfa).unwrap(), hopcroft);
        }
        // unreachable states are still classified
        assert_eq!(minimize_hopcroft(&unreachable_final()).unwrap().size(), 3);
    }

    #[test]
    fn unreachable_states_do_not_change_the_result() {
        let results = cross_validate(&unreachable_final());
        let expected = minimize_brzozowski(&unreachable_final()).unwrap();
        for (algorithm, result) in results {
            let minimal = result.unwrap();
            assert_eq!(minimal.state_count(), 2, "{algorithm}");
            assert!(minimal.is_isomorphic_to(&expected), "{algorithm}");
        }
    }

    #[cfg(feature = "random")]
    #[test]
    fn arbitrary_transition_tables_agree() {
        let mut rng = fastrand::Rng::with_seed(0x7ab1e);
        for _ in 0..200 {
            let states = rng.usize(1..=12);
            let alphabet = rng.usize(1..=3);
            let mut transitions = vec![];
            for source in 0..states {
                for symbol in 0..alphabet {
                    transitions.push((source, symbol, rng.usize(..states)));
                }
            }
            let mut finals = (0..states).filter(|_| rng.bool()).collect::<Vec<_>>();
            if finals.is_empty() {
                finals.push(rng.usize(..states));
            }
            let initial = rng.usize(..states);
            let dfa = Dfa::from_parts(alphabet, states, [initial], finals, transitions).unwrap();

            let hopcroft = minimize_hopcroft(&dfa).unwrap();
            assert_eq!(minimize_incremental(&dfa).unwrap(), hopcroft, "{dfa:?}");
            assert_eq!(minimize_hybrid(&dfa).unwrap(), hopcroft, "{dfa:?}");

            let expected = minimize_brzozowski(&dfa).unwrap();
            for (algorithm, result) in cross_validate(&dfa) {
                let minimal = result.unwrap();
                assert_eq!(
                    minimal.state_count(),
                    expected.state_count(),
                    "{algorithm} disagrees on {dfa:?}"
                );
                assert!(minimal.is_isomorphic_to(&expected), "{algorithm}");
            }
        }
    }

    #[test_log::test]
    fn cross_validation_runs_every_algorithm() {
        let results = cross_validate(&crossed_bridge());
        assert_eq!(
            results.iter().map(|(algorithm, _)| *algorithm).collect::<Vec<_>>(),
            Algorithm::ALL.to_vec()
        );
        for (_, result) in results {
            assert_eq!(result.unwrap().state_count(), 6);
        }
    }

    #[cfg(feature = "random")]
    #[test_log::test]
    fn random_automata_agree_and_keep_their_language() {
        use crate::random::{generate_random_dfa, generate_random_word};

        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..40 {
            let dfa = generate_random_dfa(&mut rng, 3, 25, 0.4);
            let minimal = dfa.minimize().unwrap();
            for (algorithm, result) in cross_validate(&dfa) {
                let other = result.unwrap();
                assert_eq!(
                    other.state_count(),
                    minimal.state_count(),
                    "{algorithm} disagrees on {dfa:?}"
                );
                assert!(other.is_isomorphic_to(&minimal), "{algorithm}");
            }
            for _ in 0..50 {
                let word = generate_random_word(&mut rng, 3, 0, 12);
                assert_eq!(
                    minimal.accepts(word.iter().copied()),
                    dfa.accepts(word.iter().copied())
                );
            }
        }
    }
}
