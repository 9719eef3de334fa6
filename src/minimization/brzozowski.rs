use tracing::debug;

use super::{ensure_final_states, rejecting, MinimizationError};
use crate::{determinization::determinize, prelude::*};

/// Minimizes `dfa` with Brzozowski's algorithm: reversing and determinizing twice.
///
/// Determinizing the reversal of an automaton in which every state is reachable yields a DFA
/// in which no two states are equivalent; doing it twice therefore produces the minimal DFA
/// for the language of `dfa`, restricted to its reachable states. The intermediate automaton
/// can be exponentially larger than `dfa`.
pub fn minimize_brzozowski(dfa: &Dfa) -> Result<Dfa, MinimizationError> {
    ensure_final_states(dfa)?;
    let backwards = determinize(&dfa.reversed())?;
    debug!(
        "reverse determinization of {} states yields {} states",
        dfa.state_count(),
        backwards.state_count()
    );
    let minimal = determinize(&backwards.reversed())?;
    if minimal.state_count() == 0 {
        return Ok(rejecting(dfa.alphabet_size()));
    }
    Ok(minimal)
}
