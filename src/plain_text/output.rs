use std::io::Write;

use itertools::Itertools;

use crate::prelude::*;

/// Writes `automaton` in the plain text format with zero based indices. Transitions are
/// written in ascending order of source, symbol and target.
pub fn write_automaton<A: FiniteAutomaton, W: Write>(
    automaton: &A,
    mut writer: W,
) -> std::io::Result<()> {
    writeln!(writer, "# states")?;
    writeln!(writer, "{}", automaton.state_count())?;
    writeln!(writer, "# alphabet")?;
    writeln!(writer, "{}", automaton.alphabet_size())?;
    writeln!(writer, "# initial")?;
    writeln!(writer, "{}", automaton.initial_states().iter().join(" "))?;
    writeln!(writer, "# final")?;
    writeln!(writer, "{}", automaton.final_states().iter().join(" "))?;
    writeln!(writer, "# transitions")?;
    for (source, symbol, target) in automaton.transitions() {
        writeln!(writer, "{source} {symbol} {target}")?;
    }
    writer.flush()
}

/// Renders `automaton` in the plain text format.
pub fn to_plain_text<A: FiniteAutomaton>(automaton: &A) -> String {
    let mut buffer = Vec::new();
    // writing to a vector cannot fail
    let _ = write_automaton(automaton, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_in_order() {
        let mut dfa = Dfa::new(1, 2).unwrap();
        dfa.set_initial(0, true);
        dfa.set_transition(0, 0, 1);
        dfa.set_transition(1, 0, 1);
        assert_eq!(
            to_plain_text(&dfa),
            "# states\n2\n# alphabet\n1\n# initial\n0\n# final\n\n# transitions\n0 0 1\n1 0 1\n"
        );
    }
}
