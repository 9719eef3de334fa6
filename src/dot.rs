//! Export of automata to the DOT language of [graphviz](https://graphviz.org).
use std::fmt::Display;

use itertools::Itertools;

use crate::prelude::*;

/// Attributes that can be attached to a node.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The style of a node, such as `filled`
    Style(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{s}\""),
            DotStateAttribute::Style(s) => write!(f, "style=\"{s}\""),
        }
    }
}

/// Attributes that can be attached to an edge.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{lbl}\""),
        }
    }
}

/// Conversion of a [`FiniteAutomaton`] into a DOT graph.
///
/// Initial states are drawn filled, final states with a bold dashed outline. All transitions
/// between the same two states are merged into a single edge whose label lists the symbols.
pub trait Dottable: FiniteAutomaton {
    /// The name of the graph.
    fn dot_name(&self) -> String {
        "A".to_string()
    }

    /// The identifier of the node for `state`.
    fn dot_state_ident(&self, state: StateId) -> String {
        format!("s{state}")
    }

    /// The attributes of the node for `state`.
    fn dot_state_attributes(&self, state: StateId) -> Vec<DotStateAttribute> {
        let style = match (self.is_initial(state), self.is_final(state)) {
            (true, false) => Some("filled"),
            (false, true) => Some("bold,dashed"),
            (true, true) => Some("filled,bold,dashed"),
            (false, false) => None,
        };
        std::iter::once(DotStateAttribute::Label(state.to_string()))
            .chain(style.map(|s| DotStateAttribute::Style(s.to_string())))
            .collect()
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        dot_lines(self, false)
    }

    /// Like [`Dottable::dot_representation`], but leaves out state 0 and all edges touching
    /// it, unless it is initial or final. This hides the sink that unset transitions lead to.
    fn dot_representation_without_sink(&self) -> String {
        dot_lines(self, true)
    }

    /// Renders the automaton as PNG and returns the bytes of the image. This method is only
    /// available on the `graphviz` crate feature and requires the `dot` executable.
    #[cfg(feature = "graphviz")]
    fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        use std::{io::Write, process::Stdio};

        let dot = self.dot_representation();
        tracing::trace!("rendering dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::error!("could not render, dot reported\n{}", stderr);
            return Err(std::io::Error::other(stderr));
        }
        Ok(output.stdout)
    }

    /// Attempts to render the automaton to a PNG file with the given filename. This method
    /// is only available on the `graphviz` crate feature and makes use of temporary files.
    #[cfg(feature = "graphviz")]
    fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;

        tracing::trace!("writing dot representation and rendering to {filename}");
        let mut tempfile = tempfile::NamedTempFile::new()?;
        tempfile.write_all(self.dot_representation().as_bytes())?;
        tempfile.flush()?;

        let status = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile.path())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!(
                "dot process exited with status: {status}"
            )))
        }
    }
}

impl Dottable for Dfa {
    fn dot_name(&self) -> String {
        "DFA".to_string()
    }
}

impl Dottable for Nfa {
    fn dot_name(&self) -> String {
        "NFA".to_string()
    }
}

fn dot_lines<D: Dottable + ?Sized>(automaton: &D, hide_sink: bool) -> String {
    let hidden = |q: StateId| {
        hide_sink && q == 0 && !automaton.is_initial(0) && !automaton.is_final(0)
    };

    let header = [
        format!("digraph \"{}\" {{", automaton.dot_name()),
        "  rankdir=LR".to_string(),
        "  node [shape=box width=0.1 height=0.1 fontname=Arial]".to_string(),
        "  edge [fontname=Arial]".to_string(),
    ];

    let states = (0..automaton.state_count() as StateId)
        .filter(|q| !hidden(*q))
        .map(|q| {
            format!(
                "  {} [{}]",
                automaton.dot_state_ident(q),
                automaton
                    .dot_state_attributes(q)
                    .into_iter()
                    .map(|attr| attr.to_string())
                    .join(", ")
            )
        })
        .collect_vec();

    let transitions = automaton
        .transitions()
        .filter(|(source, _, target)| !hidden(*source) && !hidden(*target))
        .map(|(source, symbol, target)| ((source, target), symbol))
        .into_group_map()
        .into_iter()
        .sorted()
        .map(|((source, target), symbols)| {
            format!(
                "  {} -> {} [{}]",
                automaton.dot_state_ident(source),
                automaton.dot_state_ident(target),
                DotTransitionAttribute::Label(symbols.iter().join(", "))
            )
        })
        .collect_vec();

    header
        .into_iter()
        .chain(states)
        .chain(transitions)
        .chain(std::iter::once("}".to_string()))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::Dottable;
    use crate::prelude::*;

    fn sample() -> Dfa {
        Dfa::from_parts(2, 3, [1], [1, 2], [(1, 0, 2), (1, 1, 2), (2, 1, 1)]).unwrap()
    }

    #[test]
    fn styles_and_grouped_edges() {
        let dot = sample().dot_representation();
        assert!(dot.starts_with("digraph \"DFA\" {\n  rankdir=LR"));
        assert!(dot.contains("  s0 [label=\"0\"]\n"));
        assert!(dot.contains("  s1 [label=\"1\", style=\"filled,bold,dashed\"]"));
        assert!(dot.contains("  s2 [label=\"2\", style=\"bold,dashed\"]"));
        assert!(dot.contains("  s1 -> s2 [label=\"0, 1\"]"));
        assert!(dot.contains("  s0 -> s0 [label=\"0, 1\"]"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn sink_can_be_hidden() {
        let dot = sample().dot_representation_without_sink();
        assert!(!dot.contains("s0"));
        assert!(dot.contains("  s2 -> s1 [label=\"1\"]"));

        let mut initial_sink = sample();
        initial_sink.set_initial(0, true);
        assert!(initial_sink.dot_representation_without_sink().contains("s0 ["));
    }

    #[test_log::test]
    #[ignore]
    fn render_minimal_dfa() {
        sample()
            .minimize()
            .unwrap()
            .render_to_file_name("minimal.png")
            .unwrap();
    }
}
