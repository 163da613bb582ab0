use std::fmt::{Display, Formatter};

use clap::ArgEnum;
use itertools::Itertools;

use descentparse::{Derivation, Rejection, Trace, Tree};

use crate::visualization::tree::{to_dot, to_indented, to_pretty};

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `(S (NP (det the) (n dog)) ...)`
    Bracket,
    /// One label per line, indented by depth.
    Indent,
    /// Labels drawn top-down, centered over their children.
    Pretty,
    Json,
    /// Graphviz source.
    Dot,
}

pub fn render(tree: &Tree<String>, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Bracket => tree.to_string(),
        Format::Indent => to_indented(tree),
        Format::Pretty => to_pretty(tree),
        Format::Json => serde_json::to_string_pretty(tree)?,
        Format::Dot => to_dot(tree),
    })
}

/// The verdict for one sentence, followed by the tree or the reason it was
/// rejected. With `verbose`, every diagnostic recorded while matching.
pub fn verdict(
    sentence: &str,
    outcome: &Result<Derivation, Rejection>,
    trace: &Trace,
    format: Format,
    verbose: bool,
) -> anyhow::Result<String> {
    let mut lines = Vec::new();
    match outcome {
        Ok(derivation) => {
            lines.push(format!("Accepted: {}", sentence));
            lines.push(render(&derivation.tree, format)?);
        }
        Err(rejection) => {
            lines.push(format!(
                "Rejected: {} (index: {}, token length: {})",
                sentence, rejection.position, rejection.token_count
            ));
            lines.push(format!("  {}", rejection.reason));
            if !rejection.expected.is_empty() {
                lines.push(format!("  expected: {}", rejection.expected.iter().join(" | ")));
            }
        }
    }
    if verbose && !trace.diagnostics().is_empty() {
        lines.push("  diagnostics:".to_string());
        lines.extend(trace.diagnostics().iter().map(|d| format!("    {}", d)));
    }
    Ok(lines.join("\n"))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub accepted: usize,
    pub rejected: usize,
    pub incomplete: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &Result<Derivation, Rejection>) {
        match outcome {
            Ok(_) => self.accepted += 1,
            Err(rejection) => {
                self.rejected += 1;
                if rejection.is_incomplete() {
                    self.incomplete += 1;
                }
            }
        }
    }

    pub fn sentences(&self) -> usize {
        self.accepted + self.rejected
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "         Sentences: {}", self.sentences())?;
        writeln!(f, "          Accepted: {}", self.accepted)?;
        writeln!(f, "          Rejected: {}", self.rejected)?;
        write!(f, "Tokens left unread: {}", self.incomplete)
    }
}
