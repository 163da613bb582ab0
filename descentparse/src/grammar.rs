use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};

use crate::error::GrammarError;
use crate::lexicon::Lexicon;
use crate::production::Production;

/// Rule table: each non-terminal maps to its alternatives, in the order they
/// are tried.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grammar {
    rules: IndexMap<String, Vec<Production>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alternatives of `lhs`, replacing any earlier rule for it.
    pub fn insert(&mut self, lhs: impl Into<String>, alternatives: Vec<Production>) {
        self.rules.insert(lhs.into(), alternatives);
    }

    pub fn alternatives(&self, symbol: &str) -> Option<&[Production]> {
        self.rules.get(symbol).map(Vec::as_slice)
    }

    /// The alternatives of `symbol` together with the table's own copy of its name.
    pub(crate) fn rule(&self, symbol: &str) -> Option<(&str, &[Production])> {
        self.rules
            .get_key_value(symbol)
            .map(|(lhs, alternatives)| (lhs.as_str(), alternatives.as_slice()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    /// Number of non-terminals.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The left-hand side of the first rule loaded.
    pub fn first_symbol(&self) -> Option<&str> {
        self.rules.keys().next().map(String::as_str)
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.keys().map(String::as_str)
    }

    pub fn productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.rules.values().flatten()
    }

    /// Symbols used in a rule body that are neither non-terminals nor tags of
    /// `lexicon`. Matching never succeeds on them.
    pub fn undefined_symbols(&self, lexicon: &Lexicon) -> Vec<&str> {
        self.productions()
            .flat_map(Production::symbols)
            .filter(|symbol| !self.contains(symbol) && !lexicon.is_tag(symbol))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn check_start(&self, start: &str) -> Result<(), GrammarError> {
        if self.is_empty() {
            return Err(GrammarError::Empty);
        }
        if !self.contains(start) {
            return Err(GrammarError::MissingStart(start.to_string()));
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_grammar(s)
    }
}

fn eat_arrow(line: &str) -> Option<(&str, &str)> {
    line.split_once("->")
}

/// Reads one `LHS -> A B | C D` line into its alternatives. Returns `Ok(None)`
/// when the line holds no rule. Every alternative must name at least one
/// symbol, so each rule application covers at least one token.
pub fn read_production(line: &str) -> Result<Option<Vec<Production>>, &'static str> {
    if line.trim_start().starts_with('#') {
        return Ok(None);
    }
    let (lhs, rhs) = match eat_arrow(line) {
        Some(parts) => parts,
        None => return Ok(None),
    };

    let lhs = lhs.trim();
    if lhs.is_empty() {
        return Err("no symbol before the arrow");
    }
    if lhs.split_whitespace().nth(1).is_some() {
        return Err("more than one symbol before the arrow");
    }

    let productions: Vec<_> = rhs
        .split('|')
        .map(|option| Production::new(lhs, option.split_whitespace()))
        .collect();
    if productions.iter().any(Production::is_empty) {
        return Err("empty alternative");
    }
    Ok(Some(productions))
}

/// Reads a whole rule file. A later line for the same left-hand side replaces
/// the earlier one.
pub fn read_grammar(input: &str) -> Result<Grammar, GrammarError> {
    let mut grammar = Grammar::new();

    for (index, line) in input.lines().enumerate() {
        let productions = read_production(line).map_err(|reason| GrammarError::MalformedRule {
            line: index + 1,
            reason,
        })?;
        if let Some(productions) = productions {
            let lhs = productions[0].lhs.clone();
            grammar.insert(lhs, productions);
        }
    }

    if grammar.is_empty() {
        return Err(GrammarError::Empty);
    }

    Ok(grammar)
}
