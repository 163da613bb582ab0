use std::fmt::{Display, Formatter};

use itertools::Itertools;
use smallvec::SmallVec;

/// One alternative right-hand side of a rule: `lhs -> rhs[0] rhs[1] ...`.
///
/// Symbols are bare names. Whether a symbol is a part-of-speech tag or a
/// non-terminal is only decided while matching, against the lexicon and the
/// rule table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: String,
    pub rhs: SmallVec<[String; 6]>,
}

impl Production {
    pub fn new<I, S>(lhs: impl Into<String>, rhs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// Rule files never yield an empty alternative; see `read_production`.
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.rhs.iter().map(String::as_str)
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs.iter().join(" "))
    }
}
