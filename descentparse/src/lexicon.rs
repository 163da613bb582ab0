use std::str::FromStr;

use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::error::GrammarError;

/// Word to part-of-speech mapping. Every word has exactly one tag; words are
/// stored lower-cased, in the order they were first loaded.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    words: IndexMap<String, String, FnvBuildHasher>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `word` to `tag`, replacing and returning any earlier tag.
    pub fn insert(&mut self, word: &str, tag: impl Into<String>) -> Option<String> {
        self.words.insert(word.to_lowercase(), tag.into())
    }

    pub fn tag(&self, word: &str) -> Option<&str> {
        self.words.get(word).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Whether any word carries `symbol` as its tag.
    pub fn is_tag(&self, symbol: &str) -> bool {
        self.words.values().any(|tag| tag == symbol)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.words.iter().map(|(w, t)| (w.as_str(), t.as_str()))
    }

    /// Words grouped under their tag, tags in order of first appearance.
    pub fn by_tag(&self) -> IndexMap<&str, Vec<&str>> {
        let mut tags: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (word, tag) in self.iter() {
            tags.entry(tag).or_default().push(word);
        }
        tags
    }

    /// Tokens the lexicon has no tag for, with their positions.
    pub fn uncovered<'t, T: AsRef<str>>(&self, tokens: &'t [T]) -> Vec<(usize, &'t str)> {
        tokens
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .filter(|(_, token)| !self.contains(token))
            .collect()
    }
}

impl FromStr for Lexicon {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_lexicon(s)
    }
}

/// Reads `TAG -> word1 | word2 | ...` lines. Lines without an arrow, and lines
/// starting with `#`, are skipped. A word listed under several tags keeps the
/// last one.
pub fn read_lexicon(input: &str) -> Result<Lexicon, GrammarError> {
    let mut lexicon = Lexicon::new();

    for (index, line) in input.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let (tag, words) = match line.split_once("->") {
            Some(parts) => parts,
            None => continue,
        };
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(GrammarError::MalformedEntry {
                line: index + 1,
                reason: "no tag before the arrow",
            });
        }
        for word in words.split('|').map(str::trim).filter(|w| !w.is_empty()) {
            lexicon.insert(word, tag);
        }
    }

    Ok(lexicon)
}

/// Lower-cases `sentence` and splits it on whitespace.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_lexicon() {
        let lexicon: Lexicon = "det -> the | a\nn -> people | Dog\n".parse().unwrap();
        assert_eq!(lexicon.len(), 4);
        assert_eq!(lexicon.tag("the"), Some("det"));
        assert_eq!(lexicon.tag("dog"), Some("n"));
        assert_eq!(lexicon.tag("Dog"), None);
        assert!(lexicon.is_tag("n"));
        assert!(!lexicon.is_tag("v"));
    }

    #[test]
    fn test_last_tag_wins() {
        let lexicon = read_lexicon("n -> walk\nv -> walk | run").unwrap();
        assert_eq!(lexicon.tag("walk"), Some("v"));
        assert!(!lexicon.is_tag("n"));
    }

    #[test]
    fn test_skips_lines() {
        let lexicon = read_lexicon("# det -> the\nnothing here\n\nadj -> white | | black").unwrap();
        assert_eq!(lexicon.len(), 2);
        assert!(!lexicon.contains(""));
    }

    #[test]
    fn test_missing_tag() {
        assert_eq!(
            read_lexicon("det -> the\n -> dog").unwrap_err(),
            GrammarError::MalformedEntry {
                line: 2,
                reason: "no tag before the arrow"
            }
        );
    }

    #[test]
    fn test_by_tag() {
        let lexicon = read_lexicon("det -> the | a\nn -> dog").unwrap();
        let tags = lexicon.by_tag();
        assert_eq!(tags.get("det"), Some(&vec!["the", "a"]));
        assert_eq!(tags.keys().copied().collect::<Vec<_>>(), vec!["det", "n"]);
    }

    #[test]
    fn test_uncovered() {
        let lexicon = read_lexicon("det -> the\nn -> dog").unwrap();
        let tokens = tokenize("The cat chased the dog");
        assert_eq!(lexicon.uncovered(&tokens), vec![(1, "cat"), (2, "chased")]);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("  The People\tlike the DOG \n"),
            vec!["the", "people", "like", "the", "dog"]
        );
        assert!(tokenize("   ").is_empty());
    }
}
