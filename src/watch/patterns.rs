// src/watch/patterns.rs

use std::collections::HashSet;
use std::fmt;

use regex::RegexSet;

use crate::errors::{ConttestError, Result};

/// Compiled exclude patterns loaded from `.conttest-excludes`.
///
/// Each token is a regular expression applied with search semantics (it may
/// match anywhere in the text). Tokens are also kept verbatim so that a token
/// naming a top-level directory can prune that subtree during the walk.
#[derive(Clone)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    regexes: RegexSet,
    literals: HashSet<String>,
}

impl fmt::Debug for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl ExcludeSet {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            regexes: RegexSet::empty(),
            literals: HashSet::new(),
        }
    }

    /// Compile the given tokens.
    ///
    /// Fails on the first token that is not a valid regex; the offending
    /// token is reported in the error.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        // Compile one by one first so the error names the bad token;
        // `RegexSet::new` only reports the error text.
        for pat in &patterns {
            regex::Regex::new(pat).map_err(|source| ConttestError::InvalidExcludePattern {
                pattern: pat.clone(),
                source,
            })?;
        }

        let regexes = RegexSet::new(&patterns).map_err(|source| {
            ConttestError::InvalidExcludePattern {
                pattern: patterns.join(" "),
                source,
            }
        })?;
        let literals = patterns.iter().cloned().collect();

        Ok(Self {
            patterns,
            regexes,
            literals,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if any pattern is found anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regexes.is_match(text)
    }

    /// True if `name` is spelled exactly like one of the tokens.
    ///
    /// Used for directories directly under the watched root.
    pub fn names_dir(&self, name: &str) -> bool {
        self.literals.contains(name)
    }
}
