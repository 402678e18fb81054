//! Rule database: convention lookup and context-aware resolution.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogEntry, DEFAULT_PATTERN};
use crate::kind::NodeKind;

/// Errors from building a [`RuleDb`].
///
/// Any of these makes the whole rule set unusable, so a failed build
/// aborts the run before any file is checked.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A style override names a convention that does not exist.
    #[error("'{name}' is not a valid convention name{}", .suggestion.as_deref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
    UnknownConvention {
        /// The offending style-file key.
        name: String,
        /// Closest catalog name by edit distance, when one is near enough.
        suggestion: Option<String>,
    },

    /// A style override pattern failed to compile.
    #[error("pattern for '{convention}' is invalid: {source}")]
    InvalidPattern {
        /// Convention whose override failed.
        convention: String,
        /// Compiler diagnostic from the regex engine.
        #[source]
        source: regex::Error,
    },
}

/// A compiled naming rule for one convention.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    kind: NodeKind,
    parent: Option<NodeKind>,
    pattern: Regex,
    pattern_str: String,
}

impl Rule {
    fn compile(entry: &CatalogEntry, pattern_str: &str) -> Result<Self, RulesError> {
        // Matching is anchored at the start of the spelling; the reported
        // pattern string stays exactly as the user wrote it.
        let anchored = format!("^(?:{pattern_str})");
        let pattern = Regex::new(&anchored).map_err(|source| RulesError::InvalidPattern {
            convention: entry.name.to_string(),
            source,
        })?;
        Ok(Self {
            name: entry.name,
            kind: entry.kind,
            parent: entry.parent,
            pattern,
            pattern_str: pattern_str.to_string(),
        })
    }

    /// Convention name this rule enforces.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Node kind this rule targets.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Required enclosing structural kind, if any.
    #[must_use]
    pub fn parent(&self) -> Option<NodeKind> {
        self.parent
    }

    /// The pattern as configured (or the default), for diagnostics.
    #[must_use]
    pub fn pattern_str(&self) -> &str {
        &self.pattern_str
    }

    /// Whether `spelling` satisfies this rule's pattern.
    #[must_use]
    pub fn matches(&self, spelling: &str) -> bool {
        self.pattern.is_match(spelling)
    }
}

/// Immutable rule database built from the catalog plus optional style
/// overrides.
///
/// Holds two lookup structures: convention name to [`Rule`], and node
/// kind to the ordered list of convention names targeting that kind.
/// Never mutated after build, so shared reads across threads are safe.
#[derive(Debug)]
pub struct RuleDb {
    rules: HashMap<&'static str, Rule>,
    by_kind: HashMap<NodeKind, Vec<&'static str>>,
}

impl RuleDb {
    /// Builds the database from `catalog`, applying `overrides` where
    /// given. Every catalog convention stays active; unconfigured ones
    /// keep the default match-anything pattern.
    ///
    /// # Errors
    ///
    /// Fails fast on an unknown override key or an invalid pattern; no
    /// partial database survives a failed build.
    pub fn build(
        catalog: &Catalog,
        overrides: Option<&BTreeMap<String, String>>,
    ) -> Result<Self, RulesError> {
        if let Some(patterns) = overrides {
            for name in patterns.keys() {
                if !catalog.contains(name) {
                    return Err(RulesError::UnknownConvention {
                        name: name.clone(),
                        suggestion: closest_name(catalog, name),
                    });
                }
            }
        }

        let mut rules = HashMap::new();
        let mut by_kind: HashMap<NodeKind, Vec<&'static str>> = HashMap::new();

        for entry in catalog.entries() {
            let pattern_str = overrides
                .and_then(|p| p.get(entry.name))
                .map_or(DEFAULT_PATTERN, String::as_str);
            let rule = Rule::compile(entry, pattern_str)?;
            by_kind.entry(entry.kind).or_default().push(entry.name);
            rules.insert(entry.name, rule);
        }

        debug!(
            conventions = rules.len(),
            overridden = overrides.map_or(0, BTreeMap::len),
            "rule database built"
        );
        Ok(Self { rules, by_kind })
    }

    /// Resolves the convention governing a node of `kind` under the given
    /// scope top.
    ///
    /// A kind with no convention is simply unchecked. A single-candidate
    /// bucket fires unconditionally. An ambiguous bucket is scanned in
    /// registration order for a parent constraint equal to `scope_top`;
    /// when none matches, the first registered candidate is the default.
    #[must_use]
    pub fn resolve(&self, kind: NodeKind, scope_top: Option<NodeKind>) -> Option<&Rule> {
        let candidates = self.by_kind.get(&kind)?;
        if let [only] = candidates.as_slice() {
            return self.rules.get(only);
        }
        candidates
            .iter()
            .find(|name| {
                self.rules
                    .get(*name)
                    .is_some_and(|rule| rule.parent() == scope_top)
            })
            .or_else(|| candidates.first())
            .and_then(|name| self.rules.get(name))
    }

    /// Looks up a rule by convention name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Number of active conventions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the database holds no conventions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Closest catalog name by edit distance, used for typo suggestions.
/// Suggests only when the distance is small relative to the name length.
fn closest_name(catalog: &Catalog, input: &str) -> Option<String> {
    catalog
        .names()
        .map(|name| (levenshtein(input, name), name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, name)| distance * 2 <= name.len())
        .map(|(_, name)| name.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let substitution = previous_diagonal + usize::from(ca != cb);
            previous_diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(previous_diagonal + 1);
        }
    }

    row[b_chars.len()]
}
