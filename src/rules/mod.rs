//! Sequence rule registry
//!
//! A [`Registry`] is an immutable, ordered catalog of named sequence
//! generators. Order matters: daily selection indexes into it, so any change
//! to content or order must come with a new catalog version.

mod catalog;

pub use catalog::{CATALOG_VERSION, builtin_rules};

use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

/// Generator signature: requested length to terms, `None` on arithmetic overflow
pub type Generator = fn(usize) -> Option<Vec<i64>>;

/// Catalog grouping of a rule
///
/// Purely organisational, except that the daily selector perturbs
/// arithmetic- and polynomial-family sequences differently when a base
/// sequence is not playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Polynomial,
    Arithmetic,
    Geometric,
    Recursive,
    Figurate,
    Special,
    Modular,
    Alternating,
    Digit,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Polynomial => "polynomial",
            Self::Arithmetic => "arithmetic",
            Self::Geometric => "geometric",
            Self::Recursive => "recursive",
            Self::Figurate => "figurate",
            Self::Special => "special",
            Self::Modular => "modular",
            Self::Alternating => "alternating",
            Self::Digit => "digit",
        };
        f.write_str(name)
    }
}

/// Errors raised by rules and the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("unknown rule '{0}'")]
    NotFound(String),
    #[error("rule '{0}' is registered more than once")]
    DuplicateRule(String),
    #[error("rule '{rule}' only supports up to {max} terms, {requested} requested")]
    TableExhausted {
        rule: &'static str,
        max: usize,
        requested: usize,
    },
    #[error("rule '{rule}' overflows at length {len}")]
    Overflow { rule: &'static str, len: usize },
    #[error("no rule in the catalog is eligible for daily selection")]
    EmptyPool,
}

/// A named pure generator of an integer sequence
#[derive(Clone)]
pub struct SequenceRule {
    name: &'static str,
    family: Family,
    description: &'static str,
    generator: Generator,
    max_len: Option<usize>,
}

impl SequenceRule {
    #[must_use]
    pub const fn new(
        name: &'static str,
        family: Family,
        description: &'static str,
        generator: Generator,
    ) -> Self {
        Self {
            name,
            family,
            description,
            generator,
            max_len: None,
        }
    }

    /// Declare the longest sequence a table-backed generator can produce
    #[must_use]
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn family(&self) -> Family {
        self.family
    }

    #[inline]
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    #[inline]
    #[must_use]
    pub const fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Generate the first `len` terms
    ///
    /// # Errors
    /// - `RuleError::TableExhausted` if `len` exceeds the declared maximum
    /// - `RuleError::Overflow` if a term does not fit in an `i64`
    pub fn generate(&self, len: usize) -> Result<Vec<i64>, RuleError> {
        if let Some(max) = self.max_len
            && len > max
        {
            return Err(RuleError::TableExhausted {
                rule: self.name,
                max,
                requested: len,
            });
        }

        match (self.generator)(len) {
            Some(terms) if terms.len() == len => Ok(terms),
            _ => Err(RuleError::Overflow {
                rule: self.name,
                len,
            }),
        }
    }
}

impl fmt::Debug for SequenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceRule")
            .field("name", &self.name)
            .field("family", &self.family)
            .field("max_len", &self.max_len)
            .finish_non_exhaustive()
    }
}

/// Immutable, index-addressable catalog of rules
#[derive(Debug, Clone)]
pub struct Registry {
    version: String,
    rules: Vec<SequenceRule>,
    by_name: FxHashMap<&'static str, usize>,
}

impl Registry {
    /// Build a registry from an ordered list of rules
    ///
    /// # Errors
    /// Returns `RuleError::DuplicateRule` if two rules share a name.
    pub fn new(version: impl Into<String>, rules: Vec<SequenceRule>) -> Result<Self, RuleError> {
        let mut by_name = FxHashMap::default();
        for (index, rule) in rules.iter().enumerate() {
            if by_name.insert(rule.name, index).is_some() {
                return Err(RuleError::DuplicateRule(rule.name.to_string()));
            }
        }

        Ok(Self {
            version: version.into(),
            rules,
            by_name,
        })
    }

    /// The built-in catalog at [`CATALOG_VERSION`]
    ///
    /// # Errors
    /// Returns an error only if the built-in catalog is inconsistent.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(CATALOG_VERSION, builtin_rules())
    }

    /// Catalog version embedded in puzzle ids
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All rules in catalog order
    #[must_use]
    pub fn all(&self) -> &[SequenceRule] {
        &self.rules
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SequenceRule> {
        self.rules.get(index)
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&SequenceRule> {
        self.by_name.get(name).map(|&i| &self.rules[i])
    }

    /// Like [`Registry::lookup`] but a missing rule is an error
    ///
    /// # Errors
    /// Returns `RuleError::NotFound` for unknown names.
    pub fn require(&self, name: &str) -> Result<&SequenceRule, RuleError> {
        self.lookup(name)
            .ok_or_else(|| RuleError::NotFound(name.to_string()))
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naturals(len: usize) -> Option<Vec<i64>> {
        Some((1..=len as i64).collect())
    }

    fn broken(_len: usize) -> Option<Vec<i64>> {
        None
    }

    #[test]
    fn builtin_catalog_is_consistent() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.version(), CATALOG_VERSION);
        assert!(registry.len() >= 40, "catalog has {} rules", registry.len());
    }

    #[test]
    fn lookup_by_name_and_index_agree() {
        let registry = Registry::builtin().unwrap();
        for (i, rule) in registry.all().iter().enumerate() {
            assert_eq!(registry.index_of(rule.name()), Some(i));
            assert_eq!(registry.lookup(rule.name()).unwrap().name(), rule.name());
        }
    }

    #[test]
    fn require_unknown_rule_fails() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(
            registry.require("no_such_rule").unwrap_err(),
            RuleError::NotFound("no_such_rule".to_string())
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let rules = vec![
            SequenceRule::new("naturals", Family::Arithmetic, "1, 2, 3", naturals),
            SequenceRule::new("naturals", Family::Arithmetic, "again", naturals),
        ];
        assert_eq!(
            Registry::new("test", rules).unwrap_err(),
            RuleError::DuplicateRule("naturals".to_string())
        );
    }

    #[test]
    fn table_limit_enforced() {
        let rule = SequenceRule::new("short", Family::Special, "short table", naturals)
            .with_max_len(3);
        assert_eq!(rule.generate(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            rule.generate(4).unwrap_err(),
            RuleError::TableExhausted {
                rule: "short",
                max: 3,
                requested: 4
            }
        );
    }

    #[test]
    fn overflow_reported() {
        let rule = SequenceRule::new("broken", Family::Special, "always overflows", broken);
        assert_eq!(
            rule.generate(7).unwrap_err(),
            RuleError::Overflow {
                rule: "broken",
                len: 7
            }
        );
    }

    #[test]
    fn generators_are_deterministic_and_exact_length() {
        let registry = Registry::builtin().unwrap();
        for rule in registry.all() {
            for len in 1..=7 {
                let Ok(first) = rule.generate(len) else {
                    continue;
                };
                assert_eq!(first.len(), len, "rule {}", rule.name());
                assert_eq!(rule.generate(len).unwrap(), first, "rule {}", rule.name());
            }
        }
    }

    #[test]
    fn longer_sequences_extend_shorter_ones() {
        let registry = Registry::builtin().unwrap();
        for rule in registry.all() {
            if let (Ok(short), Ok(long)) = (rule.generate(5), rule.generate(9)) {
                assert_eq!(&long[..5], short.as_slice(), "rule {}", rule.name());
            }
        }
    }
}
