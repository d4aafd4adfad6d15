//! Deterministic daily rule selection

use super::{PuzzleError, PuzzleId, hash_code};
use crate::rules::{Family, Registry, RuleError, SequenceRule};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Upper bound on perturbations tried for an unplayable base sequence
pub const MAX_VARIATION_ATTEMPTS: usize = 10;

const UNKNOWN_RULE: &str = "Unknown rule";

/// Limits how many large-magnitude terms a daily sequence may contain
///
/// Also rejects negative terms: guesses are non-negative, so such a sequence
/// could never be won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayabilityFilter {
    /// A term with `|term| >= magnitude_cutoff` counts as large
    pub magnitude_cutoff: u64,
    /// Maximum number of large terms allowed
    pub max_large_terms: usize,
}

impl Default for PlayabilityFilter {
    fn default() -> Self {
        Self {
            magnitude_cutoff: 10,
            max_large_terms: 4,
        }
    }
}

impl PlayabilityFilter {
    /// Number of terms at or above the magnitude cutoff
    #[must_use]
    pub fn count_large(&self, terms: &[i64]) -> usize {
        terms
            .iter()
            .filter(|t| t.unsigned_abs() >= self.magnitude_cutoff)
            .count()
    }

    #[must_use]
    pub fn is_playable(&self, terms: &[i64]) -> bool {
        terms.iter().all(|&t| t >= 0) && self.count_large(terms) <= self.max_large_terms
    }
}

/// The target for one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPuzzle {
    id: PuzzleId,
    sequence: Vec<i64>,
    rule_name: &'static str,
}

impl DailyPuzzle {
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &PuzzleId {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &[i64] {
        &self.sequence
    }

    #[inline]
    #[must_use]
    pub const fn rule_name(&self) -> &'static str {
        self.rule_name
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Puzzle with a hand-picked target, for exercising sessions directly
    #[cfg(test)]
    pub(crate) fn fixed(sequence: &[i64]) -> Self {
        Self::fixed_with_id("2025-01-01_test".parse().unwrap(), sequence)
    }

    #[cfg(test)]
    pub(crate) fn fixed_with_id(id: PuzzleId, sequence: &[i64]) -> Self {
        Self {
            id,
            sequence: sequence.to_vec(),
            rule_name: "fixed",
        }
    }
}

/// Picks each day's rule from the eligible pool
///
/// The pool is computed once at construction. Its order and membership are
/// part of the puzzle contract: the same id over the same pool always yields
/// the same rule and sequence.
#[derive(Debug, Clone)]
pub struct DailySelector<'a> {
    registry: &'a Registry,
    pool: Vec<&'a SequenceRule>,
    filter: PlayabilityFilter,
    sequence_length: usize,
    max_digits: usize,
}

impl<'a> DailySelector<'a> {
    /// Selector over the rules whose base sequence passes `filter`
    ///
    /// Rules that fail to generate at `sequence_length`, or generate an
    /// unplayable sequence, stay describable by name but are never selected.
    ///
    /// # Errors
    /// Returns `RuleError::EmptyPool` if no rule qualifies.
    pub fn new(
        registry: &'a Registry,
        filter: PlayabilityFilter,
        sequence_length: usize,
    ) -> Result<Self, RuleError> {
        Self::build(registry, filter, sequence_length, true)
    }

    /// Selector over every rule that can generate `sequence_length` terms
    ///
    /// Unplayable picks go through the variation pass instead of being
    /// filtered out up front.
    ///
    /// # Errors
    /// Returns `RuleError::EmptyPool` if no rule can generate at that length.
    pub fn unfiltered(
        registry: &'a Registry,
        filter: PlayabilityFilter,
        sequence_length: usize,
    ) -> Result<Self, RuleError> {
        Self::build(registry, filter, sequence_length, false)
    }

    fn build(
        registry: &'a Registry,
        filter: PlayabilityFilter,
        sequence_length: usize,
        apply_filter: bool,
    ) -> Result<Self, RuleError> {
        let mut pool = Vec::with_capacity(registry.len());
        let mut widest = 0;

        for rule in registry.all() {
            let terms = match rule.generate(sequence_length) {
                Ok(terms) => terms,
                Err(err) => {
                    debug!(rule = rule.name(), %err, "excluded from daily pool");
                    continue;
                }
            };

            if apply_filter && !filter.is_playable(&terms) {
                debug!(
                    rule = rule.name(),
                    large_terms = filter.count_large(&terms),
                    "excluded from daily pool: not playable"
                );
                continue;
            }

            widest = terms.iter().map(|&t| digit_count(t)).fold(widest, usize::max);
            pool.push(rule);
        }

        if pool.is_empty() {
            return Err(RuleError::EmptyPool);
        }

        info!(
            eligible = pool.len(),
            total = registry.len(),
            filtered = apply_filter,
            "daily pool ready"
        );

        Ok(Self {
            registry,
            pool,
            filter,
            sequence_length,
            max_digits: widest.clamp(2, 6),
        })
    }

    /// Id for the UTC day containing `now`, under this registry's catalog
    ///
    /// # Errors
    /// Returns `PuzzleError::MalformedId` if the registry version is not a
    /// valid id suffix.
    pub fn puzzle_id(&self, now: chrono::DateTime<chrono::Utc>) -> Result<PuzzleId, PuzzleError> {
        PuzzleId::for_instant(now, self.registry.version())
    }

    /// Pool index selected for `id`
    #[must_use]
    pub fn rule_index(&self, id: &PuzzleId) -> usize {
        hash_code(&id.to_string()).unsigned_abs() as usize % self.pool.len()
    }

    /// Generate the puzzle for `id`
    ///
    /// Pure function of the id and the pool.
    ///
    /// # Errors
    /// - `PuzzleError::UnsupportedCatalogVersion` if `id` was issued against
    ///   a different catalog
    /// - `PuzzleError::Rule` if the selected rule fails to generate
    pub fn daily_puzzle(&self, id: &PuzzleId) -> Result<DailyPuzzle, PuzzleError> {
        if id.version() != self.registry.version() {
            return Err(PuzzleError::UnsupportedCatalogVersion {
                id: id.to_string(),
                found: id.version().to_string(),
                expected: self.registry.version().to_string(),
            });
        }

        let rule = self.pool[self.rule_index(id)];
        let base = rule.generate(self.sequence_length)?;

        let sequence = if self.filter.is_playable(&base) {
            base
        } else {
            self.vary(rule, id).unwrap_or(base)
        };

        debug!(%id, rule = rule.name(), ?sequence, "generated daily puzzle");

        Ok(DailyPuzzle {
            id: id.clone(),
            sequence,
            rule_name: rule.name(),
        })
    }

    /// Try bounded, date-seeded perturbations of an unplayable sequence
    ///
    /// Arithmetic rules take a window further along the sequence, polynomial
    /// rules shift by one or two terms. Other families are left alone.
    fn vary(&self, rule: &SequenceRule, id: &PuzzleId) -> Option<Vec<i64>> {
        let seed = hash_code(&format!("{id}_variation")).unsigned_abs() as usize;

        for attempt in 0..MAX_VARIATION_ATTEMPTS {
            let offset = match rule.family() {
                Family::Arithmetic => (seed + attempt) % 5,
                Family::Polynomial => match (seed + attempt) % 3 {
                    0 => continue,
                    shift => shift,
                },
                _ => break,
            };

            let Ok(longer) = rule.generate(self.sequence_length + offset) else {
                continue;
            };
            let candidate = &longer[offset..];

            if self.filter.is_playable(candidate) {
                debug!(%id, rule = rule.name(), attempt, offset, "variation accepted");
                return Some(candidate.to_vec());
            }
        }

        debug!(%id, rule = rule.name(), "no playable variation, keeping base sequence");
        None
    }

    /// Description for a rule name, or "Unknown rule"
    ///
    /// Looks in the eligible pool first, then the whole registry, so
    /// excluded rules can still be described.
    #[must_use]
    pub fn rule_description(&self, name: &str) -> &'static str {
        self.pool
            .iter()
            .find(|rule| rule.name() == name)
            .copied()
            .or_else(|| self.registry.lookup(name))
            .map_or(UNKNOWN_RULE, SequenceRule::description)
    }

    /// Widest term in any eligible base sequence, clamped to `2..=6` digits
    #[inline]
    #[must_use]
    pub const fn max_digits(&self) -> usize {
        self.max_digits
    }

    /// Eligible rules in selection order
    #[must_use]
    pub fn pool(&self) -> &[&'a SequenceRule] {
        &self.pool
    }

    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    #[must_use]
    pub const fn filter(&self) -> PlayabilityFilter {
        self.filter
    }

    #[inline]
    #[must_use]
    pub const fn sequence_length(&self) -> usize {
        self.sequence_length
    }
}

fn digit_count(term: i64) -> usize {
    term.unsigned_abs().checked_ilog10().map_or(1, |d| d as usize + 1)
}
