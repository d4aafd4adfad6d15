//! Per-day puzzle cache
//!
//! Generation is a pure function of the id, so two callers racing on a cold
//! entry may both generate; the first insert wins and both get the same
//! value. Only the map itself is locked, never the generation.

use super::{DailyPuzzle, PuzzleError, PuzzleId};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared, read-mostly map from puzzle id to generated puzzle
#[derive(Debug, Default)]
pub struct PuzzleCache {
    entries: RwLock<FxHashMap<PuzzleId, Arc<DailyPuzzle>>>,
}

impl PuzzleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached puzzle for `id`, if present
    #[must_use]
    pub fn get(&self, id: &PuzzleId) -> Option<Arc<DailyPuzzle>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Cached puzzle for `id`, generating it on a miss
    ///
    /// # Errors
    /// Propagates the generator's error; nothing is cached in that case.
    pub fn get_or_generate<F>(
        &self,
        id: &PuzzleId,
        generate: F,
    ) -> Result<Arc<DailyPuzzle>, PuzzleError>
    where
        F: FnOnce() -> Result<DailyPuzzle, PuzzleError>,
    {
        if let Some(puzzle) = self.get(id) {
            return Ok(puzzle);
        }

        let fresh = Arc::new(generate()?);

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(id.clone()).or_insert(fresh)))
    }

    /// Drop every entry dated before `date`
    ///
    /// Returns the number of evicted puzzles.
    pub fn evict_before(&self, date: NaiveDate) -> usize {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|id, _| id.date() >= date);
        before - entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{DailySelector, PlayabilityFilter};
    use crate::rules::Registry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn second_lookup_is_served_from_cache() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let cache = PuzzleCache::new();
        let id: PuzzleId = "2025-02-02_v1".parse().unwrap();
        let calls = AtomicUsize::new(0);

        let generate = || {
            calls.fetch_add(1, Ordering::SeqCst);
            selector.daily_puzzle(&id)
        };

        let first = cache.get_or_generate(&id, generate).unwrap();
        let second = cache.get_or_generate(&id, generate).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = PuzzleCache::new();
        let id: PuzzleId = "2025-02-02_v9".parse().unwrap();

        let result = cache.get_or_generate(&id, || Err(PuzzleError::MalformedId("x".into())));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn racing_callers_agree() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let cache = PuzzleCache::new();
        let id: PuzzleId = "2025-03-03_v1".parse().unwrap();

        let results: Vec<Arc<DailyPuzzle>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        cache
                            .get_or_generate(&id, || selector.daily_puzzle(&id))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        let cached = cache.get(&id).unwrap();
        assert!(results.iter().all(|p| **p == *cached));
    }

    #[test]
    fn eviction_keeps_current_day() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let cache = PuzzleCache::new();

        for s in ["2025-04-01_v1", "2025-04-02_v1", "2025-04-03_v1"] {
            let id: PuzzleId = s.parse().unwrap();
            cache.get_or_generate(&id, || selector.daily_puzzle(&id)).unwrap();
        }

        let today: PuzzleId = "2025-04-03_v1".parse().unwrap();
        assert_eq!(cache.evict_before(today.date()), 2);
        assert!(cache.get(&today).is_some());
    }
}
