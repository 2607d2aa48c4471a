// Copyright 2025 Cowboy AI, LLC.

//! LRU cache of built views
//!
//! Each entry remembers which entities and kinds its view read. A commit
//! evicts exactly the entries whose dependencies its change set touches.

use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

use crate::store::ChangeSet;

use super::builder::Dependencies;
use super::view::{NaturalitySquare, ViewMode, ViewModel, ViewScope};

/// Key of a cached view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKey {
    /// Scope the view was built over
    pub scope: ViewScope,
    /// Mode it was drawn in
    pub mode: ViewMode,
    /// Naturality square overlaid on it
    pub square: Option<NaturalitySquare>,
}

impl ViewKey {
    /// Key for `scope` in `mode` without an overlay
    pub fn new(scope: ViewScope, mode: ViewMode) -> Self {
        Self {
            scope,
            mode,
            square: None,
        }
    }

    /// Same key with a naturality square overlay
    pub fn with_square(mut self, square: Option<NaturalitySquare>) -> Self {
        self.square = square;
        self
    }
}

#[derive(Debug)]
struct CachedView {
    view: ViewModel,
    deps: Dependencies,
}

/// Hit and miss counters of a [`ProjectionCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to build
    pub misses: u64,
    /// Entries evicted by commits
    pub invalidated: u64,
}

/// Views keyed by (scope, mode), invalidated by commits
#[derive(Debug)]
pub struct ProjectionCache {
    entries: LruCache<ViewKey, CachedView>,
    stats: CacheStats,
}

impl ProjectionCache {
    /// Cache holding at most `capacity` views
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Cached view for `key`, marking it recently used
    pub fn get(&mut self, key: &ViewKey) -> Option<&ViewModel> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.hits += 1;
                Some(&entry.view)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub(crate) fn insert(&mut self, key: ViewKey, view: ViewModel, deps: Dependencies) {
        self.entries.put(key, CachedView { view, deps });
    }

    /// Evict every view `changes` may have altered; returns how many went
    pub fn invalidate(&mut self, changes: &ChangeSet) -> usize {
        if changes.is_empty() {
            return 0;
        }
        let stale: Vec<ViewKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deps.is_stale(changes))
            .map(|(key, _)| *key)
            .collect();
        for key in &stale {
            self.entries.pop(key);
        }
        self.stats.invalidated += stale.len() as u64;
        if !stale.is_empty() {
            debug!(evicted = stale.len(), remaining = self.entries.len(), "invalidated cached views");
        }
        stale.len()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether `key` is cached, without touching recency
    pub fn contains(&self, key: &ViewKey) -> bool {
        self.entries.contains(key)
    }

    /// Number of cached views
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no view is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached views
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }

    /// Hit, miss and eviction counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::NodeId;
    use crate::model::CategoryId;
    use crate::node_types::EntityKind;

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn category_key(raw: u64) -> ViewKey {
        ViewKey::new(
            ViewScope::Category(CategoryId::from_node(NodeId::from_raw(raw))),
            ViewMode::Standard,
        )
    }

    fn deps_on(raw: u64) -> Dependencies {
        let mut deps = Dependencies::default();
        deps.nodes.insert(NodeId::from_raw(raw));
        deps
    }

    #[test]
    fn test_hits_and_misses_are_counted() {
        let mut cache = ProjectionCache::new(capacity(4));
        assert!(cache.get(&category_key(1)).is_none());
        cache.insert(category_key(1), ViewModel::default(), deps_on(1));
        assert!(cache.get(&category_key(1)).is_some());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_invalidation_only_evicts_touched_views() {
        let mut cache = ProjectionCache::new(capacity(4));
        cache.insert(category_key(1), ViewModel::default(), deps_on(1));
        cache.insert(category_key(2), ViewModel::default(), deps_on(2));

        let mut changes = ChangeSet::default();
        changes.nodes.insert(NodeId::from_raw(2));
        assert_eq!(cache.invalidate(&changes), 1);
        assert!(cache.contains(&category_key(1)));
        assert!(!cache.contains(&category_key(2)));
    }

    #[test]
    fn test_kind_dependencies_are_invalidated_by_kind() {
        let mut cache = ProjectionCache::new(capacity(4));
        let key = ViewKey::new(ViewScope::Functors, ViewMode::Standard);
        let mut deps = Dependencies::default();
        deps.kinds.insert(EntityKind::Functor);
        cache.insert(key, ViewModel::default(), deps);

        let mut changes = ChangeSet::default();
        changes.kinds.insert(EntityKind::Object);
        assert_eq!(cache.invalidate(&changes), 0);
        changes.kinds.insert(EntityKind::Functor);
        assert_eq!(cache.invalidate(&changes), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_least_recently_used_view_is_dropped_at_capacity() {
        let mut cache = ProjectionCache::new(capacity(2));
        cache.insert(category_key(1), ViewModel::default(), deps_on(1));
        cache.insert(category_key(2), ViewModel::default(), deps_on(2));
        cache.get(&category_key(1));
        cache.insert(category_key(3), ViewModel::default(), deps_on(3));

        assert!(cache.contains(&category_key(1)));
        assert!(!cache.contains(&category_key(2)));
        assert_eq!(cache.len(), 2);
    }
}
