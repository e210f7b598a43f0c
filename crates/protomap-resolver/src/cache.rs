//! Memoized visibility answers

use crate::error::ResolveResult;
use crate::resolver::{HierarchyResolver, VisibilityQuery, VisibilityResolution};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    class_name: String,
    field_name: String,
    roots: u64,
}

/// Thread-safe cache in front of a [`HierarchyResolver`]
///
/// Only successful answers are stored; failures are recomputed on the next query.
#[derive(Debug)]
pub struct CachingResolver {
    inner: HierarchyResolver,
    answers: DashMap<CacheKey, VisibilityResolution>,
    hits: AtomicU64,
}

impl CachingResolver {
    pub fn new(inner: HierarchyResolver) -> Self {
        Self {
            inner,
            answers: DashMap::new(),
            hits: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &HierarchyResolver {
        &self.inner
    }

    /// Number of stored answers
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of queries answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.answers.clear();
    }
}

impl VisibilityQuery for CachingResolver {
    fn needs_accessor(
        &self,
        class_name: &str,
        field_name: &str,
    ) -> ResolveResult<VisibilityResolution> {
        let key = CacheKey {
            class_name: class_name.to_string(),
            field_name: field_name.to_string(),
            roots: self.inner.roots().identity(),
        };

        if let Some(answer) = self.answers.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(answer.value().clone());
        }

        let answer = self.inner.resolve(class_name, field_name)?;
        self.answers.insert(key, answer.clone());
        Ok(answer)
    }
}
