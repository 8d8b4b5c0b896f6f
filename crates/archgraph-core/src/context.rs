//! Per-call context threaded into checks: logging sink and extraction cache.
//!
//! There is no process-wide state. A caller that wants its own log sink or
//! wants raw edges reused across calls builds a [`CheckContext`] and passes
//! it explicitly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::edge::Edge;

/// Context for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    name: String,
    dispatch: Option<tracing::Dispatch>,
    cache: Option<Arc<EdgeCache>>,
}

impl CheckContext {
    /// Creates a context with no sink override and no cache.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: None,
            cache: None,
        }
    }

    /// Routes all logging inside [`Self::in_scope`] to `dispatch`.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: tracing::Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Attaches an extraction cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<EdgeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Context name, used as the span field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attached cache, if any.
    #[must_use]
    pub fn cache(&self) -> Option<&EdgeCache> {
        self.cache.as_deref()
    }

    /// Runs `f` inside a `check` span, under this context's dispatcher if set.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        let run = || tracing::info_span!("check", name = %self.name).in_scope(f);
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, run),
            None => run(),
        }
    }
}

/// Raw edge lists keyed by extraction locator.
///
/// Entries live until [`EdgeCache::invalidate`] or [`EdgeCache::clear`] is
/// called; nothing expires on its own.
#[derive(Debug, Default)]
pub struct EdgeCache {
    entries: Mutex<HashMap<String, Arc<[Edge]>>>,
}

impl EdgeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached edges for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<[Edge]>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores edges under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, edges: Arc<[Edge]>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), edges);
    }

    /// Drops one entry. Returns true if it existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached locators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_is_explicitly_invalidated() {
        let cache = EdgeCache::new();
        let edges: Arc<[Edge]> = vec![Edge::new("a", "b")].into();
        cache.insert("edges.json", edges);

        assert_eq!(cache.get("edges.json").unwrap().len(), 1);
        assert!(cache.invalidate("edges.json"));
        assert!(!cache.invalidate("edges.json"));
        assert!(cache.get("edges.json").is_none());

        cache.insert("a", Arc::from(Vec::<Edge>::new()));
        cache.insert("b", Arc::from(Vec::<Edge>::new()));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn in_scope_uses_injected_dispatch() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_target(false)
            .finish();

        let ctx = CheckContext::new("unit").with_dispatch(tracing::Dispatch::new(subscriber));
        let value = ctx.in_scope(|| {
            tracing::info!("inside");
            7
        });
        assert_eq!(value, 7);

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("check{name=unit}"), "{output}");
        assert!(output.contains("inside"), "{output}");
    }
}
