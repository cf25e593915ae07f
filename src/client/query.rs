//! Read-side helpers for screens: a keyed query cache that collapses
//! concurrent identical loads, and the state a list view renders from.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use super::{ClientError, ClientResult};

/// Keyed cache of successful loads. Concurrent `fetch` calls with the same
/// key share one loader run. A failed load leaves the key empty.
pub struct QueryCache<T> {
    entries: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch<F, Fut>(&self, key: &str, loader: F) -> ClientResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(key.to_string()).or_default().clone()
        };
        cell.get_or_try_init(loader).await.cloned()
    }

    /// Cached value without loading
    pub async fn peek(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    /// Drops every key starting with `prefix`, e.g. all pages of `orders:`
    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.entries
            .lock()
            .await
            .retain(|key, _| !key.starts_with(prefix));
    }
}

/// What a list view shows
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Empty,
    Populated(Vec<T>),
    Failed(String),
}

impl<T> ListState<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            ListState::Empty
        } else {
            ListState::Populated(rows)
        }
    }

    pub fn from_result(result: Result<Vec<T>, ClientError>) -> Self {
        match result {
            Ok(rows) => Self::from_rows(rows),
            Err(e) => ListState::Failed(e.user_message()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ListState::Populated(rows) => rows,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_load() {
        let cache: QueryCache<Vec<i32>> = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let load = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(vec![1, 2])
        };

        let (a, b) = tokio::join!(cache.fetch("orders:1", load), cache.fetch("orders:1", load));
        assert_eq!(a.unwrap(), vec![1, 2]);
        assert_eq!(b.unwrap(), vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // served from cache
        let c = cache
            .fetch("orders:1", || async { Ok(vec![9]) })
            .await
            .unwrap();
        assert_eq!(c, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache: QueryCache<i32> = QueryCache::new();
        let err = cache
            .fetch("k", || async { Err(ClientError::Decode("boom".into())) })
            .await;
        assert!(err.is_err());
        assert_eq!(cache.peek("k").await, None);

        let ok = cache.fetch("k", || async { Ok(7) }).await.unwrap();
        assert_eq!(ok, 7);
    }

    #[tokio::test]
    async fn test_invalidate_prefix() {
        let cache: QueryCache<i32> = QueryCache::new();
        cache.fetch("orders:1", || async { Ok(1) }).await.unwrap();
        cache.fetch("orders:2", || async { Ok(2) }).await.unwrap();
        cache.fetch("customers:1", || async { Ok(3) }).await.unwrap();

        cache.invalidate_prefix("orders:").await;
        assert_eq!(cache.peek("orders:1").await, None);
        assert_eq!(cache.peek("orders:2").await, None);
        assert_eq!(cache.peek("customers:1").await, Some(3));

        cache.invalidate("customers:1").await;
        assert_eq!(cache.peek("customers:1").await, None);
    }

    #[test]
    fn test_list_state_from_result() {
        assert_eq!(ListState::<i32>::from_result(Ok(vec![])), ListState::Empty);

        let populated = ListState::from_result(Ok(vec![1, 2, 3]));
        assert_eq!(populated.rows().len(), 3);

        let failed = ListState::<i32>::from_result(Err(ClientError::Api {
            status: 500,
            code: "INTERNAL_ERROR".into(),
            message: "down".into(),
        }));
        assert_eq!(failed, ListState::Failed("down".into()));
        assert!(failed.rows().is_empty());
        assert!(ListState::<i32>::Loading.is_loading());
    }
}
