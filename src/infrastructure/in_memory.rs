use crate::domain::pagination::{Page, paginate};
use crate::domain::ports::{Filter, Identifiable, PaginatedStore};
use crate::error::{LoanError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct Collection<T> {
    items: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// A thread-safe in-memory store holding entities in insertion order.
///
/// Uses `Arc<RwLock<..>>` so clones share the same collection. The id index
/// and the backing `Vec` are only ever updated together under the write lock,
/// which makes `add` a single check-then-append critical section.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    inner: Arc<RwLock<Collection<T>>>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collection::default())),
        }
    }
}

impl<T: Identifiable> InMemoryStore<T> {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`, kept in the given order.
    pub fn seeded(items: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut collection = Collection::default();
        for item in items {
            let id = item.id();
            if collection.index.contains_key(&id) {
                return Err(LoanError::DuplicateId(id));
            }
            collection.index.insert(id, collection.items.len());
            collection.items.push(item);
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(collection)),
        })
    }
}

#[async_trait]
impl<T> PaginatedStore<T> for InMemoryStore<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    async fn add(&self, item: T) -> Result<T> {
        let mut collection = self.inner.write().await;
        let id = item.id();
        if collection.index.contains_key(&id) {
            return Err(LoanError::DuplicateId(id));
        }

        let position = collection.items.len();
        collection.index.insert(id, position);
        collection.items.push(item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<T>> {
        let collection = self.inner.read().await;
        Ok(collection
            .index
            .get(&id)
            .map(|&position| collection.items[position].clone()))
    }

    async fn get_all(
        &self,
        cursor: Option<i64>,
        limit: Option<i64>,
        predicate: Option<&Filter<T>>,
    ) -> Result<Page<T>> {
        let collection = self.inner.read().await;
        let filtered: Vec<&T> = match predicate {
            Some(predicate) => collection.items.iter().filter(|&item| predicate(item)).collect(),
            None => collection.items.iter().collect(),
        };
        Ok(paginate(&filtered, cursor, limit))
    }
}
