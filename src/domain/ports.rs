use super::pagination::Page;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Capability to expose a stable, comparable integer identity.
pub trait Identifiable {
    fn id(&self) -> i64;
}

/// Row predicate applied before pagination.
pub type Filter<T> = dyn Fn(&T) -> bool + Send + Sync;

/// An ordered collection of entities with cursor pagination.
///
/// Insertion order is the canonical order of the collection. Absence is
/// never an error: misses show up as `None` or empty pages.
#[async_trait]
pub trait PaginatedStore<T>: Send + Sync
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    /// Appends `item`, rejecting it with `DuplicateId` if its id is taken.
    async fn add(&self, item: T) -> Result<T>;

    async fn get_by_id(&self, id: i64) -> Result<Option<T>>;

    /// Returns the page that follows `cursor` in the filtered set.
    ///
    /// * `cursor` - id of the last item already seen. Unknown ids restart at the beginning.
    /// * `limit` - page size, [`DEFAULT_LIMIT`](super::pagination::DEFAULT_LIMIT) when absent.
    /// * `predicate` - applied to the whole collection before paging.
    async fn get_all(
        &self,
        cursor: Option<i64>,
        limit: Option<i64>,
        predicate: Option<&Filter<T>>,
    ) -> Result<Page<T>>;

    /// Every item matching `predicate`, in canonical order.
    async fn find_all(&self, predicate: Option<&Filter<T>>) -> Result<Vec<T>> {
        let page = self.get_all(None, Some(i64::MAX), predicate).await?;
        Ok(page.items)
    }
}

pub type StoreHandle<T> = Arc<dyn PaginatedStore<T>>;
