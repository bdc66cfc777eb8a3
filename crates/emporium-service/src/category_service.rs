//! Category service. The catalog tree is seeded reference data and only read here.

use crate::cache::keyspace::{
    ALL, CATEGORIES, CATEGORY, SUB_CATEGORIES, SUB_CATEGORIES_BY_CATEGORY, SUB_CATEGORY,
};
use crate::cache::CacheInterface;
use crate::cache_aside::CacheAsideReader;
use async_trait::async_trait;
use emporium_core::{
    require_category, require_sub_category, Category, CategoryId, Collection, EmporiumError,
    EmporiumResult, Interface, SubCategory, SubCategoryId,
};
use emporium_repository::CategoryRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Category service trait.
#[async_trait]
pub trait CategoryService: Interface + Send + Sync {
    async fn get_category(&self, id: CategoryId) -> EmporiumResult<Category>;

    async fn get_categories(&self) -> EmporiumResult<Collection<Category>>;

    async fn get_sub_category(&self, id: SubCategoryId) -> EmporiumResult<SubCategory>;

    async fn get_sub_categories(&self) -> EmporiumResult<Collection<SubCategory>>;

    async fn get_category_sub_categories(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Collection<SubCategory>>;
}

/// Category service component for dependency injection.
#[derive(Component)]
#[shaku(interface = CategoryService)]
pub struct CategoryServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn CategoryRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl CategoryServiceComponent {
    #[must_use]
    pub fn new(repository: Arc<dyn CategoryRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceComponent {
    async fn get_category(&self, id: CategoryId) -> EmporiumResult<Category> {
        debug!("Getting category: {}", id);
        require_category(id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), CATEGORY)
            .fetch(&id, || async {
                self.repository
                    .find_category(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("Category", id))
            })
            .await
    }

    async fn get_categories(&self) -> EmporiumResult<Collection<Category>> {
        CacheAsideReader::new(Arc::clone(&self.cache), CATEGORIES)
            .fetch(&ALL, || async {
                Ok(Collection::new(self.repository.find_all_categories().await?))
            })
            .await
    }

    async fn get_sub_category(&self, id: SubCategoryId) -> EmporiumResult<SubCategory> {
        debug!("Getting sub-category: {}", id);
        require_sub_category(id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), SUB_CATEGORY)
            .fetch(&id, || async {
                self.repository
                    .find_sub_category(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("SubCategory", id))
            })
            .await
    }

    async fn get_sub_categories(&self) -> EmporiumResult<Collection<SubCategory>> {
        CacheAsideReader::new(Arc::clone(&self.cache), SUB_CATEGORIES)
            .fetch(&ALL, || async {
                Ok(Collection::new(self.repository.find_all_sub_categories().await?))
            })
            .await
    }

    async fn get_category_sub_categories(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Collection<SubCategory>> {
        debug!("Getting sub-categories of category: {}", category_id);
        require_category(category_id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), SUB_CATEGORIES_BY_CATEGORY)
            .fetch(&category_id, || async {
                Ok(Collection::new(
                    self.repository
                        .find_sub_categories_by_category(category_id)
                        .await?,
                ))
            })
            .await
    }
}

impl std::fmt::Debug for CategoryServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eventually, InMemoryCache, InMemoryStore};

    fn setup() -> (CategoryServiceComponent, Arc<InMemoryStore>, Arc<InMemoryCache>) {
        let store = Arc::new(InMemoryStore::with_catalog());
        let cache = Arc::new(InMemoryCache::new());
        let service = CategoryServiceComponent::new(store.clone(), cache.clone());
        (service, store, cache)
    }

    #[tokio::test]
    async fn test_reads_match_store_and_get_cached() {
        let (service, store, cache) = setup();

        assert_eq!(service.get_categories().await.unwrap().len(), 3);
        assert_eq!(service.get_sub_categories().await.unwrap().len(), 10);
        let kids = service
            .get_category_sub_categories(CategoryId::new(3))
            .await
            .unwrap();
        assert!(kids.iter().all(|s| s.category_id == CategoryId::new(3)));
        assert_eq!(
            service.get_sub_category(SubCategoryId::new(4)).await.unwrap().name,
            "Dresses"
        );

        let keys = [
            CATEGORIES.key(ALL),
            SUB_CATEGORIES.key(ALL),
            SUB_CATEGORIES_BY_CATEGORY.key(3),
            SUB_CATEGORY.key(4),
        ];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        let before = store.operation_count();
        store.set_unavailable(true);
        assert_eq!(service.get_categories().await.unwrap().len(), 3);
        assert_eq!(store.operation_count(), before);
    }

    #[tokio::test]
    async fn test_out_of_range_ids_rejected() {
        let (service, store, _cache) = setup();

        assert_eq!(
            service
                .get_category(CategoryId::new(4))
                .await
                .unwrap_err()
                .status_code(),
            400
        );
        assert!(service.get_sub_category(SubCategoryId::new(0)).await.is_err());
        assert!(service
            .get_category_sub_categories(CategoryId::new(-1))
            .await
            .is_err());
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let service = CategoryServiceComponent::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryCache::new()),
        );
        let err = service.get_category(CategoryId::new(1)).await.unwrap_err();
        assert!(matches!(err, EmporiumError::NotFound { .. }));
    }
}
