//! Product service, including the hero and search views.

use crate::cache::keyspace::{
    ALL, CART_ITEM, CATEGORY_HERO_PRODUCTS, HERO_PRODUCTS, PRODUCT, PRODUCTS, PRODUCT_CATEGORY,
    PRODUCT_SEARCH, PRODUCT_SUB_CATEGORY, USER_CART_ITEMS,
};
use crate::cache::CacheInterface;
use crate::cache_aside::{CacheAsideInvalidator, CacheAsideReader, Invalidation};
use async_trait::async_trait;
use emporium_core::{
    normalize_search_query, require_category, require_sub_category, require_valid_id, CategoryId,
    Collection, EmporiumError, EmporiumResult, Interface, NewProduct, Product, ProductId,
    RequestStatus, SubCategoryId, ValidateExt,
};
use emporium_repository::ProductRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Product service trait.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    async fn get_product(&self, id: ProductId) -> EmporiumResult<Product>;

    async fn get_products(&self) -> EmporiumResult<Collection<Product>>;

    async fn get_category_products(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Collection<Product>>;

    async fn get_sub_category_products(
        &self,
        sub_category_id: SubCategoryId,
    ) -> EmporiumResult<Collection<Product>>;

    /// Products featured on the landing page.
    async fn get_hero_products(&self) -> EmporiumResult<Collection<Product>>;

    /// Products featured on a category page.
    async fn get_category_hero_products(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Collection<Product>>;

    /// Case-insensitive name search. Blank queries are rejected.
    async fn search_products(&self, query: &str) -> EmporiumResult<Collection<Product>>;

    async fn add_product(&self, product: NewProduct) -> EmporiumResult<Product>;

    /// Stores every product in one transaction, or none of them.
    async fn add_products(&self, products: Vec<NewProduct>) -> EmporiumResult<Collection<Product>>;

    async fn update_product(&self, id: ProductId, product: NewProduct)
        -> EmporiumResult<RequestStatus>;

    async fn delete_product(&self, id: ProductId) -> EmporiumResult<RequestStatus>;
}

/// Product service component for dependency injection.
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl ProductServiceComponent {
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }

    fn invalidator(&self) -> CacheAsideInvalidator {
        CacheAsideInvalidator::new(Arc::clone(&self.cache))
    }

    async fn cached_list<K, F, Fut>(
        &self,
        keyspace: crate::cache::Keyspace,
        key: &K,
        load: F,
    ) -> EmporiumResult<Collection<Product>>
    where
        K: std::fmt::Display + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = EmporiumResult<Vec<Product>>> + Send,
    {
        CacheAsideReader::new(Arc::clone(&self.cache), keyspace)
            .fetch(key, || async { Ok(Collection::new(load().await?)) })
            .await
    }
}

/// Entries made stale by inserting a product.
fn listing_invalidation(invalidation: Invalidation, product: &Product) -> Invalidation {
    invalidation
        .key(&PRODUCTS, ALL)
        .key(&PRODUCT_CATEGORY, product.category_id)
        .key(&PRODUCT_SUB_CATEGORY, product.sub_category_id)
        .pattern(&PRODUCT_SEARCH)
}

/// Entries made stale by changing or removing a stored product.
fn featured_invalidation(invalidation: Invalidation, product: &Product) -> Invalidation {
    listing_invalidation(invalidation, product)
        .key(&PRODUCT, product.id)
        .key(&HERO_PRODUCTS, ALL)
        .key(&CATEGORY_HERO_PRODUCTS, product.category_id)
}

#[async_trait]
impl ProductService for ProductServiceComponent {
    async fn get_product(&self, id: ProductId) -> EmporiumResult<Product> {
        debug!("Getting product: {}", id);
        require_valid_id("product", &id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), PRODUCT)
            .fetch(&id, || async {
                self.repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("Product", id))
            })
            .await
    }

    async fn get_products(&self) -> EmporiumResult<Collection<Product>> {
        debug!("Getting all products");
        self.cached_list(PRODUCTS, &ALL, || self.repository.find_all())
            .await
    }

    async fn get_category_products(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Collection<Product>> {
        debug!("Getting products of category: {}", category_id);
        require_category(category_id)?;

        self.cached_list(PRODUCT_CATEGORY, &category_id, || {
            self.repository.find_by_category(category_id)
        })
        .await
    }

    async fn get_sub_category_products(
        &self,
        sub_category_id: SubCategoryId,
    ) -> EmporiumResult<Collection<Product>> {
        debug!("Getting products of sub-category: {}", sub_category_id);
        require_sub_category(sub_category_id)?;

        self.cached_list(PRODUCT_SUB_CATEGORY, &sub_category_id, || {
            self.repository.find_by_sub_category(sub_category_id)
        })
        .await
    }

    async fn get_hero_products(&self) -> EmporiumResult<Collection<Product>> {
        debug!("Getting hero products");
        self.cached_list(HERO_PRODUCTS, &ALL, || self.repository.find_hero())
            .await
    }

    async fn get_category_hero_products(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Collection<Product>> {
        debug!("Getting hero products of category: {}", category_id);
        require_category(category_id)?;

        self.cached_list(CATEGORY_HERO_PRODUCTS, &category_id, || {
            self.repository.find_hero_by_category(category_id)
        })
        .await
    }

    async fn search_products(&self, query: &str) -> EmporiumResult<Collection<Product>> {
        let query = normalize_search_query(query);
        if query.is_empty() {
            return Err(EmporiumError::validation("query: must not be blank"));
        }
        debug!("Searching products: {}", query);

        self.cached_list(PRODUCT_SEARCH, &query, || self.repository.search(&query))
            .await
    }

    async fn add_product(&self, product: NewProduct) -> EmporiumResult<Product> {
        product.validate_request()?;

        let created = self.repository.insert(&product).await?;
        info!("Product added: {} ({})", created.id, created.name);

        self.invalidator()
            .invalidate(listing_invalidation(Invalidation::new(), &created));
        Ok(created)
    }

    async fn add_products(
        &self,
        products: Vec<NewProduct>,
    ) -> EmporiumResult<Collection<Product>> {
        if products.is_empty() {
            return Err(EmporiumError::validation("products: must not be empty"));
        }
        for (index, product) in products.iter().enumerate() {
            product.validate_request().map_err(|e| match e {
                EmporiumError::Validation(message) => {
                    EmporiumError::validation(format!("products[{index}]: {message}"))
                }
                other => other,
            })?;
        }

        let created = self.repository.insert_many(&products).await?;
        info!("Products added in bulk: {}", created.len());

        let invalidation = created
            .iter()
            .fold(Invalidation::new(), listing_invalidation);
        self.invalidator().invalidate(invalidation);
        Ok(Collection::new(created))
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: NewProduct,
    ) -> EmporiumResult<RequestStatus> {
        require_valid_id("product", &id)?;
        product.validate_request()?;

        let previous = self
            .repository
            .update(id, &product)
            .await?
            .ok_or_else(|| EmporiumError::not_found("Product", id))?;
        info!("Product updated: {}", id);

        let current = Product::from_new(id, product);
        let invalidation = featured_invalidation(
            featured_invalidation(Invalidation::new(), &previous),
            &current,
        );
        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }

    async fn delete_product(&self, id: ProductId) -> EmporiumResult<RequestStatus> {
        require_valid_id("product", &id)?;

        let removed = self.repository.delete(id).await?;
        let invalidation = match &removed {
            Some(removed) => {
                info!(
                    "Product deleted with {} cart items: {}",
                    removed.cart_items.len(),
                    id
                );
                removed.cart_items.iter().fold(
                    featured_invalidation(Invalidation::new(), &removed.product),
                    |invalidation, (item_id, user_id)| {
                        invalidation
                            .key(&CART_ITEM, item_id)
                            .key(&USER_CART_ITEMS, user_id)
                    },
                )
            }
            None => Invalidation::new().key(&PRODUCT, id),
        };

        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }
}

impl std::fmt::Debug for ProductServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eventually, InMemoryCache, InMemoryStore};

    fn setup() -> (ProductServiceComponent, Arc<InMemoryStore>, Arc<InMemoryCache>) {
        let store = Arc::new(InMemoryStore::with_catalog());
        let cache = Arc::new(InMemoryCache::new());
        let service = ProductServiceComponent::new(store.clone(), cache.clone());
        (service, store, cache)
    }

    fn new_product(name: &str, category: i64, sub_category: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            category_id: CategoryId::new(category),
            sub_category_id: SubCategoryId::new(sub_category),
            image_url: "https://cdn.example.com/p.png".to_string(),
            price: 1999,
            previous_price: 0,
            offered: false,
        }
    }

    #[tokio::test]
    async fn test_bulk_insert_with_invalid_row_stores_nothing() {
        let (service, store, _cache) = setup();

        let mut invalid = new_product("Broken", 1, 1);
        invalid.price = 0;
        let err = service
            .add_products(vec![
                new_product("Shirt", 1, 1),
                invalid,
                new_product("Dress", 2, 4),
            ])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("products[1]"));
        assert_eq!(store.operation_count(), 0);
        assert!(service.get_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_insert_store_failure_rolls_back() {
        let (service, _store, _cache) = setup();

        // Valid ranges, but no such sub-category row in an empty tree
        let store = Arc::new(InMemoryStore::new());
        let bare = ProductServiceComponent::new(store.clone(), Arc::new(InMemoryCache::new()));
        assert!(bare
            .add_products(vec![new_product("Shirt", 1, 1), new_product("Dress", 2, 4)])
            .await
            .is_err());
        assert!(bare.get_products().await.unwrap().is_empty());

        let created = service
            .add_products(vec![new_product("Shirt", 1, 1), new_product("Dress", 2, 4)])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_invalidates_listings() {
        let (service, _store, cache) = setup();
        service.add_product(new_product("Shirt", 1, 1)).await.unwrap();

        assert_eq!(service.get_products().await.unwrap().len(), 1);
        assert_eq!(
            service.get_category_products(CategoryId::new(1)).await.unwrap().len(),
            1
        );
        assert_eq!(service.search_products("SHIRT ").await.unwrap().len(), 1);
        let keys = [
            PRODUCTS.key(ALL),
            PRODUCT_CATEGORY.key(1),
            PRODUCT_SEARCH.key("shirt"),
        ];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service.add_product(new_product("Shirt II", 1, 2)).await.unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        assert_eq!(service.get_products().await.unwrap().len(), 2);
        assert_eq!(service.search_products("shirt").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_moving_category_invalidates_old_and_new() {
        let (service, store, cache) = setup();
        let product = service.add_product(new_product("Jacket", 1, 3)).await.unwrap();
        store.mark_hero(product.id, Some(CategoryId::new(1)));

        service.get_product(product.id).await.unwrap();
        service.get_category_products(CategoryId::new(1)).await.unwrap();
        service.get_category_products(CategoryId::new(2)).await.unwrap();
        service
            .get_category_hero_products(CategoryId::new(1))
            .await
            .unwrap();
        let keys = [
            PRODUCT.key(product.id),
            PRODUCT_CATEGORY.key(1),
            PRODUCT_CATEGORY.key(2),
            CATEGORY_HERO_PRODUCTS.key(1),
        ];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service
            .update_product(product.id, new_product("Jacket", 2, 5))
            .await
            .unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        assert!(service
            .get_category_products(CategoryId::new(1))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            service.get_product(product.id).await.unwrap().category_id,
            CategoryId::new(2)
        );
    }

    #[tokio::test]
    async fn test_hero_views() {
        let (service, store, _cache) = setup();
        let shirt = service.add_product(new_product("Shirt", 1, 1)).await.unwrap();
        let dress = service.add_product(new_product("Dress", 2, 4)).await.unwrap();
        store.mark_hero(shirt.id, None);
        store.mark_hero(dress.id, Some(CategoryId::new(2)));

        assert_eq!(service.get_hero_products().await.unwrap().data, vec![shirt]);
        assert_eq!(
            service
                .get_category_hero_products(CategoryId::new(2))
                .await
                .unwrap()
                .data,
            vec![dress]
        );
    }

    #[tokio::test]
    async fn test_catalog_ranges_and_blank_search_rejected() {
        let (service, store, _cache) = setup();

        assert_eq!(
            service
                .get_category_products(CategoryId::new(4))
                .await
                .unwrap_err()
                .status_code(),
            400
        );
        assert!(service
            .get_sub_category_products(SubCategoryId::new(11))
            .await
            .is_err());
        assert!(service.search_products("   ").await.is_err());
        assert!(service.add_product(new_product("", 1, 1)).await.is_err());
        assert!(service.add_product(new_product("Hat", 0, 1)).await.is_err());
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let (service, _store, cache) = setup();
        let product = service.add_product(new_product("Shirt", 1, 1)).await.unwrap();
        service.get_product(product.id).await.unwrap();
        let key = PRODUCT.key(product.id);
        assert!(eventually(|| cache.contains(&key)).await);

        service.delete_product(product.id).await.unwrap();
        service.delete_product(product.id).await.unwrap();
        assert!(eventually(|| !cache.contains(&key)).await);
        assert_eq!(
            service.get_product(product.id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_delete_evicts_cart_rows_holding_the_product() {
        use crate::{CartService, CartServiceComponent};
        use emporium_core::{NewCartItem, UserId};

        let (service, store, cache) = setup();
        let carts = CartServiceComponent::new(store.clone(), cache.clone());
        let alice = UserId::new("alice");
        let product = service.add_product(new_product("Scarf", 2, 5)).await.unwrap();
        let item = carts
            .add_cart_item(NewCartItem {
                product_id: product.id,
                quantity: 1,
                user_id: alice.clone(),
            })
            .await
            .unwrap();

        assert_eq!(carts.get_user_cart_items(&alice).await.unwrap().len(), 1);
        carts.get_cart_item(item.id).await.unwrap();
        let keys = [USER_CART_ITEMS.key(&alice), CART_ITEM.key(item.id)];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service.delete_product(product.id).await.unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        assert!(carts.get_user_cart_items(&alice).await.unwrap().is_empty());
        assert_eq!(carts.get_cart_item(item.id).await.unwrap_err().status_code(), 404);
    }
}
