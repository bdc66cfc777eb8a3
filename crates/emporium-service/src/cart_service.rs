//! Cart service.

use crate::cache::keyspace::{CART_ITEM, USER_CART_ITEMS};
use crate::cache::CacheInterface;
use crate::cache_aside::{CacheAsideInvalidator, CacheAsideReader, Invalidation};
use async_trait::async_trait;
use emporium_core::{
    require_valid_id, CartItem, CartItemId, Collection, EmporiumError, EmporiumResult, Interface,
    NewCartItem, RequestStatus, UserId, ValidateExt,
};
use emporium_repository::CartItemRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Cart service trait.
#[async_trait]
pub trait CartService: Interface + Send + Sync {
    /// Gets a cart item by ID.
    async fn get_cart_item(&self, id: CartItemId) -> EmporiumResult<CartItem>;

    /// Gets every cart item of a user; empty when the cart is.
    async fn get_user_cart_items(&self, user_id: &UserId) -> EmporiumResult<Collection<CartItem>>;

    /// Adds an item to a cart.
    async fn add_cart_item(&self, item: NewCartItem) -> EmporiumResult<CartItem>;

    /// Adds several items one after the other.
    ///
    /// Every item is validated first. Insertion is not atomic: items stored
    /// before a failing one stay stored.
    async fn add_cart_items(&self, items: Vec<NewCartItem>)
        -> EmporiumResult<Collection<CartItem>>;

    /// Replaces a cart item.
    async fn update_cart_item(&self, id: CartItemId, item: NewCartItem)
        -> EmporiumResult<RequestStatus>;

    /// Deletes a cart item. Deleting a missing item succeeds.
    async fn delete_cart_item(&self, id: CartItemId) -> EmporiumResult<RequestStatus>;
}

/// Cart service component for dependency injection.
#[derive(Component)]
#[shaku(interface = CartService)]
pub struct CartServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn CartItemRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl CartServiceComponent {
    #[must_use]
    pub fn new(repository: Arc<dyn CartItemRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }

    fn invalidator(&self) -> CacheAsideInvalidator {
        CacheAsideInvalidator::new(Arc::clone(&self.cache))
    }
}

#[async_trait]
impl CartService for CartServiceComponent {
    async fn get_cart_item(&self, id: CartItemId) -> EmporiumResult<CartItem> {
        debug!("Getting cart item: {}", id);
        require_valid_id("cart item", &id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), CART_ITEM)
            .fetch(&id, || async {
                self.repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("CartItem", id))
            })
            .await
    }

    async fn get_user_cart_items(&self, user_id: &UserId) -> EmporiumResult<Collection<CartItem>> {
        debug!("Getting cart of user: {}", user_id);
        require_valid_id("user", user_id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), USER_CART_ITEMS)
            .fetch(user_id, || async {
                Ok(Collection::new(self.repository.find_by_user(user_id).await?))
            })
            .await
    }

    async fn add_cart_item(&self, item: NewCartItem) -> EmporiumResult<CartItem> {
        item.validate_request()?;

        let created = self.repository.insert(&item).await?;
        info!("Cart item added: {} for user {}", created.id, created.user_id);

        self.invalidator()
            .invalidate(Invalidation::new().key(&USER_CART_ITEMS, &created.user_id));
        Ok(created)
    }

    async fn add_cart_items(
        &self,
        items: Vec<NewCartItem>,
    ) -> EmporiumResult<Collection<CartItem>> {
        if items.is_empty() {
            return Err(EmporiumError::validation("items: must not be empty"));
        }
        for (index, item) in items.iter().enumerate() {
            item.validate_request().map_err(|e| match e {
                EmporiumError::Validation(message) => {
                    EmporiumError::validation(format!("items[{index}]: {message}"))
                }
                other => other,
            })?;
        }

        let mut created = Vec::with_capacity(items.len());
        let mut invalidation = Invalidation::new();
        let mut failure = None;
        for item in &items {
            match self.repository.insert(item).await {
                Ok(stored) => {
                    invalidation = invalidation.key(&USER_CART_ITEMS, &stored.user_id);
                    created.push(stored);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        info!("Cart items added: {} of {}", created.len(), items.len());
        self.invalidator().invalidate(invalidation);

        match failure {
            Some(e) => Err(e),
            None => Ok(Collection::new(created)),
        }
    }

    async fn update_cart_item(
        &self,
        id: CartItemId,
        item: NewCartItem,
    ) -> EmporiumResult<RequestStatus> {
        require_valid_id("cart item", &id)?;
        item.validate_request()?;

        let previous = self
            .repository
            .update(id, &item)
            .await?
            .ok_or_else(|| EmporiumError::not_found("CartItem", id))?;
        info!("Cart item updated: {}", id);

        self.invalidator().invalidate(
            Invalidation::new()
                .key(&CART_ITEM, id)
                .key(&USER_CART_ITEMS, &previous.user_id)
                .key(&USER_CART_ITEMS, &item.user_id),
        );
        Ok(RequestStatus::success())
    }

    async fn delete_cart_item(&self, id: CartItemId) -> EmporiumResult<RequestStatus> {
        require_valid_id("cart item", &id)?;

        let removed = self.repository.delete(id).await?;
        let mut invalidation = Invalidation::new().key(&CART_ITEM, id);
        match &removed {
            Some(item) => {
                info!("Cart item deleted: {}", id);
                invalidation = invalidation.key(&USER_CART_ITEMS, &item.user_id);
            }
            None => debug!("Cart item {} was already gone", id),
        }

        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }
}

impl std::fmt::Debug for CartServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartServiceComponent").finish_non_exhaustive()
    }
}
