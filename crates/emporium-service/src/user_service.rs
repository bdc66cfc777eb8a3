//! User service.

use crate::cache::keyspace::{
    ADDRESS, CART_ITEM, ORDER, ORDER_ITEM, ORDER_ITEMS, USER, USER_ADDRESSES, USER_CART_ITEMS,
    USER_ORDERS,
};
use crate::cache::CacheInterface;
use crate::cache_aside::{CacheAsideInvalidator, CacheAsideReader, Invalidation};
use async_trait::async_trait;
use emporium_core::{
    require_valid_id, Collection, EmporiumError, EmporiumResult, Interface, NewUser,
    RequestStatus, User, UserId, UserProfile, ValidateExt,
};
use emporium_repository::UserRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    async fn get_user(&self, id: &UserId) -> EmporiumResult<User>;

    /// Lists every user. Not cached.
    async fn get_users(&self) -> EmporiumResult<Collection<User>>;

    /// Registers a user under the ID minted by the identity provider.
    async fn add_user(&self, user: NewUser) -> EmporiumResult<User>;

    async fn update_user(&self, id: &UserId, profile: UserProfile)
        -> EmporiumResult<RequestStatus>;

    /// Deletes a user with their addresses, cart and orders.
    async fn delete_user(&self, id: &UserId) -> EmporiumResult<RequestStatus>;
}

/// User service component for dependency injection.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl UserServiceComponent {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }

    fn invalidator(&self) -> CacheAsideInvalidator {
        CacheAsideInvalidator::new(Arc::clone(&self.cache))
    }
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn get_user(&self, id: &UserId) -> EmporiumResult<User> {
        debug!("Getting user: {}", id);
        require_valid_id("user", id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), USER)
            .fetch(id, || async {
                self.repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("User", id))
            })
            .await
    }

    async fn get_users(&self) -> EmporiumResult<Collection<User>> {
        debug!("Listing users");
        Ok(Collection::new(self.repository.find_all().await?))
    }

    async fn add_user(&self, user: NewUser) -> EmporiumResult<User> {
        user.validate_request()?;

        let created = self.repository.insert(&user).await?;
        info!("User added: {}", created.id);

        // A cached NotFound is never stored, but a stale row from a
        // previous registration under the same id may be
        self.invalidator()
            .invalidate(Invalidation::new().key(&USER, &created.id));
        Ok(created)
    }

    async fn update_user(
        &self,
        id: &UserId,
        profile: UserProfile,
    ) -> EmporiumResult<RequestStatus> {
        require_valid_id("user", id)?;
        profile.validate_request()?;

        self.repository
            .update(id, &profile)
            .await?
            .ok_or_else(|| EmporiumError::not_found("User", id))?;
        info!("User updated: {}", id);

        self.invalidator()
            .invalidate(Invalidation::new().key(&USER, id));
        Ok(RequestStatus::success())
    }

    async fn delete_user(&self, id: &UserId) -> EmporiumResult<RequestStatus> {
        require_valid_id("user", id)?;

        let removed = self.repository.delete(id).await?;
        let mut invalidation = Invalidation::new()
            .key(&USER, id)
            .key(&USER_ADDRESSES, id)
            .key(&USER_CART_ITEMS, id)
            .key(&USER_ORDERS, id);

        if let Some(removed) = &removed {
            info!(
                "User deleted with {} addresses, {} cart items and {} orders: {}",
                removed.address_ids.len(),
                removed.cart_item_ids.len(),
                removed.orders.len(),
                id
            );
            for address_id in &removed.address_ids {
                invalidation = invalidation.key(&ADDRESS, address_id);
            }
            for item_id in &removed.cart_item_ids {
                invalidation = invalidation.key(&CART_ITEM, item_id);
            }
            for order in &removed.orders {
                invalidation = invalidation
                    .key(&ORDER, &order.order.id)
                    .key(&ORDER_ITEMS, &order.order.id);
                for item_id in &order.item_ids {
                    invalidation = invalidation.key(&ORDER_ITEM, item_id);
                }
            }
        }

        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eventually, InMemoryCache, InMemoryStore};

    fn setup() -> (UserServiceComponent, Arc<InMemoryStore>, Arc<InMemoryCache>) {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(InMemoryCache::new());
        let service = UserServiceComponent::new(store.clone(), cache.clone());
        (service, store, cache)
    }

    fn new_user(id: &str) -> NewUser {
        NewUser {
            id: UserId::new(id),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn profile(first_name: &str) -> UserProfile {
        UserProfile {
            first_name: first_name.to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_is_visible_after_invalidation() {
        let (service, _store, cache) = setup();
        let id = UserId::new("auth0|ada");
        service.add_user(new_user("auth0|ada")).await.unwrap();

        assert_eq!(service.get_user(&id).await.unwrap().first_name, "Ada");
        let key = USER.key(&id);
        assert!(eventually(|| cache.contains(&key)).await);

        service.update_user(&id, profile("Augusta")).await.unwrap();
        assert!(eventually(|| !cache.contains(&key)).await);
        assert_eq!(service.get_user(&id).await.unwrap().first_name, "Augusta");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (service, _store, _cache) = setup();
        service.add_user(new_user("u-1")).await.unwrap();
        let err = service.add_user(new_user("u-1")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_delete_drops_every_user_keyed_entry() {
        let (service, _store, cache) = setup();
        let id = UserId::new("u-1");
        service.add_user(new_user("u-1")).await.unwrap();

        let keys = [
            USER.key(&id),
            USER_ADDRESSES.key(&id),
            USER_CART_ITEMS.key(&id),
            USER_ORDERS.key(&id),
        ];
        for key in &keys {
            cache.set_raw(key, "{\"data\":[]}", USER.ttl).await.unwrap();
        }

        assert!(service.delete_user(&id).await.unwrap().is_success());
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);
        assert!(service.delete_user(&id).await.unwrap().is_success());
        assert_eq!(service.get_user(&id).await.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_validation_and_listing() {
        let (service, store, _cache) = setup();

        let mut user = new_user("u-2");
        user.email = "nope".to_string();
        assert!(service.add_user(user).await.is_err());
        assert!(service.add_user(new_user("  ")).await.is_err());
        assert!(service
            .update_user(&UserId::new("u-2"), profile(""))
            .await
            .is_err());
        assert_eq!(store.operation_count(), 0);

        service.add_user(new_user("u-2")).await.unwrap();
        service.add_user(new_user("u-3")).await.unwrap();
        assert_eq!(service.get_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let (service, _store, cache) = setup();
        let err = service
            .update_user(&UserId::new("ghost"), profile("Ada"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        tokio::task::yield_now().await;
        assert_eq!(cache.set_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_evicts_rows_removed_with_the_user() {
        use crate::{
            AddressService, AddressServiceComponent, CartService, CartServiceComponent,
            OrderService, OrderServiceComponent,
        };
        use emporium_core::{NewAddress, NewCartItem, NewOrder, NewOrderItem, ProductId};

        let (service, store, cache) = setup();
        let addresses = AddressServiceComponent::new(store.clone(), cache.clone());
        let carts = CartServiceComponent::new(store.clone(), cache.clone());
        let orders = OrderServiceComponent::new(store.clone(), store.clone(), cache.clone());
        let id = UserId::new("u-4");
        service.add_user(new_user("u-4")).await.unwrap();

        let address = addresses
            .add_address(NewAddress {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                country: "US".to_string(),
                zip_code: "62701".to_string(),
                user_id: id.clone(),
            })
            .await
            .unwrap();
        let cart_item = carts
            .add_cart_item(NewCartItem {
                product_id: ProductId::new(1),
                quantity: 1,
                user_id: id.clone(),
            })
            .await
            .unwrap();
        let order = orders
            .add_order(NewOrder {
                user_id: id.clone(),
                address_id: address.id,
                total_price: 900,
                created_at: "2024-05-01T10:00:00Z".to_string(),
                status: "pending".to_string(),
            })
            .await
            .unwrap();
        let order_item = orders
            .add_order_item(NewOrderItem {
                order_id: order.id.clone(),
                product_id: ProductId::new(1),
                quantity: 1,
            })
            .await
            .unwrap();

        addresses.get_address(address.id).await.unwrap();
        carts.get_cart_item(cart_item.id).await.unwrap();
        orders.get_order(&order.id).await.unwrap();
        orders.get_order_item(order_item.id).await.unwrap();
        let keys = [
            ADDRESS.key(address.id),
            CART_ITEM.key(cart_item.id),
            ORDER.key(&order.id),
            ORDER_ITEM.key(order_item.id),
        ];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service.delete_user(&id).await.unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        assert_eq!(addresses.get_address(address.id).await.unwrap_err().status_code(), 404);
        assert_eq!(carts.get_cart_item(cart_item.id).await.unwrap_err().status_code(), 404);
        assert_eq!(orders.get_order(&order.id).await.unwrap_err().status_code(), 404);
        assert_eq!(
            orders.get_order_item(order_item.id).await.unwrap_err().status_code(),
            404
        );
    }
}
