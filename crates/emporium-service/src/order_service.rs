//! Order service: orders, their items, and the detailed view joining both.

use crate::cache::keyspace::{ORDER, ORDER_ITEM, ORDER_ITEMS, USER_ORDERS};
use crate::cache::CacheInterface;
use crate::cache_aside::{CacheAsideInvalidator, CacheAsideReader, Invalidation};
use async_trait::async_trait;
use emporium_core::{
    require_valid_id, Collection, DetailedOrder, EmporiumError, EmporiumResult, Interface,
    NewDetailedOrder, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId,
    RequestStatus, UserId, ValidateExt,
};
use emporium_repository::{OrderItemRepository, OrderRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Order service trait.
#[async_trait]
pub trait OrderService: Interface + Send + Sync {
    async fn get_order(&self, id: &OrderId) -> EmporiumResult<Order>;

    /// Orders of a user, oldest first.
    async fn get_user_orders(&self, user_id: &UserId) -> EmporiumResult<Collection<Order>>;

    /// Stores an order under a generated ID.
    async fn add_order(&self, order: NewOrder) -> EmporiumResult<Order>;

    async fn update_order(&self, id: &OrderId, order: NewOrder) -> EmporiumResult<RequestStatus>;

    /// Deletes an order together with its items.
    async fn delete_order(&self, id: &OrderId) -> EmporiumResult<RequestStatus>;

    async fn get_order_item(&self, id: OrderItemId) -> EmporiumResult<OrderItem>;

    async fn get_order_items(&self, order_id: &OrderId) -> EmporiumResult<Collection<OrderItem>>;

    async fn add_order_item(&self, item: NewOrderItem) -> EmporiumResult<OrderItem>;

    async fn update_order_item(
        &self,
        id: OrderItemId,
        item: NewOrderItem,
    ) -> EmporiumResult<RequestStatus>;

    async fn delete_order_item(&self, id: OrderItemId) -> EmporiumResult<RequestStatus>;

    /// An order and its items, fetched as two independent cache-aside reads.
    ///
    /// Fails as a whole when either read fails.
    async fn get_detailed_order(&self, id: &OrderId) -> EmporiumResult<DetailedOrder>;

    /// Every order of a user with its items.
    async fn get_user_detailed_orders(
        &self,
        user_id: &UserId,
    ) -> EmporiumResult<Collection<DetailedOrder>>;

    /// Stores an order, then each of its items.
    ///
    /// The whole payload is validated up front. The rows are written one at
    /// a time, so a store failure partway leaves the rows written so far.
    async fn add_detailed_order(&self, order: NewDetailedOrder) -> EmporiumResult<DetailedOrder>;
}

/// Order service component for dependency injection.
#[derive(Component)]
#[shaku(interface = OrderService)]
pub struct OrderServiceComponent {
    #[shaku(inject)]
    orders: Arc<dyn OrderRepository>,
    #[shaku(inject)]
    items: Arc<dyn OrderItemRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl OrderServiceComponent {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        items: Arc<dyn OrderItemRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            orders,
            items,
            cache,
        }
    }

    fn invalidator(&self) -> CacheAsideInvalidator {
        CacheAsideInvalidator::new(Arc::clone(&self.cache))
    }
}

#[async_trait]
impl OrderService for OrderServiceComponent {
    async fn get_order(&self, id: &OrderId) -> EmporiumResult<Order> {
        debug!("Getting order: {}", id);
        require_valid_id("order", id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), ORDER)
            .fetch(id, || async {
                self.orders
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("Order", id))
            })
            .await
    }

    async fn get_user_orders(&self, user_id: &UserId) -> EmporiumResult<Collection<Order>> {
        debug!("Getting orders of user: {}", user_id);
        require_valid_id("user", user_id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), USER_ORDERS)
            .fetch(user_id, || async {
                Ok(Collection::new(self.orders.find_by_user(user_id).await?))
            })
            .await
    }

    async fn add_order(&self, order: NewOrder) -> EmporiumResult<Order> {
        order.validate_request()?;

        let created = self.orders.insert(&order).await?;
        info!("Order added: {} for user {}", created.id, created.user_id);

        self.invalidator()
            .invalidate(Invalidation::new().key(&USER_ORDERS, &created.user_id));
        Ok(created)
    }

    async fn update_order(&self, id: &OrderId, order: NewOrder) -> EmporiumResult<RequestStatus> {
        require_valid_id("order", id)?;
        order.validate_request()?;

        let previous = self
            .orders
            .update(id, &order)
            .await?
            .ok_or_else(|| EmporiumError::not_found("Order", id))?;
        info!("Order updated: {}", id);

        self.invalidator().invalidate(
            Invalidation::new()
                .key(&ORDER, id)
                .key(&USER_ORDERS, &previous.user_id)
                .key(&USER_ORDERS, &order.user_id),
        );
        Ok(RequestStatus::success())
    }

    async fn delete_order(&self, id: &OrderId) -> EmporiumResult<RequestStatus> {
        require_valid_id("order", id)?;

        let removed = self.orders.delete(id).await?;
        let mut invalidation = Invalidation::new().key(&ORDER, id).key(&ORDER_ITEMS, id);
        if let Some(removed) = &removed {
            info!("Order deleted with {} items: {}", removed.item_ids.len(), id);
            invalidation = invalidation.key(&USER_ORDERS, &removed.order.user_id);
            for item_id in &removed.item_ids {
                invalidation = invalidation.key(&ORDER_ITEM, item_id);
            }
        }

        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }

    async fn get_order_item(&self, id: OrderItemId) -> EmporiumResult<OrderItem> {
        debug!("Getting order item: {}", id);
        require_valid_id("order item", &id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), ORDER_ITEM)
            .fetch(&id, || async {
                self.items
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("OrderItem", id))
            })
            .await
    }

    async fn get_order_items(&self, order_id: &OrderId) -> EmporiumResult<Collection<OrderItem>> {
        debug!("Getting items of order: {}", order_id);
        require_valid_id("order", order_id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), ORDER_ITEMS)
            .fetch(order_id, || async {
                Ok(Collection::new(self.items.find_by_order(order_id).await?))
            })
            .await
    }

    async fn add_order_item(&self, item: NewOrderItem) -> EmporiumResult<OrderItem> {
        item.validate_request()?;

        let created = self.items.insert(&item).await?;
        info!("Order item added: {} to order {}", created.id, created.order_id);

        self.invalidator()
            .invalidate(Invalidation::new().key(&ORDER_ITEMS, &created.order_id));
        Ok(created)
    }

    async fn update_order_item(
        &self,
        id: OrderItemId,
        item: NewOrderItem,
    ) -> EmporiumResult<RequestStatus> {
        require_valid_id("order item", &id)?;
        item.validate_request()?;

        let previous = self
            .items
            .update(id, &item)
            .await?
            .ok_or_else(|| EmporiumError::not_found("OrderItem", id))?;
        info!("Order item updated: {}", id);

        self.invalidator().invalidate(
            Invalidation::new()
                .key(&ORDER_ITEM, id)
                .key(&ORDER_ITEMS, &previous.order_id)
                .key(&ORDER_ITEMS, &item.order_id),
        );
        Ok(RequestStatus::success())
    }

    async fn delete_order_item(&self, id: OrderItemId) -> EmporiumResult<RequestStatus> {
        require_valid_id("order item", &id)?;

        let removed = self.items.delete(id).await?;
        let mut invalidation = Invalidation::new().key(&ORDER_ITEM, id);
        if let Some(item) = &removed {
            info!("Order item deleted: {}", id);
            invalidation = invalidation.key(&ORDER_ITEMS, &item.order_id);
        }

        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }

    async fn get_detailed_order(&self, id: &OrderId) -> EmporiumResult<DetailedOrder> {
        debug!("Getting detailed order: {}", id);

        let (order, items) = futures::try_join!(self.get_order(id), self.get_order_items(id))?;
        Ok(DetailedOrder {
            order,
            items: items.into_inner(),
        })
    }

    async fn get_user_detailed_orders(
        &self,
        user_id: &UserId,
    ) -> EmporiumResult<Collection<DetailedOrder>> {
        debug!("Getting detailed orders of user: {}", user_id);

        let orders = self.get_user_orders(user_id).await?;
        let mut detailed = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.get_order_items(&order.id).await?;
            detailed.push(DetailedOrder {
                order,
                items: items.into_inner(),
            });
        }
        Ok(Collection::new(detailed))
    }

    async fn add_detailed_order(&self, order: NewDetailedOrder) -> EmporiumResult<DetailedOrder> {
        order.validate_request()?;

        let NewDetailedOrder { order, items } = order;
        let created = self.add_order(order).await?;

        let mut stored = Vec::with_capacity(items.len());
        for line in &items {
            stored.push(self.add_order_item(line.for_order(created.id.clone())).await?);
        }

        info!("Detailed order added: {} with {} items", created.id, stored.len());
        Ok(DetailedOrder {
            order: created,
            items: stored,
        })
    }
}

impl std::fmt::Debug for OrderServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eventually, InMemoryCache, InMemoryStore};
    use emporium_core::{AddressId, NewOrderLine, ProductId};
    use std::collections::HashSet;

    fn setup() -> (OrderServiceComponent, Arc<InMemoryStore>, Arc<InMemoryCache>) {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(InMemoryCache::new());
        let service = OrderServiceComponent::new(store.clone(), store.clone(), cache.clone());
        (service, store, cache)
    }

    fn new_order(user: &str) -> NewOrder {
        NewOrder {
            user_id: UserId::new(user),
            address_id: AddressId::new(1),
            total_price: 4200,
            created_at: "2024-05-01T10:00:00Z".to_string(),
            status: "pending".to_string(),
        }
    }

    fn new_item(order_id: &OrderId, product: i64, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            order_id: order_id.clone(),
            product_id: ProductId::new(product),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_detailed_order_has_exactly_its_items() {
        let (service, _store, _cache) = setup();
        let order = service.add_order(new_order("alice")).await.unwrap();
        let other = service.add_order(new_order("alice")).await.unwrap();

        let first = service.add_order_item(new_item(&order.id, 1, 1)).await.unwrap();
        let second = service.add_order_item(new_item(&order.id, 2, 3)).await.unwrap();
        service.add_order_item(new_item(&other.id, 9, 1)).await.unwrap();

        let detailed = service.get_detailed_order(&order.id).await.unwrap();
        assert_eq!(detailed.order, order);
        let ids: HashSet<OrderItemId> = detailed.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, HashSet::from([first.id, second.id]));
    }

    #[tokio::test]
    async fn test_detailed_order_fails_as_a_whole() {
        let (service, store, _cache) = setup();
        let order = service.add_order(new_order("alice")).await.unwrap();

        store.set_unavailable(true);
        let err = service.get_detailed_order(&order.id).await.unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");

        store.set_unavailable(false);
        let missing = service
            .get_detailed_order(&OrderId::new("no-such-order"))
            .await
            .unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }

    #[tokio::test]
    async fn test_add_detailed_order() {
        let (service, _store, _cache) = setup();
        let payload = NewDetailedOrder {
            order: new_order("alice"),
            items: vec![
                NewOrderLine {
                    product_id: ProductId::new(1),
                    quantity: 2,
                },
                NewOrderLine {
                    product_id: ProductId::new(2),
                    quantity: 1,
                },
            ],
        };

        let created = service.add_detailed_order(payload).await.unwrap();
        assert_eq!(created.items.len(), 2);
        assert!(created.items.iter().all(|i| i.order_id == created.order.id));

        let all = service
            .get_user_detailed_orders(&UserId::new("alice"))
            .await
            .unwrap();
        assert_eq!(all.data, vec![created]);
    }

    #[tokio::test]
    async fn test_add_detailed_order_validates_every_line_first() {
        let (service, store, _cache) = setup();
        let payload = NewDetailedOrder {
            order: new_order("alice"),
            items: vec![
                NewOrderLine {
                    product_id: ProductId::new(1),
                    quantity: 2,
                },
                NewOrderLine {
                    product_id: ProductId::new(2),
                    quantity: 0,
                },
            ],
        };

        let err = service.add_detailed_order(payload).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_timestamp_rejected() {
        let (service, store, _cache) = setup();
        let mut order = new_order("alice");
        order.created_at = "yesterday".to_string();

        let err = service.add_order(order).await.unwrap_err();
        assert!(err.to_string().contains("RFC 3339"));
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_update_moving_user_invalidates_both_lists() {
        let (service, _store, cache) = setup();
        let order = service.add_order(new_order("alice")).await.unwrap();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        service.get_order(&order.id).await.unwrap();
        service.get_user_orders(&alice).await.unwrap();
        service.get_user_orders(&bob).await.unwrap();
        let keys = [
            ORDER.key(&order.id),
            USER_ORDERS.key(&alice),
            USER_ORDERS.key(&bob),
        ];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service.update_order(&order.id, new_order("bob")).await.unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        assert!(service.get_user_orders(&alice).await.unwrap().is_empty());
        assert_eq!(service.get_order(&order.id).await.unwrap().user_id, bob);
    }

    #[tokio::test]
    async fn test_update_missing_order_is_not_found() {
        let (service, _store, cache) = setup();
        let err = service
            .update_order(&OrderId::new("ghost"), new_order("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        tokio::task::yield_now().await;
        assert_eq!(cache.set_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_order_drops_cached_items() {
        let (service, _store, cache) = setup();
        let order = service.add_order(new_order("alice")).await.unwrap();
        service.add_order_item(new_item(&order.id, 1, 1)).await.unwrap();

        assert_eq!(service.get_order_items(&order.id).await.unwrap().len(), 1);
        let key = ORDER_ITEMS.key(&order.id);
        assert!(eventually(|| cache.contains(&key)).await);

        assert!(service.delete_order(&order.id).await.unwrap().is_success());
        assert!(eventually(|| !cache.contains(&key)).await);
        assert!(service.get_order_items(&order.id).await.unwrap().is_empty());
        assert!(service.delete_order(&order.id).await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_order_item_update_and_delete() {
        let (service, _store, cache) = setup();
        let first = service.add_order(new_order("alice")).await.unwrap();
        let second = service.add_order(new_order("alice")).await.unwrap();
        let item = service.add_order_item(new_item(&first.id, 1, 1)).await.unwrap();

        service.get_order_items(&first.id).await.unwrap();
        service.get_order_items(&second.id).await.unwrap();
        let keys = [ORDER_ITEMS.key(&first.id), ORDER_ITEMS.key(&second.id)];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service
            .update_order_item(item.id, new_item(&second.id, 1, 5))
            .await
            .unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);
        assert_eq!(service.get_order_items(&second.id).await.unwrap().len(), 1);
        assert_eq!(service.get_order_item(item.id).await.unwrap().quantity, 5);

        service.delete_order_item(item.id).await.unwrap();
        service.delete_order_item(item.id).await.unwrap();
        let key = ORDER_ITEM.key(item.id);
        assert!(eventually(|| !cache.contains(&key)).await);
        assert_eq!(
            service.get_order_item(item.id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_order_delete_evicts_cascaded_items() {
        let (service, _store, cache) = setup();
        let order = service.add_order(new_order("alice")).await.unwrap();
        let item = service.add_order_item(new_item(&order.id, 1, 1)).await.unwrap();

        service.get_order_item(item.id).await.unwrap();
        service.get_order_items(&order.id).await.unwrap();
        let keys = [ORDER_ITEM.key(item.id), ORDER_ITEMS.key(&order.id)];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service.delete_order(&order.id).await.unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        let err = service.get_order_item(item.id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(service.get_order_items(&order.id).await.unwrap().is_empty());
    }
}
