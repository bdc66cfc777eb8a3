//! PostgreSQL order item store.

use crate::{traits::OrderItemRepository, DatabasePoolInterface};
use async_trait::async_trait;
use emporium_core::{EmporiumResult, NewOrderItem, OrderId, OrderItem, OrderItemId, ProductId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL order item store.
#[derive(Component, Clone)]
#[shaku(interface = OrderItemRepository)]
pub struct PgOrderItemRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgOrderItemRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: String,
    product_id: i64,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
        }
    }
}

#[async_trait]
impl OrderItemRepository for PgOrderItemRepository {
    async fn find_by_id(&self, id: OrderItemId) -> EmporiumResult<Option<OrderItem>> {
        debug!("Finding order item by id: {}", id);

        let row = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity FROM order_items WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(OrderItem::from))
    }

    async fn find_by_order(&self, order_id: &OrderId) -> EmporiumResult<Vec<OrderItem>> {
        debug!("Finding items of order: {}", order_id);

        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, order_id, product_id, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn insert(&self, fields: &NewOrderItem) -> EmporiumResult<OrderItem> {
        debug!("Inserting item into order: {}", fields.order_id);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(fields.order_id.as_str())
        .bind(fields.product_id.into_inner())
        .bind(fields.quantity)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(OrderItem::from_new(OrderItemId::new(id), fields.clone()))
    }

    async fn update(
        &self,
        id: OrderItemId,
        fields: &NewOrderItem,
    ) -> EmporiumResult<Option<OrderItem>> {
        debug!("Updating order item: {}", id);

        let previous = sqlx::query_as::<_, OrderItemRow>(
            r#"
            UPDATE order_items AS i
            SET order_id = $2, product_id = $3, quantity = $4
            FROM (
                SELECT id, order_id, product_id, quantity
                FROM order_items
                WHERE id = $1
                FOR UPDATE
            ) AS previous
            WHERE i.id = previous.id
            RETURNING previous.id, previous.order_id, previous.product_id, previous.quantity
            "#,
        )
        .bind(id.into_inner())
        .bind(fields.order_id.as_str())
        .bind(fields.product_id.into_inner())
        .bind(fields.quantity)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(previous.map(OrderItem::from))
    }

    async fn delete(&self, id: OrderItemId) -> EmporiumResult<Option<OrderItem>> {
        debug!("Deleting order item: {}", id);

        let row = sqlx::query_as::<_, OrderItemRow>(
            "DELETE FROM order_items WHERE id = $1 RETURNING id, order_id, product_id, quantity",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(OrderItem::from))
    }
}
