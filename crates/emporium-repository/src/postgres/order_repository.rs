//! PostgreSQL order store.

use crate::{
    traits::{OrderRepository, RemovedOrder},
    DatabasePoolInterface,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emporium_core::{AddressId, EmporiumResult, NewOrder, Order, OrderId, OrderItemId, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL order store.
#[derive(Component, Clone)]
#[shaku(interface = OrderRepository)]
pub struct PgOrderRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgOrderRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct OrderRow {
    id: String,
    user_id: String,
    address_id: i64,
    total_price: i32,
    created_at: DateTime<Utc>,
    status: String,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            address_id: AddressId::new(row.address_id),
            total_price: row.total_price,
            created_at: row.created_at,
            status: row.status,
        }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> EmporiumResult<Option<Order>> {
        debug!("Finding order by id: {}", id);

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, address_id, total_price, created_at, status
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Order::from))
    }

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<Order>> {
        debug!("Finding orders for user: {}", user_id);

        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, address_id, total_price, created_at, status
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn insert(&self, fields: &NewOrder) -> EmporiumResult<Order> {
        let id = Uuid::new_v4().to_string();
        debug!("Inserting order {} for user: {}", id, fields.user_id);

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (id, user_id, address_id, total_price, created_at, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, address_id, total_price, created_at, status
            "#,
        )
        .bind(&id)
        .bind(fields.user_id.as_str())
        .bind(fields.address_id.into_inner())
        .bind(fields.total_price)
        .bind(fields.created_at_utc()?)
        .bind(&fields.status)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: &OrderId, fields: &NewOrder) -> EmporiumResult<Option<Order>> {
        debug!("Updating order: {}", id);

        let previous = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders AS o
            SET user_id = $2, address_id = $3, total_price = $4, created_at = $5, status = $6
            FROM (
                SELECT id, user_id, address_id, total_price, created_at, status
                FROM orders
                WHERE id = $1
                FOR UPDATE
            ) AS previous
            WHERE o.id = previous.id
            RETURNING previous.id, previous.user_id, previous.address_id,
                      previous.total_price, previous.created_at, previous.status
            "#,
        )
        .bind(id.as_str())
        .bind(fields.user_id.as_str())
        .bind(fields.address_id.into_inner())
        .bind(fields.total_price)
        .bind(fields.created_at_utc()?)
        .bind(&fields.status)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(previous.map(Order::from))
    }

    async fn delete(&self, id: &OrderId) -> EmporiumResult<Option<RemovedOrder>> {
        debug!("Deleting order: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        // The row lock keeps new items out until the cascade has run
        let locked: Option<String> =
            sqlx::query_scalar("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let item_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM order_items WHERE order_id = $1 ORDER BY id")
                .bind(id.as_str())
                .fetch_all(&mut *tx)
                .await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            DELETE FROM orders
            WHERE id = $1
            RETURNING id, user_id, address_id, total_price, created_at, status
            "#,
        )
        .bind(id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(RemovedOrder {
            order: row.into(),
            item_ids: item_ids.into_iter().map(OrderItemId::new).collect(),
        }))
    }
}
