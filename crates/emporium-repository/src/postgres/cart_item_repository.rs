//! PostgreSQL cart item store.

use crate::{traits::CartItemRepository, DatabasePoolInterface};
use async_trait::async_trait;
use emporium_core::{CartItem, CartItemId, EmporiumResult, NewCartItem, ProductId, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL cart item store.
#[derive(Component, Clone)]
#[shaku(interface = CartItemRepository)]
pub struct PgCartItemRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgCartItemRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CartItemRow {
    id: i64,
    product_id: i64,
    quantity: i32,
    user_id: String,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            user_id: UserId::new(row.user_id),
        }
    }
}

#[async_trait]
impl CartItemRepository for PgCartItemRepository {
    async fn find_by_id(&self, id: CartItemId) -> EmporiumResult<Option<CartItem>> {
        debug!("Finding cart item by id: {}", id);

        let row = sqlx::query_as::<_, CartItemRow>(
            "SELECT id, product_id, quantity, user_id FROM cart_items WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(CartItem::from))
    }

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<CartItem>> {
        debug!("Finding cart items for user: {}", user_id);

        let rows = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT id, product_id, quantity, user_id
            FROM cart_items
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn insert(&self, fields: &NewCartItem) -> EmporiumResult<CartItem> {
        debug!("Inserting cart item for user: {}", fields.user_id);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO cart_items (product_id, quantity, user_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(fields.product_id.into_inner())
        .bind(fields.quantity)
        .bind(fields.user_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(CartItem::from_new(CartItemId::new(id), fields.clone()))
    }

    async fn update(
        &self,
        id: CartItemId,
        fields: &NewCartItem,
    ) -> EmporiumResult<Option<CartItem>> {
        debug!("Updating cart item: {}", id);

        let previous = sqlx::query_as::<_, CartItemRow>(
            r#"
            UPDATE cart_items AS c
            SET product_id = $2, quantity = $3, user_id = $4
            FROM (
                SELECT id, product_id, quantity, user_id
                FROM cart_items
                WHERE id = $1
                FOR UPDATE
            ) AS previous
            WHERE c.id = previous.id
            RETURNING previous.id, previous.product_id, previous.quantity, previous.user_id
            "#,
        )
        .bind(id.into_inner())
        .bind(fields.product_id.into_inner())
        .bind(fields.quantity)
        .bind(fields.user_id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(previous.map(CartItem::from))
    }

    async fn delete(&self, id: CartItemId) -> EmporiumResult<Option<CartItem>> {
        debug!("Deleting cart item: {}", id);

        let row = sqlx::query_as::<_, CartItemRow>(
            "DELETE FROM cart_items WHERE id = $1 RETURNING id, product_id, quantity, user_id",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(CartItem::from))
    }
}
