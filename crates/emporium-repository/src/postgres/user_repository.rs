//! PostgreSQL user store.

use super::order_repository::OrderRow;
use crate::{
    traits::{RemovedOrder, RemovedUser, UserRepository},
    DatabasePoolInterface,
};
use async_trait::async_trait;
use emporium_core::{
    AddressId, CartItemId, EmporiumResult, NewUser, Order, OrderItemId, User, UserId, UserProfile,
};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL user store.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct PgUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgUserRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &UserId) -> EmporiumResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> EmporiumResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, email FROM users ORDER BY id",
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert(&self, user: &NewUser) -> EmporiumResult<User> {
        debug!("Inserting user: {}", user.id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, first_name, last_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: &UserId, profile: &UserProfile) -> EmporiumResult<Option<User>> {
        debug!("Updating user: {}", id);

        let previous = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users AS u
            SET first_name = $2, last_name = $3, email = $4
            FROM (
                SELECT id, first_name, last_name, email
                FROM users
                WHERE id = $1
                FOR UPDATE
            ) AS previous
            WHERE u.id = previous.id
            RETURNING previous.id, previous.first_name, previous.last_name, previous.email
            "#,
        )
        .bind(id.as_str())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(previous.map(User::from))
    }

    async fn delete(&self, id: &UserId) -> EmporiumResult<Option<RemovedUser>> {
        debug!("Deleting user: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        // The row lock keeps new child rows out until the cascade has run
        let locked: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let address_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM addresses WHERE user_id = $1 ORDER BY id")
                .bind(id.as_str())
                .fetch_all(&mut *tx)
                .await?;

        let cart_item_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM cart_items WHERE user_id = $1 ORDER BY id")
                .bind(id.as_str())
                .fetch_all(&mut *tx)
                .await?;

        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, address_id, total_price, created_at, status
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&mut *tx)
        .await?;

        let order_items: Vec<(i64, String)> = sqlx::query_as(
            r#"
            SELECT oi.id, oi.order_id
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.user_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, UserRow>(
            "DELETE FROM users WHERE id = $1 RETURNING id, first_name, last_name, email",
        )
        .bind(id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let orders = orders
            .into_iter()
            .map(|row| {
                let order = Order::from(row);
                let item_ids = order_items
                    .iter()
                    .filter(|(_, order_id)| order_id == order.id.as_str())
                    .map(|(item_id, _)| OrderItemId::new(*item_id))
                    .collect();
                RemovedOrder { order, item_ids }
            })
            .collect();

        Ok(Some(RemovedUser {
            user: row.into(),
            address_ids: address_ids.into_iter().map(AddressId::new).collect(),
            cart_item_ids: cart_item_ids.into_iter().map(CartItemId::new).collect(),
            orders,
        }))
    }
}
