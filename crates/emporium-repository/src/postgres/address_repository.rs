//! PostgreSQL address store.

use crate::{traits::AddressRepository, DatabasePoolInterface};
use async_trait::async_trait;
use emporium_core::{Address, AddressId, EmporiumResult, NewAddress, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL address store.
#[derive(Component, Clone)]
#[shaku(interface = AddressRepository)]
pub struct PgAddressRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgAddressRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AddressRow {
    id: i64,
    street: String,
    city: String,
    state: String,
    country: String,
    zip_code: String,
    user_id: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            street: row.street,
            city: row.city,
            state: row.state,
            country: row.country,
            zip_code: row.zip_code,
            user_id: UserId::new(row.user_id),
        }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn find_by_id(&self, id: AddressId) -> EmporiumResult<Option<Address>> {
        debug!("Finding address by id: {}", id);

        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT id, street, city, state, country, zip_code, user_id
            FROM addresses
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Address::from))
    }

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<Address>> {
        debug!("Finding addresses of user: {}", user_id);

        let rows = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT id, street, city, state, country, zip_code, user_id
            FROM addresses
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    async fn insert(&self, fields: &NewAddress) -> EmporiumResult<Address> {
        debug!("Inserting address for user: {}", fields.user_id);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO addresses (street, city, state, country, zip_code, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&fields.street)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(&fields.zip_code)
        .bind(fields.user_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(Address::from_new(AddressId::new(id), fields.clone()))
    }

    async fn update(&self, id: AddressId, fields: &NewAddress) -> EmporiumResult<Option<Address>> {
        debug!("Updating address: {}", id);

        let previous = sqlx::query_as::<_, AddressRow>(
            r#"
            UPDATE addresses AS a
            SET street = $2, city = $3, state = $4, country = $5, zip_code = $6, user_id = $7
            FROM (
                SELECT id, street, city, state, country, zip_code, user_id
                FROM addresses
                WHERE id = $1
                FOR UPDATE
            ) AS previous
            WHERE a.id = previous.id
            RETURNING previous.id, previous.street, previous.city, previous.state,
                      previous.country, previous.zip_code, previous.user_id
            "#,
        )
        .bind(id.into_inner())
        .bind(&fields.street)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(&fields.zip_code)
        .bind(fields.user_id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(previous.map(Address::from))
    }

    async fn delete(&self, id: AddressId) -> EmporiumResult<Option<Address>> {
        debug!("Deleting address: {}", id);

        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            DELETE FROM addresses
            WHERE id = $1
            RETURNING id, street, city, state, country, zip_code, user_id
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Address::from))
    }
}
