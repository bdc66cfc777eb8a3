//! PostgreSQL product store.

use crate::{
    traits::{ProductRepository, RemovedProduct},
    DatabasePoolInterface,
};
use async_trait::async_trait;
use emporium_core::{
    CartItemId, CategoryId, EmporiumResult, NewProduct, Product, ProductId, SubCategoryId, UserId,
};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.category_id, p.sub_category_id, \
     p.image_url, p.price, p.previous_price, p.offered";

/// PostgreSQL product store.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct PgProductRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgProductRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    category_id: i64,
    sub_category_id: i64,
    image_url: String,
    price: i32,
    previous_price: i32,
    offered: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            category_id: CategoryId::new(row.category_id),
            sub_category_id: SubCategoryId::new(row.sub_category_id),
            image_url: row.image_url,
            price: row.price,
            previous_price: row.previous_price,
            offered: row.offered,
        }
    }
}

/// Builds a product SELECT with an optional join/filter clause.
fn select_products(clause: &str) -> String {
    format!("SELECT {PRODUCT_COLUMNS} FROM products p {clause} ORDER BY p.id")
}

/// Escapes LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products
        (name, description, category_id, sub_category_id, image_url, price, previous_price, offered)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    RETURNING id
"#;

impl PgProductRepository {
    async fn fetch_many(&self, sql: &str, bind: Option<i64>) -> EmporiumResult<Vec<Product>> {
        let mut query = sqlx::query_as::<_, ProductRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(self.pool.inner()).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: ProductId) -> EmporiumResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Product::from))
    }

    async fn find_all(&self) -> EmporiumResult<Vec<Product>> {
        debug!("Finding all products");
        self.fetch_many(&select_products(""), None).await
    }

    async fn find_by_category(&self, category_id: CategoryId) -> EmporiumResult<Vec<Product>> {
        debug!("Finding products in category: {}", category_id);
        self.fetch_many(
            &select_products("WHERE p.category_id = $1"),
            Some(category_id.into_inner()),
        )
        .await
    }

    async fn find_by_sub_category(
        &self,
        sub_category_id: SubCategoryId,
    ) -> EmporiumResult<Vec<Product>> {
        debug!("Finding products in sub-category: {}", sub_category_id);
        self.fetch_many(
            &select_products("WHERE p.sub_category_id = $1"),
            Some(sub_category_id.into_inner()),
        )
        .await
    }

    async fn find_hero(&self) -> EmporiumResult<Vec<Product>> {
        debug!("Finding hero products");
        self.fetch_many(
            &select_products("INNER JOIN hero_products h ON h.product_id = p.id"),
            None,
        )
        .await
    }

    async fn find_hero_by_category(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Vec<Product>> {
        debug!("Finding hero products of category: {}", category_id);
        self.fetch_many(
            &select_products(
                "INNER JOIN category_hero_products h ON h.product_id = p.id \
                 WHERE h.category_id = $1",
            ),
            Some(category_id.into_inner()),
        )
        .await
    }

    async fn search(&self, query: &str) -> EmporiumResult<Vec<Product>> {
        debug!("Searching products: {}", query);

        let sql = select_products("WHERE p.name ILIKE $1");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(like_pattern(query))
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert(&self, fields: &NewProduct) -> EmporiumResult<Product> {
        debug!("Inserting product: {}", fields.name);

        let id: i64 = sqlx::query_scalar(INSERT_PRODUCT)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.category_id.into_inner())
            .bind(fields.sub_category_id.into_inner())
            .bind(&fields.image_url)
            .bind(fields.price)
            .bind(fields.previous_price)
            .bind(fields.offered)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(Product::from_new(ProductId::new(id), fields.clone()))
    }

    async fn insert_many(&self, products: &[NewProduct]) -> EmporiumResult<Vec<Product>> {
        info!("Inserting {} products in one transaction", products.len());

        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.inner().begin().await?;
        let mut created = Vec::with_capacity(products.len());

        for fields in products {
            let id: i64 = sqlx::query_scalar(INSERT_PRODUCT)
                .bind(&fields.name)
                .bind(&fields.description)
                .bind(fields.category_id.into_inner())
                .bind(fields.sub_category_id.into_inner())
                .bind(&fields.image_url)
                .bind(fields.price)
                .bind(fields.previous_price)
                .bind(fields.offered)
                .fetch_one(&mut *tx)
                .await?;
            created.push(Product::from_new(ProductId::new(id), fields.clone()));
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: ProductId,
        fields: &NewProduct,
    ) -> EmporiumResult<Option<Product>> {
        debug!("Updating product: {}", id);

        let previous = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products AS p
            SET name = $2, description = $3, category_id = $4, sub_category_id = $5,
                image_url = $6, price = $7, previous_price = $8, offered = $9
            FROM (
                SELECT id, name, description, category_id, sub_category_id,
                       image_url, price, previous_price, offered
                FROM products
                WHERE id = $1
                FOR UPDATE
            ) AS previous
            WHERE p.id = previous.id
            RETURNING previous.id, previous.name, previous.description, previous.category_id,
                      previous.sub_category_id, previous.image_url, previous.price,
                      previous.previous_price, previous.offered
            "#,
        )
        .bind(id.into_inner())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.category_id.into_inner())
        .bind(fields.sub_category_id.into_inner())
        .bind(&fields.image_url)
        .bind(fields.price)
        .bind(fields.previous_price)
        .bind(fields.offered)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(previous.map(Product::from))
    }

    async fn delete(&self, id: ProductId) -> EmporiumResult<Option<RemovedProduct>> {
        debug!("Deleting product: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(id.into_inner())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let cart_items: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, user_id FROM cart_items WHERE product_id = $1 ORDER BY id",
        )
        .bind(id.into_inner())
        .fetch_all(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name, description, category_id, sub_category_id,
                      image_url, price, previous_price, offered
            "#,
        )
        .bind(id.into_inner())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(RemovedProduct {
            product: row.into(),
            cart_items: cart_items
                .into_iter()
                .map(|(item_id, user_id)| (CartItemId::new(item_id), UserId::new(user_id)))
                .collect(),
        }))
    }
}
