//! PostgreSQL catalog tree store.

use crate::{traits::CategoryRepository, DatabasePoolInterface};
use async_trait::async_trait;
use emporium_core::{Category, CategoryId, EmporiumResult, SubCategory, SubCategoryId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// Read-only access to the seeded categories and sub-categories.
#[derive(Component, Clone)]
#[shaku(interface = CategoryRepository)]
pub struct PgCategoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgCategoryRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: String,
    offered: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            offered: row.offered,
        }
    }
}

#[derive(Debug, FromRow)]
struct SubCategoryRow {
    id: i64,
    name: String,
    description: String,
    category_id: i64,
    offered: bool,
}

impl From<SubCategoryRow> for SubCategory {
    fn from(row: SubCategoryRow) -> Self {
        Self {
            id: SubCategoryId::new(row.id),
            name: row.name,
            description: row.description,
            category_id: CategoryId::new(row.category_id),
            offered: row.offered,
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_category(&self, id: CategoryId) -> EmporiumResult<Option<Category>> {
        debug!("Finding category by id: {}", id);

        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, offered FROM categories WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_all_categories(&self) -> EmporiumResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, offered FROM categories ORDER BY id",
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_sub_category(&self, id: SubCategoryId) -> EmporiumResult<Option<SubCategory>> {
        debug!("Finding sub-category by id: {}", id);

        let row = sqlx::query_as::<_, SubCategoryRow>(
            "SELECT id, name, description, category_id, offered FROM sub_categories WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(SubCategory::from))
    }

    async fn find_all_sub_categories(&self) -> EmporiumResult<Vec<SubCategory>> {
        let rows = sqlx::query_as::<_, SubCategoryRow>(
            "SELECT id, name, description, category_id, offered FROM sub_categories ORDER BY id",
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(SubCategory::from).collect())
    }

    async fn find_sub_categories_by_category(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Vec<SubCategory>> {
        debug!("Finding sub-categories of category: {}", category_id);

        let rows = sqlx::query_as::<_, SubCategoryRow>(
            r#"
            SELECT id, name, description, category_id, offered
            FROM sub_categories
            WHERE category_id = $1
            ORDER BY id
            "#,
        )
        .bind(category_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(SubCategory::from).collect())
    }
}
