//! PostgreSQL-backed `ProductRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Product, ProductId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ProductRow, RowError};
use super::pool::{DbPool, PoolError};
use super::schema::products;

#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    map_basic_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_basic_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

fn map_row_error(error: RowError) -> ProductRepositoryError {
    ProductRepositoryError::query(error.to_string())
}

fn decode(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter()
        .map(|row| Product::try_from(row).map_err(map_row_error))
        .collect()
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let row = ProductRow::from_domain(product).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(products::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = products::table
            .filter(products::id.eq(id.as_uuid()))
            .select(ProductRow::as_select())
            .first::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Product::try_from).transpose().map_err(map_row_error)
    }

    async fn find_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, ProductRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = products::table
            .filter(products::id.eq_any(uuids))
            .select(ProductRow::as_select())
            .load::<ProductRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        decode(rows)
    }

    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = products::table
            .order((products::name.asc(), products::id.asc()))
            .select(ProductRow::as_select())
            .load::<ProductRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        decode(rows)
    }

    async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = products::table
            .filter(products::category.eq(category))
            .order((products::name.asc(), products::id.asc()))
            .select(ProductRow::as_select())
            .load::<ProductRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        decode(rows)
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let row = ProductRow::from_domain(product).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(products::table.filter(products::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(products::table.filter(products::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }
}
