//! PostgreSQL-backed `OrderRepository` implementation.
//!
//! Line items are stored as a JSON array in cents so historical prices are
//! reproduced exactly.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{OrderRow, RowError};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

fn map_row_error(error: RowError) -> OrderRepositoryError {
    OrderRepositoryError::query(error.to_string())
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let row = OrderRow::from_domain(order).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(orders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = orders::table
            .filter(orders::id.eq(id.as_uuid()))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Order::try_from).transpose().map_err(map_row_error)
    }

    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = orders::table
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(OrderRow::as_select())
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(orders::user_id.eq(*owner.as_uuid()));
        }
        let rows = query
            .load::<OrderRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| Order::try_from(row).map_err(map_row_error))
            .collect()
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let row = OrderRow::from_domain(order).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(orders::table.filter(orders::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(orders::table.filter(orders::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }
}
