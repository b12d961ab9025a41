use async_trait::async_trait;
use carbase_core::pagination::PageRequest;
use carbase_core::types::DbId;
use sqlx::PgPool;

use super::{identity_conflict, CarStore, StoreError, StoreResult, CAR_IDENTITY_CONSTRAINT};
use crate::models::car::{Car, CarFilter, CarPage, CreateCar, UpdateCar};
use crate::repositories::CarRepo;

/// [`CarStore`] backed by the `cars` table.
#[derive(Debug, Clone)]
pub struct PgCarStore {
    pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                match db_err.constraint() {
                    Some(CAR_IDENTITY_CONSTRAINT) => identity_conflict(),
                    Some(constraint) => StoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    )),
                    None => StoreError::Conflict(db_err.message().to_string()),
                }
            }
            _ => {
                tracing::error!(error = %err, "Car store database error");
                StoreError::Internal(err.to_string())
            }
        }
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn create(&self, input: &CreateCar) -> StoreResult<Car> {
        Ok(CarRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Car>> {
        Ok(CarRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list(&self, filter: &CarFilter, page: PageRequest) -> StoreResult<CarPage> {
        let items = CarRepo::list(&self.pool, filter, page.limit, page.offset()).await?;
        let total = CarRepo::count(&self.pool, filter).await?;
        Ok(CarPage { items, total })
    }

    async fn search(&self, term: &str, limit: i64) -> StoreResult<Vec<Car>> {
        Ok(CarRepo::search(&self.pool, term, limit).await?)
    }

    async fn update(&self, id: DbId, input: &UpdateCar) -> StoreResult<Option<Car>> {
        Ok(CarRepo::update(&self.pool, id, input).await?)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(CarRepo::delete(&self.pool, id).await?)
    }
}
