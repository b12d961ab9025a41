//! Repository for the `cars` table.

use carbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::car::{Car, CarFilter, CreateCar, UpdateCar};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, make_name, model_name, trim_name, trim_description, \
    engine_type, engine_fuel_type, engine_drive_type, engine_cylinders, engine_size, \
    engine_horsepower_hp, engine_horsepower_rpm, body_type, body_doors, body_seats, \
    created_at, updated_at";

/// Newest first, with the id breaking ties between rows inserted in the
/// same transaction.
const ORDER_BY: &str = "ORDER BY created_at DESC, id DESC";

/// Provides CRUD, listing and search for cars.
pub struct CarRepo;

impl CarRepo {
    /// Insert a new car, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCar) -> Result<Car, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (make_name, model_name, trim_name, trim_description,
                engine_type, engine_fuel_type, engine_drive_type, engine_cylinders,
                engine_size, engine_horsepower_hp, engine_horsepower_rpm,
                body_type, body_doors, body_seats)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&input.make_name)
            .bind(&input.model_name)
            .bind(&input.trim_name)
            .bind(&input.trim_description)
            .bind(&input.engine_type)
            .bind(&input.engine_fuel_type)
            .bind(&input.engine_drive_type)
            .bind(input.engine_cylinders)
            .bind(input.engine_size)
            .bind(input.engine_horsepower_hp)
            .bind(input.engine_horsepower_rpm)
            .bind(&input.body_type)
            .bind(input.body_doors)
            .bind(input.body_seats)
            .fetch_one(pool)
            .await
    }

    /// Find a car by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of cars matching `filter`, newest first.
    ///
    /// Each filter is a case-insensitive substring match; absent filters
    /// are ignored.
    pub async fn list(
        pool: &PgPool,
        filter: &CarFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Car>, sqlx::Error> {
        let (where_clause, binds) = filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM cars {where_clause} {ORDER_BY} LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2,
        );
        let mut q = sqlx::query_as::<_, Car>(&query);
        for pattern in &binds {
            q = q.bind(pattern);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count cars matching `filter`.
    pub async fn count(pool: &PgPool, filter: &CarFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, binds) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM cars {where_clause}");
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for pattern in &binds {
            q = q.bind(pattern);
        }
        q.fetch_one(pool).await
    }

    /// Cars whose make, model, trim or body type contains `term`
    /// (case-insensitive), newest first, at most `limit` rows.
    pub async fn search(pool: &PgPool, term: &str, limit: i64) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cars
             WHERE make_name ILIKE $1
                OR model_name ILIKE $1
                OR trim_name ILIKE $1
                OR body_type ILIKE $1
             {ORDER_BY}
             LIMIT $2"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a car. Only fields present in `input` are applied; a present
    /// `null` clears an optional column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCar,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET
                make_name = COALESCE($2, make_name),
                model_name = COALESCE($3, model_name),
                engine_type = COALESCE($4, engine_type),
                body_type = COALESCE($5, body_type),
                trim_name = CASE WHEN $6 THEN $7 ELSE trim_name END,
                trim_description = CASE WHEN $8 THEN $9 ELSE trim_description END,
                engine_fuel_type = CASE WHEN $10 THEN $11 ELSE engine_fuel_type END,
                engine_drive_type = CASE WHEN $12 THEN $13 ELSE engine_drive_type END,
                engine_cylinders = CASE WHEN $14 THEN $15 ELSE engine_cylinders END,
                engine_size = CASE WHEN $16 THEN $17 ELSE engine_size END,
                engine_horsepower_hp = CASE WHEN $18 THEN $19 ELSE engine_horsepower_hp END,
                engine_horsepower_rpm = CASE WHEN $20 THEN $21 ELSE engine_horsepower_rpm END,
                body_doors = CASE WHEN $22 THEN $23 ELSE body_doors END,
                body_seats = CASE WHEN $24 THEN $25 ELSE body_seats END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .bind(&input.make_name)
            .bind(&input.model_name)
            .bind(&input.engine_type)
            .bind(&input.body_type)
            .bind(input.trim_name.is_some())
            .bind(input.trim_name.clone().flatten())
            .bind(input.trim_description.is_some())
            .bind(input.trim_description.clone().flatten())
            .bind(input.engine_fuel_type.is_some())
            .bind(input.engine_fuel_type.clone().flatten())
            .bind(input.engine_drive_type.is_some())
            .bind(input.engine_drive_type.clone().flatten())
            .bind(input.engine_cylinders.is_some())
            .bind(input.engine_cylinders.flatten())
            .bind(input.engine_size.is_some())
            .bind(input.engine_size.flatten())
            .bind(input.engine_horsepower_hp.is_some())
            .bind(input.engine_horsepower_hp.flatten())
            .bind(input.engine_horsepower_rpm.is_some())
            .bind(input.engine_horsepower_rpm.flatten())
            .bind(input.body_doors.is_some())
            .bind(input.body_doors.flatten())
            .bind(input.body_seats.is_some())
            .bind(input.body_seats.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a car by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build a `WHERE` clause with positional binds for the non-empty filters.
fn filter_clause(filter: &CarFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    for (column, value) in [
        ("make_name", &filter.make),
        ("model_name", &filter.model),
        ("body_type", &filter.body_type),
    ] {
        let Some(term) = value.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        binds.push(contains_pattern(term));
        conditions.push(format!("{column} ILIKE ${}", binds.len()));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), binds)
    }
}

/// `%term%` with LIKE metacharacters in `term` escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
