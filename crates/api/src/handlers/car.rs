//! Handlers for the `/car` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carbase_core::car::{CarFilter, CreateCar, UpdateCar};
use carbase_core::error::CoreError;
use carbase_core::pagination::{
    PageInfo, PageRequest, MIN_SEARCH_QUERY_CHARS, SEARCH_RESULT_LIMIT,
};
use carbase_core::types::DbId;
use carbase_db::models::car::Car;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /car/all`. Numbers arrive as text and are
/// coerced by [`PageRequest::from_params`].
#[derive(Debug, Default, Deserialize)]
pub struct ListCarsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "bodyType")]
    pub body_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListCarsResponse {
    pub success: bool,
    pub data: Vec<Car>,
    pub pagination: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<Car>,
    pub count: usize,
}

/// Parse the `{id}` path segment.
fn parse_car_id(raw: &str) -> AppResult<DbId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Core(CoreError::Validation("ID is required".into())));
    }
    raw.parse::<DbId>()
        .map_err(|_| AppError::Core(CoreError::Validation("ID must be a valid number".into())))
}

fn car_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Car", id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/car
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(input): AppJson<CreateCar>,
) -> AppResult<(StatusCode, Json<DataResponse<Car>>)> {
    let input = input.trimmed();
    input.validate().map_err(CoreError::from)?;

    let car = state.cars.create(&input).await?;
    tracing::info!(car_id = car.id, "Car created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(car, "Car created successfully")),
    ))
}

/// GET /api/v1/car/all
///
/// Newest first. `make`, `model` and `bodyType` are case-insensitive
/// substring filters.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(params): AppQuery<ListCarsQuery>,
) -> AppResult<Json<ListCarsResponse>> {
    let page = PageRequest::from_params(params.page.as_deref(), params.limit.as_deref())?;
    let filter = CarFilter {
        make: params.make,
        model: params.model,
        body_type: params.body_type,
    };

    let result = state.cars.list(&filter, page).await?;
    Ok(Json(ListCarsResponse {
        success: true,
        data: result.items,
        pagination: PageInfo::new(page, result.total),
    }))
}

/// GET /api/v1/car/search?query=
///
/// Matches make, model, trim and body type. At most twenty results.
pub async fn search(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(params): AppQuery<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let term = params.query.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < MIN_SEARCH_QUERY_CHARS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Search query must be at least {MIN_SEARCH_QUERY_CHARS} characters"
        ))));
    }

    let cars = state.cars.search(term, SEARCH_RESULT_LIMIT).await?;
    Ok(Json(SearchResponse {
        success: true,
        count: cars.len(),
        data: cars,
    }))
}

/// GET /api/v1/car/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Car>>> {
    let id = parse_car_id(&id)?;
    let car = state
        .cars
        .find_by_id(id)
        .await?
        .ok_or_else(|| car_not_found(id))?;
    Ok(Json(DataResponse::new(car)))
}

/// PUT /api/v1/car/{id}
///
/// Partial update: only fields present in the body change.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateCar>,
) -> AppResult<Json<DataResponse<Car>>> {
    let id = parse_car_id(&id)?;
    let input = input.trimmed();
    input.validate().map_err(CoreError::from)?;

    let car = state
        .cars
        .update(id, &input)
        .await?
        .ok_or_else(|| car_not_found(id))?;
    tracing::info!(car_id = car.id, "Car updated");
    Ok(Json(DataResponse::with_message(car, "Car updated successfully")))
}

/// DELETE /api/v1/car/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_car_id(&id)?;
    if !state.cars.delete(id).await? {
        return Err(car_not_found(id));
    }
    tracing::info!(car_id = id, "Car deleted");
    Ok(Json(MessageResponse::new("Car deleted successfully")))
}
