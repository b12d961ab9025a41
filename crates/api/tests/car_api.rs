//! HTTP-level integration tests for the `/car` resource.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

fn civic() -> Value {
    json!({
        "make_name": "Honda",
        "model_name": "Civic",
        "trim_name": "LX",
        "engine_type": "gas",
        "engine_cylinders": 4,
        "engine_size": 2.0,
        "engine_horsepower_hp": 158,
        "body_type": "Sedan",
        "body_doors": 4,
        "body_seats": 5
    })
}

async fn create(app: axum::Router, body: Value) -> Value {
    let response = post_json_auth(app, "/api/v1/car", &auth_token(), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_car(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = create(app, civic()).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Car created successfully");
    assert!(json["data"]["id"].is_number());
    assert_eq!(json["data"]["make_name"], "Honda");
    assert_eq!(json["data"]["engine_size"], 2.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_trims_strings(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = civic();
    body["make_name"] = json!("  Honda  ");
    body["engine_fuel_type"] = json!("   ");

    let json = create(app, body).await;

    assert_eq!(json["data"]["make_name"], "Honda");
    assert!(json["data"]["engine_fuel_type"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_blank_required_field(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = civic();
    body["body_type"] = json!(" ");

    let response = post_json_auth(app, "/api/v1/car", &auth_token(), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Body type is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_out_of_range_value(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = civic();
    body["body_seats"] = json!(40);

    let response = post_json_auth(app, "/api/v1/car", &auth_token(), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Seats must be between 1 and 20");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_malformed_json(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "make_name": 5 });
    let response = post_json_auth(app, "/api/v1/car", &auth_token(), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_duplicate_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    create(app.clone(), civic()).await;

    let response = post_json_auth(app, "/api/v1/car", &auth_token(), civic()).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], "A similar car already exists");
}

// ---------------------------------------------------------------------------
// List and search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_paginates_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool);
    for model in ["Civic", "Accord", "Pilot"] {
        let mut body = civic();
        body["model_name"] = json!(model);
        create(app.clone(), body).await;
    }

    let response = get_auth(app, "/api/v1/car/all?page=1&limit=2", &auth_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"][0]["model_name"], "Pilot");
    assert_eq!(
        json["pagination"],
        json!({ "page": 1, "limit": 2, "total": 3, "pages": 2 })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_second_page_of_twenty_five(pool: PgPool) {
    let app = common::build_test_app(pool);
    for n in 1..=25 {
        let mut body = civic();
        body["model_name"] = json!(format!("Model {n}"));
        create(app.clone(), body).await;
    }

    let response = get_auth(app, "/api/v1/car/all?page=2&limit=10", &auth_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0]["model_name"], "Model 15");
    assert_eq!(data[9]["model_name"], "Model 6");
    assert_eq!(
        json["pagination"],
        json!({ "page": 2, "limit": 10, "total": 25, "pages": 3 })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_huge_page_is_empty(pool: PgPool) {
    let app = common::build_test_app(pool);
    create(app.clone(), civic()).await;

    let response = get_auth(
        app,
        "/api/v1/car/all?page=100000000000000000&limit=100",
        &auth_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_defaults_and_filters(pool: PgPool) {
    let app = common::build_test_app(pool);
    create(app.clone(), civic()).await;
    let mut suv = civic();
    suv["model_name"] = json!("CR-V");
    suv["body_type"] = json!("SUV");
    create(app.clone(), suv).await;

    let response = get_auth(app, "/api/v1/car/all?bodyType=suv", &auth_token()).await;

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["model_name"], "CR-V");
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["limit"], 10);
    assert_eq!(json["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_rejects_oversized_limit(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/car/all?limit=500", &auth_token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Limit cannot exceed 100");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_matches_trim(pool: PgPool) {
    let app = common::build_test_app(pool);
    create(app.clone(), civic()).await;

    let response = get_auth(app, "/api/v1/car/search?query=lx", &auth_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["trim_name"], "LX");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_rejects_short_query(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in ["/api/v1/car/search?query=a", "/api/v1/car/search"] {
        let response = get_auth(app.clone(), uri, &auth_token()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body_json(response).await["message"],
            "Search query must be at least 2 characters"
        );
    }
}

// ---------------------------------------------------------------------------
// Get, update, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_update_delete_roundtrip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = auth_token();
    let id = create(app.clone(), civic()).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/car/{id}");

    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["model_name"], "Civic");

    let patch = json!({ "engine_horsepower_hp": 180 });
    let response = put_json_auth(app.clone(), &uri, &token, patch).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Car updated successfully");
    assert_eq!(json["data"]["engine_horsepower_hp"], 180);
    assert_eq!(json["data"]["model_name"], "Civic");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Car deleted successfully");

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Car not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_null_clears_optional_field(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = auth_token();
    let id = create(app.clone(), civic()).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/car/{id}");

    let patch = json!({ "trim_name": null, "body_doors": null });
    let response = put_json_auth(app.clone(), &uri, &token, patch).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["trim_name"], Value::Null);
    assert_eq!(json["data"]["body_doors"], Value::Null);
    assert_eq!(json["data"]["body_seats"], 5);

    let fetched = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(fetched["data"]["trim_name"], Value::Null);
    assert_eq!(fetched["data"]["engine_cylinders"], 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_car_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = auth_token();

    let response = put_json_auth(app.clone(), "/api/v1/car/999", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, "/api/v1/car/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_numeric_id_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/car/abc", &auth_token()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "ID must be a valid number");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_rejects_empty_required_field(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create(app.clone(), civic()).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/v1/car/{id}"),
        &auth_token(),
        json!({ "make_name": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Make name cannot be empty");
}
