//! HTTP-level integration tests for the staff assignment grid.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

const DAY: &str = "2025-01-15";

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_upsert_replaces_position(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/toewijzingen/staff",
        json!({ "position": 1, "name": "Sara", "assignment_date": DAY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        "/api/toewijzingen/staff",
        json!({ "position": "1", "name": " Jonas ", "assignment_date": DAY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let staff = body_json(get(app, &format!("/api/toewijzingen/staff?date={DAY}")).await).await;
    let staff = staff.as_array().unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0]["staff_name"], "Jonas");
    assert_eq!(staff[0]["staff_index"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_name_taken_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/toewijzingen/staff",
        json!({ "position": 1, "name": "Sara", "assignment_date": DAY }),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/toewijzingen/staff",
        json!({ "position": 2, "name": "Sara", "assignment_date": DAY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/toewijzingen/staff", json!({ "name": "Sara" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/toewijzingen/staff", json!({ "position": 0, "name": "Sara" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

async fn put_cell(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = put_json(app, "/api/toewijzingen/grid", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn grid(pool: &PgPool) -> Vec<serde_json::Value> {
    let app = common::build_test_app(pool.clone());
    let cells = body_json(get(app, &format!("/api/toewijzingen/grid?date={DAY}")).await).await;
    cells.as_array().unwrap().clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grid_upsert_and_order(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/toewijzingen/grid",
        json!({ "row_number": 2, "column_number": 0, "resident_name": "Amir", "assignment_date": DAY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    put_cell(
        &pool,
        json!({ "row_number": "1", "column_number": "3", "resident_name": " Fatou ", "assignment_date": DAY }),
    )
    .await;
    put_cell(
        &pool,
        json!({ "row_number": 2, "column_number": 0, "resident_name": "Amir", "color_status": "red", "assignment_date": DAY }),
    )
    .await;

    let cells = grid(&pool).await;
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0]["resident_name"], "Fatou");
    assert_eq!(cells[1]["color_status"], "red");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grid_put_empty_cell_deletes(pool: PgPool) {
    put_cell(
        &pool,
        json!({ "row_number": 1, "column_number": 1, "resident_name": "Amir", "assignment_date": DAY }),
    )
    .await;

    let json = put_cell(
        &pool,
        json!({ "row_number": 1, "column_number": 1, "resident_name": "  ", "assignment_date": DAY }),
    )
    .await;
    assert_eq!(json["message"], "Record deleted");
    assert_eq!(json["row_number"], 1);

    assert!(grid(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grid_delete_by_position_and_resident(pool: PgPool) {
    put_cell(&pool, json!({ "row_number": 0, "column_number": 0, "resident_name": "Amir", "assignment_date": DAY })).await;
    put_cell(&pool, json!({ "row_number": 0, "column_number": 1, "resident_name": "Amir", "assignment_date": DAY })).await;
    put_cell(&pool, json!({ "row_number": 1, "column_number": 0, "resident_name": "Fatou", "assignment_date": DAY })).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/toewijzingen/grid?row_number=1&column_number=0&date={DAY}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], 1);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, "/api/toewijzingen/grid?resident_name=Amir").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], 2);

    assert!(grid(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grid_delete_without_target_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete(app, "/api/toewijzingen/grid?row_number=1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Either (row_number and column_number) or resident_name is required"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grid_negative_coordinate_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/toewijzingen/grid",
        json!({ "row_number": -1, "column_number": 0, "resident_name": "Amir" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grid_without_date_spans_every_day(pool: PgPool) {
    const NEXT_DAY: &str = "2025-01-16";
    put_cell(&pool, json!({ "row_number": 0, "column_number": 0, "resident_name": "Amir", "assignment_date": DAY })).await;
    put_cell(&pool, json!({ "row_number": 0, "column_number": 0, "resident_name": "Amir", "assignment_date": NEXT_DAY })).await;

    let app = common::build_test_app(pool.clone());
    let all = body_json(get(app, "/api/toewijzingen/grid").await).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["assignment_date"], DAY);
    assert_eq!(all[1]["assignment_date"], NEXT_DAY);

    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/toewijzingen/grid?resident_name=Amir&date={NEXT_DAY}"),
    )
    .await;
    assert_eq!(body_json(response).await["deleted"], 1);
    assert_eq!(grid(&pool).await.len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, "/api/toewijzingen/grid?resident_name=Amir").await;
    assert_eq!(body_json(response).await["deleted"], 1);

    let app = common::build_test_app(pool);
    let all = body_json(get(app, "/api/toewijzingen/grid").await).await;
    assert!(all.as_array().unwrap().is_empty());
}
