#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use smt_order_manager::application::clock::FixedClock;
use smt_order_manager::application::services::AuthService;
use smt_order_manager::infrastructure::storage::Storage;
use smt_order_manager::routes::build_router;
use smt_order_manager::state::AppState;
use std::sync::Arc;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const API_TOKEN: &str = "test-api-token";

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 12, 21, 14, 30, 5).unwrap())
}

pub fn create_test_state() -> AppState {
    AppState::new(Storage::memory(), Arc::new(fixed_clock()), AuthService::disabled())
}

pub fn create_authed_state() -> AppState {
    let auth = AuthService::new(
        SIGNING_SECRET.to_string(),
        [AuthService::hash_token(SIGNING_SECRET, API_TOKEN)],
    );
    AppState::new(Storage::memory(), Arc::new(fixed_clock()), auth)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, false)).unwrap()
}

pub async fn create_component(server: &TestServer, name: &str, quantity: i32) -> String {
    let response = server
        .post("/api/components")
        .json(&json!({ "name": name, "description": format!("{name} part"), "quantity": quantity }))
        .await;
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

pub async fn create_board(server: &TestServer, name: &str) -> String {
    let response = server
        .post("/api/boards")
        .json(&json!({ "name": name, "description": "", "length": 100.0, "width": 50.0 }))
        .await;
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

pub async fn place(server: &TestServer, board_id: &str, component_id: &str, quantity: i32) {
    server
        .post(&format!("/api/boards/{board_id}/components"))
        .json(&json!({ "component_id": component_id, "placement_quantity": quantity }))
        .await
        .assert_status_ok();
}

pub async fn create_order(server: &TestServer, name: &str, order_date: &str) -> String {
    let response = server
        .post("/api/orders")
        .json(&json!({ "name": name, "description": "", "order_date": order_date }))
        .await;
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

pub async fn link_board(server: &TestServer, order_id: &str, board_id: &str) {
    server
        .post(&format!("/api/orders/{order_id}/boards/{board_id}"))
        .await
        .assert_status_ok();
}
