//! In-process scenario tests for sd-daemon HTTP endpoints.
//!
//! The router is driven via `tower::ServiceExt::oneshot`; no socket is bound.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use sd_ai::{Assistant, EMAIL_NOT_CONFIGURED};
use sd_config::AppConfig;
use sd_daemon::{routes, state};
use sd_schemas::{Appointment, AppointmentKind, Client, ClientStatus};
use sd_store::Store;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn state_with(store: Store) -> Arc<state::AppState> {
    Arc::new(state::AppState::from_parts(
        store,
        &AppConfig::default(),
        Assistant::unconfigured(),
        None,
    ))
}

async fn call(st: &Arc<state::AppState>, req: Request<axum::body::Body>) -> (StatusCode, Value) {
    let resp = routes::build_router(Arc::clone(st))
        .oneshot(req)
        .await
        .expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("body is not valid JSON")
    };
    (status, json)
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn send(method: &str, uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn lead(name: &str) -> Client {
    Client {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: String::new(),
        status: ClientStatus::Lead,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap(),
    }
}

fn appt(client_id: Uuid, title: &str, (y, m, d, h, min): (i32, u32, u32, u32, u32)) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        client_id,
        title: title.to_string(),
        date: Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap(),
        location: "Studio".to_string(),
        kind: AppointmentKind::PortraitSession,
        completed: false,
    }
}

// ---------------------------------------------------------------------------
// Health / dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_service_and_unconfigured_ai() {
    let st = state_with(Store::new());
    let (status, json) = call(&st, get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "sd-daemon");
    assert_eq!(json["ai_configured"], false);
    assert!(json["config_hash"].is_null());
}

#[tokio::test]
async fn dashboard_on_seeded_store() {
    let st = Arc::new(state::AppState::new());
    let (status, json) = call(&st, get("/v1/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["client_count"], 4);
    assert_eq!(json["stats"]["total_revenue"], 480_000);
    // The wedding seeded at startup is moments old and still rounds to day 0.
    let upcoming = json["upcoming"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["kind"], "wedding");
}

// ---------------------------------------------------------------------------
// Clients + booking pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_client_requires_name() {
    let st = state_with(Store::new());
    let (status, json) = call(&st, send("POST", "/v1/clients", json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "name is required");
    assert!(st.store.read().await.clients().is_empty());
}

#[tokio::test]
async fn booking_moves_new_lead_to_booked_once() {
    let st = state_with(Store::new());
    let mut rx = st.bus.subscribe();

    let (status, client) = call(
        &st,
        send("POST", "/v1/clients", json!({ "name": "Ana Lima", "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client["status"], "lead");
    let id = client["id"].as_str().unwrap().to_string();

    let draft = json!({
        "client_id": id,
        "title": "Family session",
        "date": "2023-11-12T13:00:00Z",
        "location": "Park",
        "kind": "portrait_session"
    });
    let (status, first) = call(&st, send("POST", "/v1/appointments", draft.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["client_found"], true);
    assert_eq!(first["status_change"]["from"], "lead");
    assert_eq!(first["status_change"]["to"], "booked");
    assert_eq!(first["appointment"]["completed"], false);

    let (_, second) = call(&st, send("POST", "/v1/appointments", draft)).await;
    assert!(second["status_change"].is_null());

    let (_, fetched) = call(&st, get(&format!("/v1/clients/{id}"))).await;
    assert_eq!(fetched["status"], "booked");

    // client created, then the first booking's log + client update + appointment.
    let mut kinds = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        kinds.push(msg.event_name());
    }
    assert_eq!(kinds.first(), Some(&"store_changed"));
    assert!(kinds.contains(&"log"));
}

#[tokio::test]
async fn booking_requires_title() {
    let st = state_with(Store::new());
    let draft = json!({
        "client_id": Uuid::new_v4(),
        "title": "",
        "date": "2023-11-12T13:00:00Z",
        "kind": "event"
    });
    let (status, _) = call(&st, send("POST", "/v1/appointments", draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(st.store.read().await.appointments().is_empty());
}

#[tokio::test]
async fn deleting_client_leaves_dangling_appointments() {
    let c = lead("Bruno");
    let store = Store::from_parts(
        vec![c.clone()],
        vec![appt(c.id, "Headshots", (2023, 11, 14, 15, 0))],
        vec![],
    );
    let st = state_with(store);
    let uri = format!("/v1/clients/{}", c.id);

    let (status, _) = call(&st, send("DELETE", &uri, Value::Null)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, all) = call(&st, get("/v1/appointments")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    let (_, dangling) = call(&st, get("/v1/appointments/dangling")).await;
    assert_eq!(dangling[0]["client_id"], c.id.to_string());

    let (status, _) = call(&st, send("DELETE", &uri, Value::Null)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_client_sets_any_status_and_keeps_created_at() {
    let c = lead("Clara");
    let st = state_with(Store::from_parts(vec![c.clone()], vec![], vec![]));

    let body = json!({
        "name": "Clara Souza",
        "email": "clara@example.com",
        "status": "completed"
    });
    let uri = format!("/v1/clients/{}", c.id);
    let (status, json) = call(&st, send("PUT", &uri, body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["name"], "Clara Souza");
    let stored = st.store.read().await.client(c.id).cloned().unwrap();
    assert_eq!(stored.created_at, c.created_at);

    let unknown = format!("/v1/clients/{}", Uuid::new_v4());
    let (status, _) = call(&st, send("PUT", &unknown, body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_search_and_status_filter() {
    let st = Arc::new(state::AppState::new());

    let (_, hits) = call(&st, get("/v1/clients?q=juliana")).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (_, leads) = call(&st, get("/v1/clients?status=lead")).await;
    assert_eq!(leads[0]["name"], "Carlos Andrade");

    let (_, all) = call(&st, get("/v1/clients?status=all")).await;
    assert_eq!(all.as_array().unwrap().len(), 4);

    let (status, _) = call(&st, get("/v1/clients?status=archived")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Transactions / finance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transaction_amount_must_be_positive_decimal() {
    let st = state_with(Store::new());
    for bad in ["", "-10", "0", "12.345", "abc", "92233720368547758.07"] {
        let body = json!({ "description": "Prints", "amount": bad, "kind": "expense" });
        let (status, _) = call(&st, send("POST", "/v1/transactions", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {bad:?}");
    }
    let body = json!({ "description": "  ", "amount": "10", "kind": "expense" });
    let (status, _) = call(&st, send("POST", "/v1/transactions", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(st.store.read().await.transactions().is_empty());
}

#[tokio::test]
async fn finance_endpoints_over_seeded_ledger() {
    let st = Arc::new(state::AppState::new());

    let body = json!({
        "description": "Gallery prints",
        "amount": "250.50",
        "kind": "income",
        "category": "Products",
        "date": "2023-11-12T00:00:00Z"
    });
    let (status, t) = call(&st, send("POST", "/v1/transactions", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(t["amount_cents"], 25_050);

    let (_, summary) = call(&st, get("/v1/finance/summary")).await;
    assert_eq!(summary["total_income"], 505_050);
    assert_eq!(summary["total_expense"], 432_000);
    assert_eq!(summary["balance"], 73_050);

    let (_, expenses) = call(&st, get("/v1/transactions?kind=expense")).await;
    assert_eq!(expenses.as_array().unwrap().len(), 2);

    let (status, _) = call(&st, get("/v1/transactions?kind=refund")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, history) = call(&st, get("/v1/finance/history")).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history.last().unwrap()["balance"], 73_050);
    assert_eq!(history[1]["signed_amount"], -420_000);
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn november_store() -> Store {
    let c = lead("Dora");
    Store::from_parts(
        vec![c.clone()],
        vec![
            appt(c.id, "Afternoon", (2023, 11, 10, 17, 0)),
            appt(c.id, "Morning", (2023, 11, 10, 12, 0)),
            // 22:30 on the 10th in São Paulo.
            appt(c.id, "Late", (2023, 11, 11, 1, 30)),
            appt(c.id, "December", (2023, 12, 2, 15, 0)),
        ],
        vec![],
    )
}

#[tokio::test]
async fn month_view_buckets_by_local_date() {
    let st = state_with(november_store());
    let (status, view) = call(&st, get("/v1/calendar/month?date=2023-11-10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "November 2023");
    assert_eq!(view["first_weekday"], 3);
    assert_eq!(view["days_in_month"], 30);

    let cells = view["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 33);
    assert_eq!(cells[0]["cell"], "blank");
    let tenth = &cells[3 + 9];
    assert_eq!(tenth["date"], "2023-11-10");
    assert_eq!(tenth["appointments"].as_array().unwrap().len(), 3);
    assert!(cells[3 + 10]["appointments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn month_nav_next_moves_to_december() {
    let st = state_with(november_store());
    let (_, view) = call(&st, get("/v1/calendar/month?date=2023-11-30&nav=next")).await;
    assert_eq!(view["title"], "December 2023");
    let days_with_shoots: usize = view["cells"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["appointments"].as_array().is_some_and(|a| !a.is_empty()))
        .count();
    assert_eq!(days_with_shoots, 1);
}

#[tokio::test]
async fn week_view_starts_sunday() {
    let st = state_with(november_store());
    let (_, view) = call(&st, get("/v1/calendar/week?date=2023-11-10")).await;
    assert_eq!(view["start"], "2023-11-05");
    let days = view["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["weekday"], 0);
    assert_eq!(days[6]["date"], "2023-11-11");
}

#[tokio::test]
async fn day_view_is_time_ordered() {
    let st = state_with(november_store());
    let (_, view) = call(&st, get("/v1/calendar/day?date=2023-11-10")).await;
    let titles: Vec<&str> = view["day"]["appointments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Morning", "Afternoon", "Late"]);
}

#[tokio::test]
async fn bad_calendar_date_is_rejected() {
    let st = state_with(november_store());
    let (status, _) = call(&st, get("/v1/calendar/day?date=2023-13-40")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upcoming_respects_window_and_limit() {
    let now = Utc::now();
    let c = lead("Eva");
    let mut store = Store::from_parts(vec![c.clone()], vec![], vec![]);
    for (title, offset) in [("soon", 2), ("later", 5), ("too far", 10), ("past", -3)] {
        let mut a = appt(c.id, title, (2023, 1, 1, 0, 0));
        a.date = now + Duration::days(offset);
        store.add_appointment(a);
    }
    let st = state_with(store);

    let (_, all) = call(&st, get("/v1/calendar/upcoming")).await;
    let titles: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["soon", "later"]);

    let (_, capped) = call(&st, get("/v1/calendar/upcoming?limit=1")).await;
    assert_eq!(capped.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Assistant (no credential)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concept_without_credential_is_empty_not_error() {
    let st = state_with(Store::new());
    let req = send("POST", "/v1/ai/concept", json!({ "prompt": "rainy street" }));
    let (status, json) = call(&st, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ai_configured"], false);
    assert!(json["concept"].is_null());

    let (status, _) = call(&st, send("POST", "/v1/ai/concept", json!({ "prompt": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn email_without_credential_returns_fallback_text() {
    let st = state_with(Store::new());
    let body = json!({ "client_name": "Juliana", "scenario": "gallery is ready" });
    let (status, json) = call(&st, send("POST", "/v1/ai/email", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["email"], EMAIL_NOT_CONFIGURED);
}
