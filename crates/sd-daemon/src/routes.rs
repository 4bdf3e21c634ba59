//! Axum router and all HTTP handlers for sd-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Tests compose the bare router directly.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, NaiveDate};
use futures_util::{Stream, StreamExt};
use sd_ai::EmailRequest;
use sd_calendar::{navigate, upcoming, ViewMode};
use sd_finance::{balance_history, filter_by_kind, parse_amount, summarize, KindFilter};
use sd_schemas::{Client, ClientId, ClientStatus, NewTransaction};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use crate::{
    api_types::{
        BookingResponse, CalendarQuery, ClientQuery, ConceptRequest, ConceptResponse,
        CreateAppointmentRequest, CreateClientRequest, CreateTransactionRequest,
        DashboardResponse, EmailResponse, ErrorResponse, HealthResponse, StatusChange,
        TransactionQuery, UpdateClientRequest, UpcomingQuery,
    },
    state::{AppState, BusMsg},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/dashboard", get(dashboard))
        .route("/v1/clients", get(list_clients).post(create_client))
        .route(
            "/v1/clients/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/v1/appointments", get(list_appointments).post(book_appointment))
        .route("/v1/appointments/dangling", get(dangling_appointments))
        .route("/v1/transactions", get(list_transactions).post(create_transaction))
        .route("/v1/finance/summary", get(finance_summary))
        .route("/v1/finance/history", get(finance_history))
        .route("/v1/calendar/month", get(calendar_month))
        .route("/v1/calendar/week", get(calendar_week))
        .route("/v1/calendar/day", get(calendar_day))
        .route("/v1/calendar/upcoming", get(calendar_upcoming))
        .route("/v1/ai/concept", post(ai_concept))
        .route("/v1/ai/email", post(ai_email))
        .route("/v1/stream", get(stream))
        .with_state(state)
}

fn error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: msg.into() })).into_response()
}

fn bad_request(msg: impl Into<String>) -> Response {
    error(StatusCode::BAD_REQUEST, msg)
}

fn not_found(what: &str, id: ClientId) -> Response {
    error(StatusCode::NOT_FOUND, format!("{what} {id} not found"))
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
            ai_configured: st.assistant.is_configured(),
            config_hash: st.config_hash.clone(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/dashboard
// ---------------------------------------------------------------------------

pub(crate) async fn dashboard(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let now = st.now();
    let store = st.store.read().await;
    let settings = &st.calendar_settings;

    Json(DashboardResponse {
        stats: store.dashboard(now),
        upcoming: upcoming(
            store.appointments(),
            now,
            settings.upcoming_days,
            Some(settings.upcoming_limit),
        ),
    })
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

pub(crate) async fn list_clients(
    State(st): State<Arc<AppState>>,
    Query(q): Query<ClientQuery>,
) -> Response {
    let status = match q.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None | Some("all") => None,
        Some(raw) => match ClientStatus::parse(raw) {
            Some(s) => Some(s),
            None => return bad_request(format!("unknown status '{raw}'")),
        },
    };

    let store = st.store.read().await;
    let hits: Vec<Client> = store
        .search_clients(q.q.as_deref().unwrap_or(""), status)
        .into_iter()
        .cloned()
        .collect();
    Json(hits).into_response()
}

pub(crate) async fn create_client(
    State(st): State<Arc<AppState>>,
    Json(mut draft): Json<CreateClientRequest>,
) -> Response {
    draft.name = draft.name.trim().to_string();
    if draft.name.is_empty() {
        return bad_request("name is required");
    }

    let client = st.store.write().await.create_client(draft, st.now());
    info!(client_id = %client.id, "clients/create");
    st.publish(BusMsg::store_changed("client", "created", client.id));
    (StatusCode::CREATED, Json(client)).into_response()
}

pub(crate) async fn get_client(
    State(st): State<Arc<AppState>>,
    Path(id): Path<ClientId>,
) -> Response {
    match st.store.read().await.client(id) {
        Some(c) => Json(c.clone()).into_response(),
        None => not_found("client", id),
    }
}

pub(crate) async fn update_client(
    State(st): State<Arc<AppState>>,
    Path(id): Path<ClientId>,
    Json(req): Json<UpdateClientRequest>,
) -> Response {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return bad_request("name is required");
    }

    let mut store = st.store.write().await;
    let Some(created_at) = store.client(id).map(|c| c.created_at) else {
        return not_found("client", id);
    };
    let updated = Client {
        id,
        name,
        email: req.email,
        phone: req.phone,
        status: req.status,
        notes: req.notes,
        created_at,
    };
    store.update_client(updated.clone());
    drop(store);

    info!(client_id = %id, status = %updated.status, "clients/update");
    st.publish(BusMsg::store_changed("client", "updated", id));
    Json(updated).into_response()
}

pub(crate) async fn delete_client(
    State(st): State<Arc<AppState>>,
    Path(id): Path<ClientId>,
) -> Response {
    let (removed, orphaned) = {
        let mut store = st.store.write().await;
        let removed = store.remove_client(id);
        (removed, store.appointments_for_client(id).len())
    };
    if !removed {
        return not_found("client", id);
    }

    info!(client_id = %id, orphaned, "clients/delete");
    if orphaned > 0 {
        st.publish(BusMsg::LogLine {
            level: "WARN".to_string(),
            msg: format!("client {id} removed; {orphaned} appointment(s) now dangling"),
        });
    }
    st.publish(BusMsg::store_changed("client", "removed", id));
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

pub(crate) async fn list_appointments(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(st.store.read().await.appointments().to_vec())
}

pub(crate) async fn dangling_appointments(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let store = st.store.read().await;
    let dangling: Vec<_> = store.dangling_appointments().into_iter().cloned().collect();
    Json(dangling)
}

pub(crate) async fn book_appointment(
    State(st): State<Arc<AppState>>,
    Json(mut draft): Json<CreateAppointmentRequest>,
) -> Response {
    draft.title = draft.title.trim().to_string();
    if draft.title.is_empty() {
        return bad_request("title is required");
    }

    let outcome = st.store.write().await.book_appointment(draft);
    let appointment_id = outcome.appointment.id;

    if let Some((from, to)) = outcome.status_change() {
        st.publish(BusMsg::LogLine {
            level: "INFO".to_string(),
            msg: format!(
                "client {} moved {} -> {}",
                outcome.appointment.client_id,
                from.label(),
                to.label()
            ),
        });
        st.publish(BusMsg::store_changed("client", "updated", outcome.appointment.client_id));
    }
    st.publish(BusMsg::store_changed("appointment", "created", appointment_id));

    (
        StatusCode::CREATED,
        Json(BookingResponse {
            status_change: outcome
                .status_change()
                .map(|(from, to)| StatusChange { from, to }),
            client_found: outcome.transition.is_some(),
            appointment: outcome.appointment,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Transactions / finance
// ---------------------------------------------------------------------------

pub(crate) async fn list_transactions(
    State(st): State<Arc<AppState>>,
    Query(q): Query<TransactionQuery>,
) -> Response {
    let filter = match q.kind.as_deref() {
        None => KindFilter::All,
        Some(raw) => match KindFilter::parse(raw) {
            Some(f) => f,
            None => return bad_request(format!("unknown kind '{raw}'")),
        },
    };
    Json(filter_by_kind(st.store.read().await.transactions(), filter)).into_response()
}

pub(crate) async fn create_transaction(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateTransactionRequest>,
) -> Response {
    let description = req.description.trim().to_string();
    if description.is_empty() {
        return bad_request("description is required");
    }
    let amount = match parse_amount(&req.amount) {
        Ok(a) => a,
        Err(e) => return bad_request(e.to_string()),
    };

    let draft = NewTransaction {
        description,
        amount_cents: amount.raw(),
        date: req.date.unwrap_or_else(|| st.now()),
        kind: req.kind,
        category: req.category.trim().to_string(),
    };
    let t = st.store.write().await.record_transaction(draft);
    info!(transaction_id = %t.id, kind = t.kind.as_str(), amount = %amount, "transactions/create");
    st.publish(BusMsg::store_changed("transaction", "created", t.id));
    (StatusCode::CREATED, Json(t)).into_response()
}

pub(crate) async fn finance_summary(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(summarize(st.store.read().await.transactions()))
}

pub(crate) async fn finance_history(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(balance_history(st.store.read().await.transactions()))
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Resolve `(reference, today)` for a calendar query.
fn reference_date(st: &AppState, q: &CalendarQuery, mode: ViewMode) -> (NaiveDate, NaiveDate) {
    let today = st.calendar.today(st.now());
    let base = q.date.unwrap_or(today);
    let reference = match q.nav {
        Some(dir) => navigate(base, mode, dir),
        None => base,
    };
    (reference, today)
}

pub(crate) async fn calendar_month(
    State(st): State<Arc<AppState>>,
    Query(q): Query<CalendarQuery>,
) -> Response {
    let (reference, today) = reference_date(&st, &q, ViewMode::Month);
    let store = st.store.read().await;
    match st
        .calendar
        .month_view(store.appointments(), reference.year(), reference.month(), today)
    {
        Some(view) => Json(view).into_response(),
        None => bad_request(format!("date {reference} is out of range")),
    }
}

pub(crate) async fn calendar_week(
    State(st): State<Arc<AppState>>,
    Query(q): Query<CalendarQuery>,
) -> impl IntoResponse {
    let (reference, today) = reference_date(&st, &q, ViewMode::Week);
    let store = st.store.read().await;
    Json(st.calendar.week_view(store.appointments(), reference, today))
}

pub(crate) async fn calendar_day(
    State(st): State<Arc<AppState>>,
    Query(q): Query<CalendarQuery>,
) -> impl IntoResponse {
    let (reference, today) = reference_date(&st, &q, ViewMode::Day);
    let store = st.store.read().await;
    Json(st.calendar.day_view(store.appointments(), reference, today))
}

pub(crate) async fn calendar_upcoming(
    State(st): State<Arc<AppState>>,
    Query(q): Query<UpcomingQuery>,
) -> impl IntoResponse {
    let store = st.store.read().await;
    Json(upcoming(
        store.appointments(),
        st.now(),
        st.calendar_settings.upcoming_days,
        q.limit,
    ))
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

pub(crate) async fn ai_concept(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ConceptRequest>,
) -> Response {
    if req.prompt.trim().is_empty() {
        return bad_request("prompt is required");
    }

    match st.assistant.concept(&req.prompt).await {
        Ok(concept) => Json(ConceptResponse {
            ai_configured: st.assistant.is_configured(),
            concept,
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "ai/concept failed");
            error(StatusCode::BAD_GATEWAY, "concept generation failed")
        }
    }
}

pub(crate) async fn ai_email(
    State(st): State<Arc<AppState>>,
    Json(req): Json<EmailRequest>,
) -> Response {
    if req.client_name.trim().is_empty() || req.scenario.trim().is_empty() {
        return bad_request("client_name and scenario are required");
    }
    let email = st.assistant.email(&req).await;
    Json(EmailResponse { email }).into_response()
}

// ---------------------------------------------------------------------------
// GET /v1/stream  (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(m.event_name()).data(data)))
            }
            Err(_) => None, // lagged / closed
        }
    })
}
