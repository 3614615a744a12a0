use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tabli_core::notification::DeliveryReceipt;
use tabli_core::qr::QrCodeLink;
use tabli_core::restaurant::{MenuItemCreate, RestaurantUpdate};
use tabli_core::{MenuItem, RestaurantProfile};
use tabli_floor::{FloorError, FloorSnapshot, FloorSummary, QueueChange, QueueOutcome, SeatedTable, Table};
use tabli_store::StaffSession;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::{error::AppError, notify, restaurants::qr_link, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/staff/floor", get(get_floor))
        .route("/v1/staff/analytics", get(get_analytics))
        .route("/v1/staff/stream", get(floor_stream))
        .route("/v1/staff/waitlist/call-next", post(call_next))
        .route("/v1/staff/waitlist/{entry_id}/seat", post(seat_party))
        .route("/v1/staff/waitlist/{entry_id}/no-show", post(mark_no_show))
        .route("/v1/staff/waitlist/{entry_id}", delete(remove_party))
        .route("/v1/staff/tables", post(add_table))
        .route("/v1/staff/tables/{table_id}", delete(remove_table))
        .route("/v1/staff/tables/{table_id}/seat", post(seat_walk_in))
        .route("/v1/staff/tables/{table_id}/checkout", post(check_out))
        .route("/v1/staff/settings", get(get_settings).patch(update_settings))
        .route("/v1/staff/settings/menu", post(add_menu_item))
        .route("/v1/staff/settings/menu/{index}", delete(remove_menu_item))
        .route("/v1/staff/qr", get(get_qr_code))
}

// ============================================================================
// Floor views
// ============================================================================

async fn get_floor(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<FloorSnapshot>, AppError> {
    let snapshot = state
        .directory
        .read(session.restaurant_id, |r| FloorSnapshot::of(r, Utc::now()))
        .await?;
    Ok(Json(snapshot))
}

async fn get_analytics(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<FloorSummary>, AppError> {
    let summary = state
        .directory
        .read(session.restaurant_id, |r| FloorSummary::of(r, Utc::now()))
        .await?;
    Ok(Json(summary))
}

/// Live floor events for the staff member's own restaurant.
async fn floor_stream(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let restaurant_id = session.restaurant_id;
    let rx = state.directory.events().subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) if event.restaurant_id == restaurant_id => serde_json::to_string(&event)
                .ok()
                .map(|json| Ok(Event::default().event(event.name()).data(json))),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(restaurant_id, "Floor stream lagged: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ============================================================================
// Waitlist
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CallNextResponse {
    pub entry_id: Uuid,
    pub customer_name: String,
    pub party_size: u8,
    pub held_until: Option<DateTime<Utc>>,
    pub hold_minutes: u32,
    pub notifications: Vec<DeliveryReceipt>,
}

async fn call_next(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<CallNextResponse>, AppError> {
    let (called, name) = state
        .directory
        .update(session.restaurant_id, |r| {
            let called = r.call_next(Utc::now())?;
            Ok::<_, FloorError>((called, r.profile.name.clone()))
        })
        .await??;

    let notifications = notify::table_ready(&state, &called.entry.contact, &name, called.hold_minutes).await;
    tracing::info!(
        restaurant_id = session.restaurant_id,
        entry_id = %called.entry.id,
        hold_minutes = called.hold_minutes,
        "Party called"
    );

    Ok(Json(CallNextResponse {
        entry_id: called.entry.id,
        customer_name: called.entry.customer_name,
        party_size: called.entry.party_size,
        held_until: called.entry.held_until,
        hold_minutes: called.hold_minutes,
        notifications,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeatRequest {
    #[serde(default)]
    pub table_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DepartureResponse {
    pub entry_id: Uuid,
    pub customer_name: String,
    pub party_size: u8,
    pub outcome: QueueOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<SeatedTable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<DeliveryReceipt>,
}

impl DepartureResponse {
    fn new(change: &QueueChange, notifications: Vec<DeliveryReceipt>) -> Self {
        Self {
            entry_id: change.departure.entry.id,
            customer_name: change.departure.entry.customer_name.clone(),
            party_size: change.departure.entry.party_size,
            outcome: change.departure.outcome,
            table: change.table.clone(),
            notifications,
        }
    }
}

async fn seat_party(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(entry_id): Path<Uuid>,
    Json(req): Json<SeatRequest>,
) -> Result<Json<DepartureResponse>, AppError> {
    let (change, name, hold_minutes) = state
        .directory
        .update(session.restaurant_id, |r| {
            let change = r.seat_party(&entry_id, req.table_id.as_ref(), Utc::now())?;
            Ok::<_, FloorError>((change, r.profile.name.clone(), r.profile.max_hold_minutes))
        })
        .await??;

    let notifications = notify::table_ready(&state, &change.departure.entry.contact, &name, hold_minutes).await;
    let response = DepartureResponse::new(&change, notifications);
    notify::queue_moved(&state, name, change.updates);
    Ok(Json(response))
}

async fn mark_no_show(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<DepartureResponse>, AppError> {
    let (change, name) = state
        .directory
        .update(session.restaurant_id, |r| {
            let change = r.mark_no_show(&entry_id)?;
            Ok::<_, FloorError>((change, r.profile.name.clone()))
        })
        .await??;

    let response = DepartureResponse::new(&change, Vec::new());
    notify::queue_moved(&state, name, change.updates);
    Ok(Json(response))
}

async fn remove_party(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<DepartureResponse>, AppError> {
    let (change, name) = state
        .directory
        .update(session.restaurant_id, |r| {
            let change = r.remove_party(&entry_id)?;
            Ok::<_, FloorError>((change, r.profile.name.clone()))
        })
        .await??;

    let response = DepartureResponse::new(&change, Vec::new());
    notify::queue_moved(&state, name, change.updates);
    Ok(Json(response))
}

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddTableRequest {
    pub name: String,
    pub capacity: u32,
}

async fn add_table(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Json(req): Json<AddTableRequest>,
) -> Result<(StatusCode, Json<Table>), AppError> {
    let table = state
        .directory
        .update(session.restaurant_id, |r| r.add_table(&req.name, req.capacity))
        .await??;
    Ok((StatusCode::CREATED, Json(table)))
}

async fn remove_table(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<Table>, AppError> {
    let table = state
        .directory
        .update(session.restaurant_id, |r| r.remove_table(&table_id))
        .await??;
    Ok(Json(table))
}

#[derive(Debug, Deserialize)]
pub struct WalkInRequest {
    pub party_size: i32,
    #[serde(default)]
    pub guest_name: Option<String>,
}

async fn seat_walk_in(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(table_id): Path<Uuid>,
    Json(req): Json<WalkInRequest>,
) -> Result<Json<SeatedTable>, AppError> {
    let seated = state
        .directory
        .update(session.restaurant_id, |r| {
            r.seat_walk_in(&table_id, req.party_size, req.guest_name.as_deref(), Utc::now())
        })
        .await??;
    Ok(Json(seated))
}

async fn check_out(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<Table>, AppError> {
    let table = state
        .directory
        .update(session.restaurant_id, |r| r.check_out(&table_id))
        .await??;
    Ok(Json(table))
}

// ============================================================================
// Settings
// ============================================================================

async fn get_settings(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<RestaurantProfile>, AppError> {
    let profile = state
        .directory
        .read(session.restaurant_id, |r| r.profile.clone())
        .await?;
    Ok(Json(profile))
}

async fn update_settings(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Json(update): Json<RestaurantUpdate>,
) -> Result<Json<RestaurantProfile>, AppError> {
    let profile = state
        .directory
        .update(session.restaurant_id, |r| r.profile.apply(update).map(|_| r.profile.clone()))
        .await??;
    tracing::info!(restaurant_id = session.restaurant_id, "Restaurant settings updated");
    Ok(Json(profile))
}

async fn add_menu_item(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Json(item): Json<MenuItemCreate>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    let item = state
        .directory
        .update(session.restaurant_id, |r| r.profile.add_menu_item(item).cloned())
        .await??;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_menu_item(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Path(index): Path<usize>,
) -> Result<Json<MenuItem>, AppError> {
    let item = state
        .directory
        .update(session.restaurant_id, |r| r.profile.remove_menu_item(index))
        .await??;
    Ok(Json(item))
}

async fn get_qr_code(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
) -> Result<Json<QrCodeLink>, AppError> {
    let link = state
        .directory
        .read(session.restaurant_id, |r| qr_link(&state, r))
        .await?;
    Ok(Json(link))
}
