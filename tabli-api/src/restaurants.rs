use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use tabli_core::qr::QrCodeLink;
use tabli_core::restaurant::RestaurantStatus;
use tabli_core::search::{discover, DiscoverSections, RestaurantQuery};
use tabli_core::wait::{estimate_minutes, estimate_wait};
use tabli_core::{MenuItem, RestaurantProfile, RestaurantSummary, WaitBand};
use tabli_floor::Restaurant;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/restaurants", get(list_restaurants))
        .route("/v1/restaurants/discover", get(discover_restaurants))
        .route("/v1/restaurants/{id}", get(get_restaurant))
        .route("/v1/restaurants/{id}/menu", get(get_menu))
        .route("/v1/restaurants/{id}/qr", get(get_qr_code))
        .route("/v1/restaurants/{id}/wait-estimate", get(restaurant_wait_estimate))
        .route("/v1/wait-estimate", get(wait_estimate))
}

async fn list_restaurants(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Json<Vec<RestaurantSummary>> {
    Json(query.apply(state.directory.summaries().await))
}

async fn discover_restaurants(State(state): State<AppState>) -> Json<DiscoverSections> {
    Json(discover(&state.directory.summaries().await))
}

/// Profile plus the live floor numbers.
#[derive(Debug, Serialize)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub profile: RestaurantProfile,
    pub status: RestaurantStatus,
    pub tables_available: u32,
    pub waiting_in_line: u32,
    pub estimated_wait: Option<WaitBand>,
    /// Within opening hours at the restaurant's local time
    pub is_open: bool,
}

impl RestaurantDetail {
    fn of(restaurant: &Restaurant, local_time: NaiveTime) -> Self {
        let summary = restaurant.summary();
        Self {
            profile: restaurant.profile.clone(),
            status: summary.status,
            tables_available: summary.tables_available,
            waiting_in_line: summary.waiting_in_line,
            estimated_wait: summary.estimated_wait,
            is_open: restaurant.profile.is_open_at(local_time),
        }
    }
}

fn local_time(state: &AppState, now: DateTime<Utc>) -> NaiveTime {
    let offset = FixedOffset::east_opt(state.public.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset).time()
}

async fn get_restaurant(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<RestaurantDetail>, AppError> {
    let now = local_time(&state, Utc::now());
    Ok(Json(state.directory.read(id, |r| RestaurantDetail::of(r, now)).await?))
}

async fn get_menu(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Vec<MenuItem>>, AppError> {
    Ok(Json(state.directory.read(id, |r| r.profile.menu.clone()).await?))
}

pub(crate) fn qr_link(state: &AppState, restaurant: &Restaurant) -> QrCodeLink {
    QrCodeLink::new(
        &state.public.base_url,
        &state.public.qr_api_url,
        state.public.qr_size,
        restaurant.id(),
        &restaurant.profile.name,
    )
}

async fn get_qr_code(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<QrCodeLink>, AppError> {
    Ok(Json(state.directory.read(id, |r| qr_link(&state, r)).await?))
}

#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    /// Defaults to the position a party joining now would get
    pub position: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WaitEstimate {
    pub position: u32,
    pub estimated_minutes: f64,
    pub estimated_wait: WaitBand,
}

impl WaitEstimate {
    fn new(position: u32, turnover_minutes: Option<f64>) -> Self {
        let estimated_minutes = estimate_minutes(position, turnover_minutes);
        Self {
            position,
            estimated_minutes,
            estimated_wait: estimate_wait(position, turnover_minutes),
        }
    }
}

async fn restaurant_wait_estimate(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<PositionQuery>,
) -> Result<Json<WaitEstimate>, AppError> {
    let estimate = state
        .directory
        .read(id, |r| {
            let position = query.position.unwrap_or(r.waitlist().len() as u32 + 1);
            WaitEstimate::new(position, Some(r.profile.average_table_turn_minutes as f64))
        })
        .await?;
    Ok(Json(estimate))
}

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub position: u32,
    pub turnover: Option<f64>,
}

async fn wait_estimate(Query(query): Query<EstimateQuery>) -> Json<WaitEstimate> {
    Json(WaitEstimate::new(query.position, query.turnover))
}
