use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tabli_core::qr::{CheckInError, CheckInParams};
use tabli_core::RestaurantSummary;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/check-in", get(check_in))
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub restaurant: RestaurantSummary,
    /// Opens the booking flow straight away
    pub open_booking: bool,
}

/// Resolve a scanned QR link (`?qr=true&rid=N`) to its restaurant.
async fn check_in(
    State(state): State<AppState>,
    Query(params): Query<CheckInParams>,
) -> Result<Json<CheckInResponse>, AppError> {
    let restaurant_id = params.restaurant_id()?;
    let restaurant = state
        .directory
        .read(restaurant_id, |r| r.summary())
        .await
        .map_err(|_| CheckInError::MissingRestaurant)?;

    tracing::info!(restaurant_id, "QR check-in");
    Ok(Json(CheckInResponse {
        restaurant,
        open_booking: true,
    }))
}
