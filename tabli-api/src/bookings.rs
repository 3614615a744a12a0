use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use tabli_core::booking::BookingRequest;
use tabli_core::survey::SurveyResponse;
use tabli_core::BookingConfirmation;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/restaurants/{id}/bookings", post(create_booking))
        .route("/v1/restaurants/{id}/survey", post(submit_survey))
}

async fn create_booking(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let booking = req.validate()?;

    // Queue first so the snapshot reflects the real line
    let queued = state
        .directory
        .update(id, |r| r.accept_booking(&booking, Utc::now()))
        .await??;

    let payload = booking.into_payload(id, queued);
    match state.bookings.submit(payload).await {
        Ok(confirmation) => Ok((StatusCode::CREATED, Json(confirmation))),
        Err(e) => {
            if let Some(snapshot) = queued {
                tracing::warn!(restaurant_id = id, entry_id = %snapshot.entry_id, "Booking not confirmed, leaving the waitlist");
                let withdrawn = state.directory.update(id, |r| r.withdraw(&snapshot.entry_id)).await;
                if let Ok(Ok(change)) = withdrawn {
                    let name = state.directory.read(id, |r| r.profile.name.clone()).await?;
                    crate::notify::queue_moved(&state, name, change.updates);
                }
            }
            Err(e.into())
        }
    }
}

async fn submit_survey(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(survey): Json<SurveyResponse>,
) -> Result<StatusCode, AppError> {
    if !state.directory.contains(id).await {
        return Err(AppError::NotFoundError(format!("Restaurant not found: {}", id)));
    }

    let survey = survey.normalized();
    if survey.is_skipped() {
        tracing::debug!(restaurant_id = id, "Survey skipped");
    } else {
        tracing::info!(
            restaurant_id = id,
            hear_about_us = ?survey.hear_about_us,
            special_requirements = ?survey.special_requirements,
            improvements = ?survey.improvements,
            "Survey received"
        );
    }
    Ok(StatusCode::NO_CONTENT)
}
