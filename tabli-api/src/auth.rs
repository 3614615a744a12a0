use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use tabli_core::staff::{ChangePasswordRequest, LoginRequest, SignupRequest, StaffUser, SIGNUP_DEFAULT_TABLES};
use tabli_floor::{FloorError, Restaurant};
use tabli_store::StaffSession;

use crate::{error::AppError, middleware::issue_token, state::AppState};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: StaffUser,
    pub restaurant_id: u32,
    pub expires_at: chrono::DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/staff/login", post(login))
        .route("/v1/staff/signup", post(signup))
}

/// Routes that require a staff session.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/staff/logout", post(logout))
        .route("/v1/staff/password", post(change_password))
}

async fn start_session(state: &AppState, user: StaffUser, restaurant_id: u32) -> Result<AuthResponse, AppError> {
    let session = StaffSession::new(user, restaurant_id, Duration::seconds(state.auth.expiration as i64), Utc::now());
    state.sessions.init(&session).await?;
    let token = issue_token(state, &session)?;

    Ok(AuthResponse {
        token,
        user: session.user,
        restaurant_id,
        expires_at: session.expires_at,
    })
}

async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Json<AuthResponse>, AppError> {
    req.validate()?;
    let account = state.accounts.authenticate(&req.email, &req.password).await?;
    Ok(Json(start_session(&state, account.user, account.restaurant_id).await?))
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()?;

    let floor = state.floor.clone();
    let restaurant_id = state
        .directory
        .create(|id| {
            let mut profile = req.new_restaurant(id);
            profile.average_table_turn_minutes = floor.default_turnover_minutes;
            profile.max_hold_minutes = floor.default_hold_minutes;

            let mut restaurant = Restaurant::new(profile);
            for n in 1..=SIGNUP_DEFAULT_TABLES {
                restaurant.add_table(&format!("Table {}", n), 4)?;
            }
            Ok::<_, FloorError>(restaurant)
        })
        .await?;

    // Duplicate emails are refused here, so the restaurant is withdrawn
    let account = match state.accounts.register(req.user(), &req.password, restaurant_id).await {
        Ok(account) => account,
        Err(e) => {
            state.directory.remove(restaurant_id).await?;
            tracing::warn!(restaurant_id, "Signup rejected, restaurant withdrawn: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!(restaurant_id, "Restaurant created by signup");

    let response = start_session(&state, account.user, restaurant_id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn logout(State(state): State<AppState>, Extension(session): Extension<StaffSession>) -> Result<StatusCode, AppError> {
    state.sessions.clear(&session.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_password(
    State(state): State<AppState>,
    Extension(session): Extension<StaffSession>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()?;
    state
        .accounts
        .change_password(&session.user.email, &req.current_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
