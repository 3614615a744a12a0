use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    http::StatusCode,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tabli_store::StaffSession;
use uuid::Uuid;

use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StaffClaims {
    pub sub: String,
    pub name: String,
    pub restaurant_id: u32,
    /// Session the token belongs to; logout invalidates it
    pub sid: Uuid,
    pub exp: usize,
}

impl StaffClaims {
    pub fn for_session(session: &StaffSession) -> Self {
        Self {
            sub: session.user.email.clone(),
            name: session.user.name.clone(),
            restaurant_id: session.restaurant_id,
            sid: session.session_id,
            exp: session.expires_at.timestamp() as usize,
        }
    }
}

pub fn issue_token(state: &AppState, session: &StaffSession) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        &StaffClaims::for_session(session),
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
}

// ============================================================================
// Staff Authentication Middleware
// ============================================================================

pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract token from Authorization header
    let auth_header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Decode and validate JWT
    let token_data = decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    ).map_err(|_| StatusCode::UNAUTHORIZED)?;

    // 3. The session must still exist; logout deletes it
    let session = state
        .sessions
        .load(&token_data.claims.sid, Utc::now())
        .await
        .map_err(|e| {
            tracing::error!("Session lookup failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if session.restaurant_id != token_data.claims.restaurant_id {
        return Err(StatusCode::FORBIDDEN);
    }

    // 4. Inject claims and session into request extensions
    req.extensions_mut().insert(token_data.claims);
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
