use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tabli_core::qr::CheckInError;
use tabli_core::{BookingError, CoreError, FieldErrors};
use tabli_floor::{FloorError, TableError, WaitlistError};
use tabli_store::StoreError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    /// Field-level form errors, rendered with a `fields` map
    Unprocessable(String, FieldErrors),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    fn field(field: &str, message: String) -> Self {
        AppError::Unprocessable(message.clone(), FieldErrors::single(field, message))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(msg, fields) => {
                let body = Json(json!({
                    "error": msg,
                    "fields": fields,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Unprocessable("Please fix the highlighted fields".to_string(), errors)
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        let msg = err.to_string();
        match err {
            TableError::NotFound(_) => AppError::NotFoundError(msg),
            TableError::InvalidName(_) => AppError::field("name", msg),
            TableError::InvalidCapacity(_) => AppError::field("capacity", msg),
            TableError::InvalidPartySize(_) | TableError::ExceedsCapacity { .. } => AppError::field("party_size", msg),
            TableError::NameTaken(_) | TableError::DuplicateId(_) | TableError::Occupied(_) | TableError::NotSeated(_) => {
                AppError::ConflictError(msg)
            }
        }
    }
}

impl From<WaitlistError> for AppError {
    fn from(err: WaitlistError) -> Self {
        let msg = err.to_string();
        match err {
            WaitlistError::NotFound(_) => AppError::NotFoundError(msg),
            WaitlistError::Duplicate(_) | WaitlistError::Empty | WaitlistError::AllCalled => AppError::ConflictError(msg),
        }
    }
}

impl From<FloorError> for AppError {
    fn from(err: FloorError) -> Self {
        match err {
            FloorError::Table(e) => e.into(),
            FloorError::Waitlist(e) => e.into(),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Invalid(fields) => fields.into(),
            BookingError::RestaurantNotFound(_) => AppError::NotFoundError(err.to_string()),
            BookingError::ReservationsClosed(_) => AppError::ConflictError(err.to_string()),
            BookingError::Unavailable(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(fields) => fields.into(),
            CoreError::NotFound(_) => AppError::NotFoundError(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RestaurantNotFound(_) => AppError::NotFoundError(err.to_string()),
            StoreError::EmailTaken(_) => AppError::ConflictError(err.to_string()),
            StoreError::InvalidCredentials => AppError::AuthenticationError(err.to_string()),
            other => AppError::Anyhow(other.into()),
        }
    }
}

impl From<CheckInError> for AppError {
    fn from(err: CheckInError) -> Self {
        match err {
            CheckInError::NotAScan => AppError::ValidationError(err.to_string()),
            CheckInError::MissingRestaurant | CheckInError::MalformedRestaurant(_) => {
                AppError::NotFoundError(err.to_string())
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::InternalServerError(format!("Token handling failed: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_floor_errors_map_to_status() {
        let cases = [
            (AppError::from(TableError::NotFound(Uuid::new_v4())), StatusCode::NOT_FOUND),
            (AppError::from(TableError::Occupied("Table 5".into())), StatusCode::CONFLICT),
            (AppError::from(TableError::InvalidCapacity(30)), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::from(WaitlistError::Empty), StatusCode::CONFLICT),
            (AppError::from(StoreError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (AppError::from(CheckInError::MissingRestaurant), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
