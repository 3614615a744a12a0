pub mod booking;
pub mod contact;
pub mod locale;
pub mod notification;
pub mod qr;
pub mod restaurant;
pub mod search;
pub mod staff;
pub mod survey;
pub mod validation;
pub mod wait;

pub use booking::{BookingGateway, BookingRequest, BookingConfirmation, BookingError, LoggingBookingGateway};
pub use contact::{Contact, ContactMethod};
pub use notification::{NotificationDispatcher, SimulatedDispatcher};
pub use restaurant::{RestaurantProfile, RestaurantSummary, RestaurantStatus, City, MenuItem};
pub use validation::FieldErrors;
pub use wait::{estimate_wait, WaitBand};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(#[from] FieldErrors),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
