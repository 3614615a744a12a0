use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contact::Contact;
use crate::validation::FieldErrors;
use crate::wait::WaitBand;

pub const MIN_PARTY_SIZE: i32 = 1;
pub const MAX_PARTY_SIZE: i32 = 12;
pub const DEFAULT_GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingMode {
    Reserve,
    Waitlist,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatingPreference {
    Indoor,
    Outdoor,
    #[default]
    NoPreference,
}

/// Raw booking form as submitted by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub mode: BookingMode,
    pub party_size: i32,
    pub contact: Contact,
    #[serde(default)]
    pub seating: SeatingPreference,
    #[serde(default)]
    pub guest_name: Option<String>,
}

impl BookingRequest {
    pub fn validate(self) -> Result<ValidBooking, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&self.party_size) {
            errors.add(
                "party_size",
                format!("Party size must be between {} and {}", MIN_PARTY_SIZE, MAX_PARTY_SIZE),
            );
        }
        self.contact.validate_into(&mut errors);
        errors.into_result()?;

        let guest_name = self
            .guest_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_GUEST_NAME)
            .to_string();

        Ok(ValidBooking {
            mode: self.mode,
            party_size: self.party_size as u8,
            contact: self.contact,
            seating: self.seating,
            guest_name,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.clone().validate().is_ok()
    }
}

/// A booking that passed form validation. Party size is within 1..=12.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub mode: BookingMode,
    pub party_size: u8,
    pub contact: Contact,
    pub seating: SeatingPreference,
    pub guest_name: String,
}

impl ValidBooking {
    pub fn into_payload(self, restaurant_id: u32, queue: Option<QueueSnapshot>) -> BookingPayload {
        BookingPayload {
            id: Uuid::new_v4(),
            restaurant_id,
            mode: self.mode,
            party_size: self.party_size,
            contact: self.contact,
            seating: self.seating,
            guest_name: self.guest_name,
            queue,
            submitted_at: Utc::now(),
        }
    }
}

/// Where a waitlist booking landed at the moment it was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub entry_id: Uuid,
    pub position: u32,
    pub estimated_wait: WaitBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingPayload {
    pub id: Uuid,
    pub restaurant_id: u32,
    pub mode: BookingMode,
    pub party_size: u8,
    pub contact: Contact,
    pub seating: SeatingPreference,
    pub guest_name: String,
    pub queue: Option<QueueSnapshot>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub restaurant_id: u32,
    pub mode: BookingMode,
    pub queue_position: Option<u32>,
    pub estimated_wait: Option<WaitBand>,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid booking request: {0}")]
    Invalid(FieldErrors),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(u32),

    #[error("Restaurant {0} is waitlist-only, reservations are closed")]
    ReservationsClosed(u32),

    #[error("Booking gateway unavailable: {0}")]
    Unavailable(String),
}

impl From<FieldErrors> for BookingError {
    fn from(errors: FieldErrors) -> Self {
        BookingError::Invalid(errors)
    }
}

/// Boundary to whatever system of record takes bookings.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn submit(&self, payload: BookingPayload) -> Result<BookingConfirmation, BookingError>;
}

/// Confirms every booking and records it in the log only.
pub struct LoggingBookingGateway;

#[async_trait]
impl BookingGateway for LoggingBookingGateway {
    async fn submit(&self, payload: BookingPayload) -> Result<BookingConfirmation, BookingError> {
        tracing::info!(
            booking_id = %payload.id,
            restaurant_id = payload.restaurant_id,
            mode = ?payload.mode,
            party_size = payload.party_size,
            seating = ?payload.seating,
            contact = %payload.contact.masked(),
            position = ?payload.queue.map(|q| q.position),
            "Booking received"
        );

        let message = match payload.mode {
            BookingMode::Reserve => {
                "Your reservation request has been submitted! We'll contact you shortly with confirmation."
            }
            BookingMode::Waitlist => {
                "You've been added to the waitlist! We'll notify you when your table is ready."
            }
        };

        Ok(BookingConfirmation {
            booking_id: payload.id,
            restaurant_id: payload.restaurant_id,
            mode: payload.mode,
            queue_position: payload.queue.map(|q| q.position),
            estimated_wait: payload.queue.map(|q| q.estimated_wait),
            message: message.to_string(),
            received_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(party_size: i32, contact: Contact) -> BookingRequest {
        BookingRequest {
            mode: BookingMode::Reserve,
            party_size,
            contact,
            seating: SeatingPreference::NoPreference,
            guest_name: None,
        }
    }

    #[test]
    fn test_party_size_bounds() {
        for size in [-1, 0, 13, 40] {
            let errors = request(size, Contact::phone("5551234567")).validate().unwrap_err();
            assert_eq!(errors.get("party_size"), Some("Party size must be between 1 and 12"));
        }
        for size in [1, 6, 12] {
            assert!(request(size, Contact::phone("5551234567")).is_valid());
        }
    }

    #[test]
    fn test_party_size_invalid_even_with_good_contact() {
        let errors = request(0, Contact::email("sarah@example.com")).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("party_size"));
    }

    #[test]
    fn test_phone_digits() {
        assert!(!request(2, Contact::phone("555123456")).is_valid());
        assert!(request(2, Contact::phone("5551234567")).is_valid());
        assert!(request(2, Contact::phone("+971501234567")).is_valid());
    }

    #[test]
    fn test_email_contact() {
        assert!(request(2, Contact::email("sarah@example.com")).is_valid());
        let errors = request(2, Contact::email("sarah@example")).validate().unwrap_err();
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_guest_name_defaults() {
        let mut req = request(4, Contact::phone("5551234567"));
        req.guest_name = Some("   ".to_string());
        assert_eq!(req.validate().unwrap().guest_name, DEFAULT_GUEST_NAME);
    }

    #[tokio::test]
    async fn test_logging_gateway_confirms_waitlist_snapshot() {
        let mut req = request(3, Contact::phone("5551234567"));
        req.mode = BookingMode::Waitlist;
        let snapshot = QueueSnapshot {
            entry_id: Uuid::new_v4(),
            position: 3,
            estimated_wait: WaitBand::OverFifty,
        };
        let payload = req.validate().unwrap().into_payload(2, Some(snapshot));
        let booking_id = payload.id;

        let confirmation = LoggingBookingGateway.submit(payload).await.unwrap();
        assert_eq!(confirmation.booking_id, booking_id);
        assert_eq!(confirmation.queue_position, Some(3));
        assert_eq!(confirmation.estimated_wait, Some(WaitBand::OverFifty));
        assert!(confirmation.message.contains("waitlist"));
    }
}
