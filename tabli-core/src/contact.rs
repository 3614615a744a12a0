use serde::{Deserialize, Serialize};
use tabli_shared::Masked;

use crate::validation::{is_valid_email, is_valid_phone, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Phone,
    Email,
}

/// How a party wants to be reached when their table is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub method: ContactMethod,
    pub value: String,
}

impl Contact {
    pub fn phone(value: impl Into<String>) -> Self {
        Self { method: ContactMethod::Phone, value: value.into() }
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self { method: ContactMethod::Email, value: value.into() }
    }

    /// Log-safe view of the destination.
    pub fn masked(&self) -> Masked<&str> {
        Masked(self.value.as_str())
    }

    pub fn validate_into(&self, errors: &mut FieldErrors) {
        match self.method {
            ContactMethod::Phone if !is_valid_phone(&self.value) => {
                errors.add("phone", "Please enter a valid phone number");
            }
            ContactMethod::Email if !is_valid_email(&self.value) => {
                errors.add("email", "Please enter a valid email address");
            }
            _ => {}
        }
    }
}
