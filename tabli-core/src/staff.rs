use serde::{Deserialize, Serialize};

use crate::restaurant::{City, MenuItem, RestaurantProfile, CUISINE_OPTIONS};
use crate::validation::{is_valid_email, is_valid_phone, FieldErrors, MIN_PASSWORD_LENGTH};

/// Tables a freshly signed-up restaurant starts with.
pub const SIGNUP_DEFAULT_TABLES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "Please enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("password", "Password must be at least 6 characters");
        }
        errors.into_result()
    }
}

/// Settings-screen password change for the signed-in staff member.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("current_password", &self.current_password),
            ("new_password", &self.new_password),
            ("confirm_password", &self.confirm_password),
        ] {
            if value.is_empty() {
                errors.add(field, "Please fill in all password fields");
            }
        }
        errors.clone().into_result()?;

        if self.new_password != self.confirm_password {
            errors.add("confirm_password", "New passwords do not match");
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("new_password", "New password must be at least 6 characters long");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub restaurant_name: String,
    pub restaurant_phone: String,
    pub restaurant_address: String,
    pub restaurant_city: City,
    pub restaurant_cuisine: String,
    pub license_number: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().chars().count() < 2 {
            errors.add("name", "Name must be at least 2 characters");
        }
        if !is_valid_email(&self.email) {
            errors.add("email", "Please enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("password", "Password must be at least 6 characters");
        }
        if self.restaurant_name.trim().chars().count() < 2 {
            errors.add("restaurant_name", "Restaurant name must be at least 2 characters");
        }
        if !is_valid_phone(self.restaurant_phone.trim()) {
            errors.add("restaurant_phone", "Please enter a valid phone number");
        }
        if self.restaurant_address.trim().chars().count() < 5 {
            errors.add("restaurant_address", "Please enter a valid address");
        }
        if !CUISINE_OPTIONS.contains(&self.restaurant_cuisine.as_str()) {
            errors.add("restaurant_cuisine", "Please select a cuisine");
        }
        if self.license_number.trim().chars().count() < 3 {
            errors.add("license_number", "Please enter a valid license number");
        }

        errors.into_result()
    }

    pub fn user(&self) -> StaffUser {
        StaffUser {
            name: self.name.trim().to_string(),
            email: self.email.clone(),
        }
    }

    /// Starting profile for the restaurant created by this signup.
    pub fn new_restaurant(&self, id: u32) -> RestaurantProfile {
        let name = self.restaurant_name.trim().to_string();
        let address = self.restaurant_address.trim();

        RestaurantProfile {
            id,
            description: format!("Welcome to {}! We're excited to serve you.", name),
            name,
            city: self.restaurant_city,
            cuisine: self.restaurant_cuisine.clone(),
            phone: self.restaurant_phone.trim().to_string(),
            email: self.email.clone(),
            location: format!("{}, {}", address, self.restaurant_city),
            address: Some(address.to_string()),
            rating: 4.0,
            weekly_average_customers: 25,
            price_range: "$".to_string(),
            opening_hours: "09:00".to_string(),
            closing_hours: "22:00".to_string(),
            image: "restaurant-generic".to_string(),
            cover_image: None,
            menu: vec![MenuItem {
                name: "House Special".to_string(),
                category: "Specials".to_string(),
                description: "Our signature dish".to_string(),
                price: 25,
            }],
            average_table_turn_minutes: crate::restaurant::DEFAULT_TABLE_TURN_MINUTES,
            max_hold_minutes: crate::restaurant::DEFAULT_MAX_HOLD_MINUTES,
            indoor_seating: true,
            outdoor_seating: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            name: "Layla Haddad".to_string(),
            email: "layla@oasis.ae".to_string(),
            password: "secret1".to_string(),
            restaurant_name: " Oasis Grill ".to_string(),
            restaurant_phone: "+971 3 555 0101".to_string(),
            restaurant_address: "12 Khalifa Street".to_string(),
            restaurant_city: City::AlAin,
            restaurant_cuisine: "Lebanese".to_string(),
            license_number: "AA-2291".to_string(),
        }
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginRequest { email: "staff@bellavista.ae".into(), password: "123456".into() };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest { email: "staff".into(), password: "12345".into() };
        let errors = bad.validate().unwrap_err();
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn test_change_password_validation() {
        let request = |current: &str, new: &str, confirm: &str| ChangePasswordRequest {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        };

        assert!(request("tabli123", "newpass1", "newpass1").validate().is_ok());

        let errors = request("", "newpass1", "newpass1").validate().unwrap_err();
        assert_eq!(errors.get("current_password"), Some("Please fill in all password fields"));

        let errors = request("tabli123", "newpass1", "newpass2").validate().unwrap_err();
        assert_eq!(errors.get("confirm_password"), Some("New passwords do not match"));

        let errors = request("tabli123", "abc", "abc").validate().unwrap_err();
        assert_eq!(errors.get("new_password"), Some("New password must be at least 6 characters long"));
        assert!(!errors.contains("confirm_password"));
    }

    #[test]
    fn test_signup_validation() {
        assert!(signup().validate().is_ok());

        let mut req = signup();
        req.restaurant_address = "Road".to_string();
        req.license_number = "A1".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.contains("restaurant_address"));
        assert!(errors.contains("license_number"));
    }

    #[test]
    fn test_signup_restaurant_defaults() {
        let profile = signup().new_restaurant(10);
        assert_eq!(profile.id, 10);
        assert_eq!(profile.name, "Oasis Grill");
        assert_eq!(profile.location, "12 Khalifa Street, Al Ain");
        assert_eq!(profile.rating, 4.0);
        assert_eq!(profile.price_range, "$");
        assert_eq!(profile.menu[0].name, "House Special");
        assert_eq!(profile.description, "Welcome to Oasis Grill! We're excited to serve you.");
    }
}
