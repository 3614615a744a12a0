use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{is_valid_email, is_valid_phone, FieldErrors};
use crate::wait::WaitBand;
use crate::{CoreError, CoreResult};

pub const CUISINE_OPTIONS: [&str; 14] = [
    "Italian", "Asian", "Pizza", "Café", "Healthy", "Seafood", "BBQ", "Mexican", "Indian",
    "Chinese", "Japanese", "Lebanese", "French", "American",
];

pub const DEFAULT_TABLE_TURN_MINUTES: u32 = 45;
pub const DEFAULT_MAX_HOLD_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Al Ain")]
    AlAin,
    #[serde(rename = "Abu Dhabi")]
    AbuDhabi,
    Dubai,
}

impl City {
    pub fn as_str(&self) -> &'static str {
        match self {
            City::AlAin => "Al Ain",
            City::AbuDhabi => "Abu Dhabi",
            City::Dubai => "Dubai",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived from the table inventory, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestaurantStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "waitlist")]
    WaitlistOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Whole dirhams
    pub price: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: Option<u32>,
}

/// Everything about a restaurant that staff edit by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantProfile {
    pub id: u32,
    pub name: String,
    pub city: City,
    pub cuisine: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    pub rating: f32,
    pub weekly_average_customers: u32,
    pub price_range: String,
    pub opening_hours: String,
    pub closing_hours: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default = "default_turn_minutes")]
    pub average_table_turn_minutes: u32,
    #[serde(default = "default_hold_minutes")]
    pub max_hold_minutes: u32,
    #[serde(default)]
    pub indoor_seating: bool,
    #[serde(default)]
    pub outdoor_seating: bool,
}

fn default_turn_minutes() -> u32 {
    DEFAULT_TABLE_TURN_MINUTES
}

fn default_hold_minutes() -> u32 {
    DEFAULT_MAX_HOLD_MINUTES
}

/// Partial settings update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub city: Option<City>,
    pub cuisine: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub opening_hours: Option<String>,
    pub closing_hours: Option<String>,
    pub cover_image: Option<String>,
    pub average_table_turn_minutes: Option<u32>,
    pub max_hold_minutes: Option<u32>,
    pub indoor_seating: Option<bool>,
    pub outdoor_seating: Option<bool>,
}

impl RestaurantUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            if name.trim().chars().count() < 2 {
                errors.add("name", "Restaurant name must be at least 2 characters");
            }
        }
        if let Some(cuisine) = &self.cuisine {
            if !CUISINE_OPTIONS.contains(&cuisine.as_str()) {
                errors.add("cuisine", "Unknown cuisine");
            }
        }
        if let Some(phone) = &self.phone {
            if !is_valid_phone(phone.trim()) {
                errors.add("phone", "Please enter a valid phone number");
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                errors.add("email", "Please enter a valid email address");
            }
        }
        if let Some(price_range) = &self.price_range {
            if price_range.is_empty() || price_range.len() > 4 || price_range.chars().any(|c| c != '$') {
                errors.add("price_range", "Price range must be between $ and $$$$");
            }
        }
        for (field, value) in [("opening_hours", &self.opening_hours), ("closing_hours", &self.closing_hours)] {
            if let Some(value) = value {
                if parse_hours(value).is_none() {
                    errors.add(field, "Hours must use HH:MM");
                }
            }
        }
        if self.average_table_turn_minutes == Some(0) {
            errors.add("average_table_turn_minutes", "Table turn time must be at least 1 minute");
        }
        if self.max_hold_minutes == Some(0) {
            errors.add("max_hold_minutes", "Hold time must be at least 1 minute");
        }

        errors.into_result()
    }
}

fn parse_hours(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

impl RestaurantProfile {
    /// Validates the whole update first; nothing is applied if any field is rejected.
    pub fn apply(&mut self, update: RestaurantUpdate) -> Result<(), FieldErrors> {
        update.validate()?;

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(cuisine) = update.cuisine {
            self.cuisine = cuisine;
        }
        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(price_range) = update.price_range {
            self.price_range = price_range;
        }
        if let Some(opening) = update.opening_hours {
            self.opening_hours = opening;
        }
        if let Some(closing) = update.closing_hours {
            self.closing_hours = closing;
        }
        if let Some(cover) = update.cover_image {
            self.cover_image = Some(cover);
        }
        if let Some(turn) = update.average_table_turn_minutes {
            self.average_table_turn_minutes = turn;
        }
        if let Some(hold) = update.max_hold_minutes {
            self.max_hold_minutes = hold;
        }
        if let Some(indoor) = update.indoor_seating {
            self.indoor_seating = indoor;
        }
        if let Some(outdoor) = update.outdoor_seating {
            self.outdoor_seating = outdoor;
        }
        Ok(())
    }

    pub fn add_menu_item(&mut self, item: MenuItemCreate) -> Result<&MenuItem, FieldErrors> {
        let mut errors = FieldErrors::new();
        if item.name.trim().is_empty() {
            errors.add("name", "Menu item name is required");
        }
        if item.category.trim().is_empty() {
            errors.add("category", "Menu item category is required");
        }
        if item.price.is_none() {
            errors.add("price", "Menu item price is required");
        }
        errors.into_result()?;

        self.menu.push(MenuItem {
            name: item.name.trim().to_string(),
            category: item.category.trim().to_string(),
            description: item.description.unwrap_or_default(),
            price: item.price.unwrap_or_default(),
        });
        Ok(&self.menu[self.menu.len() - 1])
    }

    pub fn remove_menu_item(&mut self, index: usize) -> CoreResult<MenuItem> {
        if index >= self.menu.len() {
            return Err(CoreError::NotFound(format!("menu item {}", index)));
        }
        Ok(self.menu.remove(index))
    }

    /// Opening time as parsed from the stored hours, if well-formed.
    pub fn opens_at(&self) -> Option<NaiveTime> {
        parse_hours(&self.opening_hours)
    }

    pub fn closes_at(&self) -> Option<NaiveTime> {
        parse_hours(&self.closing_hours)
    }

    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        match (self.opens_at(), self.closes_at()) {
            (Some(open), Some(close)) if open <= close => time >= open && time < close,
            // Past midnight
            (Some(open), Some(close)) => time >= open || time < close,
            _ => false,
        }
    }
}

/// Customer-facing listing row: profile basics plus live floor numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub id: u32,
    pub name: String,
    pub city: City,
    pub cuisine: String,
    pub location: String,
    pub rating: f32,
    pub image: String,
    pub price_range: String,
    pub status: RestaurantStatus,
    pub tables_available: u32,
    pub waiting_in_line: u32,
    pub weekly_average_customers: u32,
    /// Estimate for a party joining the queue now; only set while waitlist-only.
    pub estimated_wait: Option<WaitBand>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::profile;
    use super::*;

    #[test]
    fn test_city_wire_names() {
        assert_eq!(serde_json::to_string(&City::AbuDhabi).unwrap(), "\"Abu Dhabi\"");
        let city: City = serde_json::from_str("\"Al Ain\"").unwrap();
        assert_eq!(city, City::AlAin);
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut restaurant = profile(1, "Bella Vista");
        let update = RestaurantUpdate {
            name: Some("Bella Vista Italian".to_string()),
            opening_hours: Some("25:99".to_string()),
            ..Default::default()
        };

        let errors = restaurant.apply(update).unwrap_err();
        assert!(errors.contains("opening_hours"));
        assert_eq!(restaurant.name, "Bella Vista");
    }

    #[test]
    fn test_update_applies_fields() {
        let mut restaurant = profile(1, "Bella Vista");
        restaurant
            .apply(RestaurantUpdate {
                cuisine: Some("Seafood".to_string()),
                max_hold_minutes: Some(15),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(restaurant.cuisine, "Seafood");
        assert_eq!(restaurant.max_hold_minutes, 15);
    }

    #[test]
    fn test_menu_add_requires_fields() {
        let mut restaurant = profile(1, "Bella Vista");
        let errors = restaurant
            .add_menu_item(MenuItemCreate {
                name: "Tiramisu".to_string(),
                category: " ".to_string(),
                description: None,
                price: None,
            })
            .unwrap_err();
        assert!(errors.contains("category"));
        assert!(errors.contains("price"));
        assert!(restaurant.menu.is_empty());

        restaurant
            .add_menu_item(MenuItemCreate {
                name: "Tiramisu".to_string(),
                category: "Desserts".to_string(),
                description: None,
                price: Some(12),
            })
            .unwrap();
        assert_eq!(restaurant.menu.len(), 1);
        assert_eq!(restaurant.remove_menu_item(0).unwrap().name, "Tiramisu");
        assert!(restaurant.remove_menu_item(0).is_err());
    }

    #[test]
    fn test_opening_hours() {
        let mut restaurant = profile(1, "Bella Vista");
        assert!(restaurant.is_open_at(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
        assert!(!restaurant.is_open_at(NaiveTime::from_hms_opt(22, 0, 0).unwrap()));

        restaurant.opening_hours = "18:00".to_string();
        restaurant.closing_hours = "02:00".to_string();
        assert!(restaurant.is_open_at(NaiveTime::from_hms_opt(1, 0, 0).unwrap()));
        assert!(!restaurant.is_open_at(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    }
}
