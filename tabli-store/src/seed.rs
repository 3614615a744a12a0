//! Demo data the service boots with.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tabli_core::booking::SeatingPreference;
use tabli_core::restaurant::{City, MenuItem, RestaurantProfile, DEFAULT_MAX_HOLD_MINUTES, DEFAULT_TABLE_TURN_MINUTES};
use tabli_core::staff::StaffUser;
use tabli_core::Contact;
use tabli_floor::{QueueEntry, Restaurant, SeatedTable, TableInventory, Waitlist};
use uuid::Uuid;

use crate::accounts::StaffAccounts;
use crate::StoreError;

const SEED: &str = include_str!("../seed/restaurants.json");

const GUEST_NAMES: [&str; 12] = [
    "Omar Al Mansoori", "Priya Nair", "James Carter", "Fatima Hassan", "Chen Wei", "Noura Saeed",
    "Daniel Ortiz", "Aisha Rahman", "Tom Becker", "Mariam Khalil", "Ravi Patel", "Hannah Lee",
];

#[derive(Debug, Deserialize)]
struct SeedFile {
    defaults: SeedDefaults,
    staff: Vec<SeedStaff>,
    restaurants: Vec<SeedRestaurant>,
}

#[derive(Debug, Deserialize)]
struct SeedDefaults {
    phone: String,
    email: String,
    address: String,
    price_range: String,
    opening_hours: String,
    closing_hours: String,
    menu: Vec<MenuItem>,
}

#[derive(Debug, Deserialize)]
struct SeedStaff {
    name: String,
    email: String,
    password: String,
    restaurant_id: u32,
}

#[derive(Debug, Deserialize)]
struct SeedRestaurant {
    id: u32,
    name: String,
    location: String,
    city: City,
    cuisine: String,
    rating: f32,
    weekly_average_customers: u32,
    image: String,
    description: String,
    #[serde(default)]
    free_tables: u32,
    #[serde(default)]
    waiting: u32,
    /// Explicit floor; overrides the generated one
    #[serde(default)]
    floor: Option<SeedFloor>,
}

#[derive(Debug, Deserialize)]
struct SeedFloor {
    tables: Vec<SeedTable>,
    seated: Vec<SeedSeated>,
    waitlist: Vec<SeedParty>,
}

#[derive(Debug, Deserialize)]
struct SeedTable {
    label: String,
    capacity: u32,
}

#[derive(Debug, Deserialize)]
struct SeedSeated {
    label: String,
    capacity: u32,
    guest_name: String,
    party_size: u32,
    seated_minutes_ago: i64,
}

#[derive(Debug, Deserialize)]
struct SeedParty {
    customer_name: String,
    party_size: u8,
    phone: String,
    joined_minutes_ago: i64,
}

/// Parsed seed data, ready to load.
pub struct Seed {
    pub restaurants: Vec<Restaurant>,
    staff: Vec<SeedStaff>,
}

impl Seed {
    pub fn load(now: DateTime<Utc>) -> Result<Self, StoreError> {
        let file: SeedFile = serde_json::from_str(SEED)?;
        let restaurants = file
            .restaurants
            .into_iter()
            .map(|r| build_restaurant(&file.defaults, r, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            restaurants,
            staff: file.staff,
        })
    }

    pub async fn register_staff(&self, accounts: &StaffAccounts) -> Result<(), StoreError> {
        for staff in &self.staff {
            let user = StaffUser {
                name: staff.name.clone(),
                email: staff.email.clone(),
            };
            accounts.register(user, &staff.password, staff.restaurant_id).await?;
        }
        Ok(())
    }
}

fn build_restaurant(defaults: &SeedDefaults, seed: SeedRestaurant, now: DateTime<Utc>) -> Result<Restaurant, StoreError> {
    let profile = RestaurantProfile {
        id: seed.id,
        name: seed.name,
        city: seed.city,
        cuisine: seed.cuisine,
        phone: defaults.phone.clone(),
        email: defaults.email.clone(),
        description: seed.description,
        location: seed.location,
        address: Some(defaults.address.clone()),
        rating: seed.rating,
        weekly_average_customers: seed.weekly_average_customers,
        price_range: defaults.price_range.clone(),
        opening_hours: defaults.opening_hours.clone(),
        closing_hours: defaults.closing_hours.clone(),
        image: seed.image,
        cover_image: None,
        menu: defaults.menu.clone(),
        average_table_turn_minutes: DEFAULT_TABLE_TURN_MINUTES,
        max_hold_minutes: DEFAULT_MAX_HOLD_MINUTES,
        indoor_seating: true,
        outdoor_seating: true,
    };

    let floor = seed
        .floor
        .unwrap_or_else(|| generated_floor(seed.id, seed.free_tables, seed.waiting));

    let mut tables = TableInventory::new();
    for table in floor.tables {
        tables.add_table(&table.label, table.capacity).map_err(|e| seed_error(profile.id, e))?;
    }
    for seated in floor.seated {
        tables
            .insert_seated(SeatedTable {
                id: Uuid::new_v4(),
                label: seated.label,
                capacity: seated.capacity,
                guest_name: seated.guest_name,
                party_size: seated.party_size,
                seated_at: now - Duration::minutes(seated.seated_minutes_ago),
                queue_entry_id: None,
            })
            .map_err(|e| seed_error(profile.id, e))?;
    }

    // Listed in arrival order
    let mut waitlist = Waitlist::new();
    for party in floor.waitlist {
        let entry = QueueEntry::new(
            party.customer_name,
            party.party_size,
            Contact::phone(party.phone),
            SeatingPreference::NoPreference,
            now - Duration::minutes(party.joined_minutes_ago),
        );
        waitlist.restore(entry).map_err(|e| seed_error(profile.id, e))?;
    }

    Ok(Restaurant::with_floor(profile, waitlist, tables))
}

fn generated_floor(restaurant_id: u32, free_tables: u32, waiting: u32) -> SeedFloor {
    let tables = (1..=free_tables)
        .map(|n| SeedTable {
            label: format!("Table {}", n),
            capacity: [2, 4, 6][(n as usize) % 3],
        })
        .collect();

    let waitlist = (0..waiting)
        .map(|i| SeedParty {
            customer_name: GUEST_NAMES[(i as usize + restaurant_id as usize) % GUEST_NAMES.len()].to_string(),
            party_size: (i % 5) as u8 + 2,
            phone: format!("(555) {:03}-{:04}", 600 + restaurant_id, 1000 + i),
            joined_minutes_ago: 5 * (waiting - i) as i64,
        })
        .collect();

    SeedFloor {
        tables,
        seated: Vec::new(),
        waitlist,
    }
}

fn seed_error(restaurant_id: u32, err: impl std::fmt::Display) -> StoreError {
    StoreError::Seed(format!("restaurant {}: {}", restaurant_id, err))
}
