use chrono::{DateTime, Utc};
use serde::Serialize;
use tabli_core::booking::SeatingPreference;
use tabli_core::restaurant::RestaurantStatus;
use tabli_core::{Contact, WaitBand};
use uuid::Uuid;

use crate::restaurant::{FloorStats, Restaurant};
use crate::tables::Table;

/// Dashboard row for a waiting party.
#[derive(Debug, Clone, Serialize)]
pub struct WaitingParty {
    pub id: Uuid,
    pub position: u32,
    pub customer_name: String,
    pub party_size: u8,
    pub contact: Contact,
    pub seating: SeatingPreference,
    pub joined_at: DateTime<Utc>,
    pub wait_minutes: i64,
    pub estimated_wait: WaitBand,
    pub called: bool,
    pub held_until: Option<DateTime<Utc>>,
    pub hold_seconds_remaining: Option<i64>,
}

/// Dashboard row for an occupied table.
#[derive(Debug, Clone, Serialize)]
pub struct SeatedRow {
    pub id: Uuid,
    pub label: String,
    pub capacity: u32,
    pub guest_name: String,
    pub party_size: u32,
    pub seated_at: DateTime<Utc>,
    pub duration: String,
}

/// Everything the staff dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct FloorSnapshot {
    pub restaurant_id: u32,
    pub status: RestaurantStatus,
    pub waitlist: Vec<WaitingParty>,
    pub seated: Vec<SeatedRow>,
    pub available: Vec<Table>,
}

impl FloorSnapshot {
    pub fn of(restaurant: &Restaurant, now: DateTime<Utc>) -> Self {
        let waitlist = restaurant
            .waitlist()
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let position = i as u32 + 1;
                WaitingParty {
                    id: entry.id,
                    position,
                    customer_name: entry.customer_name.clone(),
                    party_size: entry.party_size,
                    contact: entry.contact.clone(),
                    seating: entry.seating,
                    joined_at: entry.joined_at,
                    wait_minutes: entry.waited(now).num_minutes(),
                    estimated_wait: restaurant.estimate_for(position),
                    called: entry.is_called(),
                    held_until: entry.held_until,
                    hold_seconds_remaining: entry.hold_remaining(now).map(|d| d.num_seconds()),
                }
            })
            .collect();

        let seated = restaurant
            .tables()
            .seated()
            .iter()
            .map(|t| SeatedRow {
                id: t.id,
                label: t.label.clone(),
                capacity: t.capacity,
                guest_name: t.guest_name.clone(),
                party_size: t.party_size,
                seated_at: t.seated_at,
                duration: t.duration_label(now),
            })
            .collect();

        Self {
            restaurant_id: restaurant.id(),
            status: restaurant.status(),
            waitlist,
            seated,
            available: restaurant.tables().available().to_vec(),
        }
    }
}

/// Floor analytics for the staff dashboard header.
#[derive(Debug, Clone, Serialize)]
pub struct FloorSummary {
    pub restaurant_id: u32,
    pub status: RestaurantStatus,
    pub waiting_parties: u32,
    pub waiting_guests: u32,
    pub called_parties: u32,
    pub seated_tables: u32,
    pub available_tables: u32,
    pub total_tables: u32,
    pub seated_guests: u32,
    pub seating_capacity: u32,
    pub occupancy_percent: f64,
    pub next_party_wait: WaitBand,
    pub longest_wait_minutes: i64,
    pub stats: FloorStats,
    pub generated_at: DateTime<Utc>,
}

impl FloorSummary {
    pub fn of(restaurant: &Restaurant, now: DateTime<Utc>) -> Self {
        let waitlist = restaurant.waitlist();
        let tables = restaurant.tables();

        Self {
            restaurant_id: restaurant.id(),
            status: restaurant.status(),
            waiting_parties: waitlist.len() as u32,
            waiting_guests: waitlist.waiting_guests(),
            called_parties: waitlist.entries().iter().filter(|e| e.is_called()).count() as u32,
            seated_tables: tables.seated().len() as u32,
            available_tables: tables.available().len() as u32,
            total_tables: tables.total() as u32,
            seated_guests: tables.seated_guests(),
            seating_capacity: tables.seating_capacity(),
            // One decimal place
            occupancy_percent: (tables.occupancy() * 1000.0).round() / 10.0,
            next_party_wait: restaurant.next_party_wait(),
            longest_wait_minutes: waitlist
                .entries()
                .iter()
                .map(|e| e.waited(now).num_minutes())
                .max()
                .unwrap_or(0),
            stats: restaurant.stats(),
            generated_at: now,
        }
    }
}
