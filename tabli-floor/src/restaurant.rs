use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabli_core::booking::{BookingMode, QueueSnapshot, ValidBooking};
use tabli_core::restaurant::{RestaurantProfile, RestaurantStatus, RestaurantSummary};
use tabli_core::{estimate_wait, BookingError, Contact, WaitBand};
use tabli_shared::{FloorEvent, FloorEventKind};
use uuid::Uuid;

use crate::tables::{SeatedTable, Table, TableError, TableInventory};
use crate::waitlist::{Departure, HoldReminder, QueueEntry, Waitlist, WaitlistError};

/// Counters since the process started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorStats {
    pub parties_joined: u32,
    pub parties_seated: u32,
    pub walk_ins_seated: u32,
    pub no_shows: u32,
    pub removals: u32,
    pub checkouts: u32,
}

/// A waiting party whose position moved after someone ahead left.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueUpdate {
    pub entry_id: Uuid,
    pub contact: Contact,
    pub position: u32,
    pub estimated_wait: WaitBand,
}

/// Result of a party leaving the queue.
#[derive(Debug, Clone)]
pub struct QueueChange {
    pub departure: Departure,
    /// Destination table, when staff seated the party at one
    pub table: Option<SeatedTable>,
    pub updates: Vec<QueueUpdate>,
}

#[derive(Debug, Clone)]
pub struct CalledParty {
    pub entry: QueueEntry,
    pub hold_minutes: u32,
}

/// What one hold sweep did to a restaurant's queue.
#[derive(Debug, Clone, Default)]
pub struct HoldSweep {
    pub expired: Vec<Departure>,
    pub reminders: Vec<HoldReminder>,
    pub updates: Vec<QueueUpdate>,
}

impl HoldSweep {
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.reminders.is_empty()
    }
}

/// One restaurant: its profile plus the live queue and tables.
///
/// Every floor mutation goes through here so that listing numbers
/// (status, tables available, waiting in line) are always derived from
/// the same state the staff dashboard edits. Mutations append
/// [`FloorEvent`]s which the caller drains with [`Restaurant::take_events`].
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub profile: RestaurantProfile,
    waitlist: Waitlist,
    tables: TableInventory,
    stats: FloorStats,
    events: Vec<FloorEvent>,
}

impl Restaurant {
    pub fn new(profile: RestaurantProfile) -> Self {
        Self::with_floor(profile, Waitlist::new(), TableInventory::new())
    }

    pub fn with_floor(profile: RestaurantProfile, waitlist: Waitlist, tables: TableInventory) -> Self {
        Self {
            profile,
            waitlist,
            tables,
            stats: FloorStats::default(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.profile.id
    }

    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    pub fn tables(&self) -> &TableInventory {
        &self.tables
    }

    pub fn stats(&self) -> FloorStats {
        self.stats
    }

    pub fn status(&self) -> RestaurantStatus {
        if self.tables.available().is_empty() {
            RestaurantStatus::WaitlistOnly
        } else {
            RestaurantStatus::Available
        }
    }

    pub fn estimate_for(&self, position: u32) -> WaitBand {
        estimate_wait(position, Some(self.profile.average_table_turn_minutes as f64))
    }

    /// Estimate for a party that joins the line now.
    pub fn next_party_wait(&self) -> WaitBand {
        self.estimate_for(self.waitlist.len() as u32 + 1)
    }

    pub fn summary(&self) -> RestaurantSummary {
        let status = self.status();
        RestaurantSummary {
            id: self.profile.id,
            name: self.profile.name.clone(),
            city: self.profile.city,
            cuisine: self.profile.cuisine.clone(),
            location: self.profile.location.clone(),
            rating: self.profile.rating,
            image: self.profile.image.clone(),
            price_range: self.profile.price_range.clone(),
            status,
            tables_available: self.tables.available().len() as u32,
            waiting_in_line: self.waitlist.len() as u32,
            weekly_average_customers: self.profile.weekly_average_customers,
            estimated_wait: (status == RestaurantStatus::WaitlistOnly).then(|| self.next_party_wait()),
        }
    }

    /// Take a validated booking. Reservations are refused while no table is
    /// free; waitlist bookings join the queue and get a position snapshot.
    pub fn accept_booking(
        &mut self,
        booking: &ValidBooking,
        now: DateTime<Utc>,
    ) -> Result<Option<QueueSnapshot>, BookingError> {
        match booking.mode {
            BookingMode::Reserve if self.status() == RestaurantStatus::WaitlistOnly => {
                Err(BookingError::ReservationsClosed(self.id()))
            }
            BookingMode::Reserve => Ok(None),
            BookingMode::Waitlist => Ok(Some(self.join_waitlist(booking, now))),
        }
    }

    pub fn join_waitlist(&mut self, booking: &ValidBooking, now: DateTime<Utc>) -> QueueSnapshot {
        let (entry, position) = self.waitlist.join(
            booking.guest_name.clone(),
            booking.party_size,
            booking.contact.clone(),
            booking.seating,
            now,
        );
        let entry_id = entry.id;
        let party_size = entry.party_size;

        self.stats.parties_joined += 1;
        self.record(FloorEventKind::PartyJoined {
            entry_id,
            party_size,
            position,
        });

        QueueSnapshot {
            entry_id,
            position,
            estimated_wait: self.estimate_for(position),
        }
    }

    /// Undo a join whose booking could not be confirmed.
    pub fn withdraw(&mut self, entry_id: &Uuid) -> Result<QueueChange, FloorError> {
        let departure = self.waitlist.remove(entry_id)?;
        self.stats.parties_joined = self.stats.parties_joined.saturating_sub(1);
        self.record(FloorEventKind::PartyRemoved { entry_id: *entry_id });
        Ok(self.change(departure, None))
    }

    /// Tell the next uncalled party their table is ready and start the hold.
    pub fn call_next(&mut self, now: DateTime<Utc>) -> Result<CalledParty, FloorError> {
        let hold_minutes = self.profile.max_hold_minutes;
        let entry = self
            .waitlist
            .call_next(Duration::minutes(hold_minutes as i64), now)?
            .clone();

        let held_until = entry.held_until.unwrap_or(now).timestamp();
        self.record(FloorEventKind::PartyCalled {
            entry_id: entry.id,
            held_until,
        });
        Ok(CalledParty { entry, hold_minutes })
    }

    /// Seat a queued party, optionally at a specific table.
    ///
    /// The table is checked before the entry leaves the queue, so a failed
    /// seat changes nothing.
    pub fn seat_party(
        &mut self,
        entry_id: &Uuid,
        table_id: Option<&Uuid>,
        now: DateTime<Utc>,
    ) -> Result<QueueChange, FloorError> {
        let entry = self
            .waitlist
            .get(entry_id)
            .ok_or(WaitlistError::NotFound(*entry_id))?;
        if let Some(table_id) = table_id {
            self.tables.check_fits(table_id, entry.party_size as i32)?;
        }

        let departure = self.waitlist.seat(entry_id)?;
        let table = match table_id {
            Some(table_id) => Some(
                self.tables
                    .seat_queued(
                        table_id,
                        departure.entry.party_size,
                        &departure.entry.customer_name,
                        departure.entry.id,
                        now,
                    )?
                    .clone(),
            ),
            None => None,
        };

        self.stats.parties_seated += 1;
        self.record(FloorEventKind::PartySeated {
            entry_id: *entry_id,
            table_id: table.as_ref().map(|t| t.id),
        });
        if let Some(table) = &table {
            self.record(FloorEventKind::TableSeated {
                table_id: table.id,
                party_size: table.party_size,
            });
        }
        Ok(self.change(departure, table))
    }

    pub fn mark_no_show(&mut self, entry_id: &Uuid) -> Result<QueueChange, FloorError> {
        let departure = self.waitlist.mark_no_show(entry_id)?;
        tracing::info!(
            restaurant_id = self.id(),
            entry_id = %entry_id,
            "Party marked as no-show"
        );
        self.stats.no_shows += 1;
        self.record(FloorEventKind::PartyNoShow {
            entry_id: *entry_id,
            hold_expired: false,
        });
        Ok(self.change(departure, None))
    }

    pub fn remove_party(&mut self, entry_id: &Uuid) -> Result<QueueChange, FloorError> {
        let departure = self.waitlist.remove(entry_id)?;
        self.stats.removals += 1;
        self.record(FloorEventKind::PartyRemoved { entry_id: *entry_id });
        Ok(self.change(departure, None))
    }

    /// Expire lapsed holds as no-shows and collect due reminders.
    pub fn sweep_holds(&mut self, now: DateTime<Utc>, reminder_threshold: Duration) -> HoldSweep {
        let expired = self.waitlist.expire_holds(now);
        for departure in &expired {
            self.stats.no_shows += 1;
            self.record(FloorEventKind::PartyNoShow {
                entry_id: departure.entry.id,
                hold_expired: true,
            });
        }
        let reminders = self.waitlist.due_reminders(now, reminder_threshold);

        // Everyone behind the first departure moved up
        let updates = expired
            .iter()
            .map(|d| d.position)
            .min()
            .map(|position| self.updates_from(position))
            .unwrap_or_default();

        HoldSweep {
            expired,
            reminders,
            updates,
        }
    }

    pub fn add_table(&mut self, name: &str, capacity: u32) -> Result<Table, FloorError> {
        let table = self.tables.add_table(name, capacity)?.clone();
        self.record(FloorEventKind::TableAdded {
            table_id: table.id,
            label: table.label.clone(),
            capacity: table.capacity,
        });
        Ok(table)
    }

    pub fn remove_table(&mut self, table_id: &Uuid) -> Result<Table, FloorError> {
        let table = self.tables.remove_table(table_id)?;
        self.record(FloorEventKind::TableRemoved { table_id: table.id });
        Ok(table)
    }

    pub fn seat_walk_in(
        &mut self,
        table_id: &Uuid,
        party_size: i32,
        guest_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SeatedTable, FloorError> {
        let seated = self.tables.seat_walk_in(table_id, party_size, guest_name, now)?.clone();
        self.stats.walk_ins_seated += 1;
        self.record(FloorEventKind::TableSeated {
            table_id: seated.id,
            party_size: seated.party_size,
        });
        Ok(seated)
    }

    pub fn check_out(&mut self, table_id: &Uuid) -> Result<Table, FloorError> {
        let table = self.tables.check_out(table_id)?;
        self.stats.checkouts += 1;
        self.record(FloorEventKind::TableCheckedOut { table_id: table.id });
        Ok(table)
    }

    /// Drain events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<FloorEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, kind: FloorEventKind) {
        self.events.push(FloorEvent::new(self.profile.id, kind));
    }

    fn change(&self, departure: Departure, table: Option<SeatedTable>) -> QueueChange {
        let updates = self.updates_from(departure.position);
        QueueChange {
            departure,
            table,
            updates,
        }
    }

    fn updates_from(&self, position: u32) -> Vec<QueueUpdate> {
        self.waitlist
            .behind(position)
            .map(|(position, entry)| QueueUpdate {
                entry_id: entry.id,
                contact: entry.contact.clone(),
                position,
                estimated_wait: self.estimate_for(position),
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FloorError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Waitlist(#[from] WaitlistError),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use tabli_core::restaurant::{City, DEFAULT_MAX_HOLD_MINUTES, DEFAULT_TABLE_TURN_MINUTES};

    use super::*;

    pub fn profile(id: u32) -> RestaurantProfile {
        RestaurantProfile {
            id,
            name: "Bella Vista Italian".to_string(),
            city: City::Dubai,
            cuisine: "Italian".to_string(),
            phone: "(555) 123-4567".to_string(),
            email: "info@downtownrestaurant.com".to_string(),
            description: String::new(),
            location: "Downtown, 0.5 miles".to_string(),
            address: None,
            rating: 4.8,
            weekly_average_customers: 68,
            price_range: "$$".to_string(),
            opening_hours: "11:00".to_string(),
            closing_hours: "22:00".to_string(),
            image: "italian-restaurant".to_string(),
            cover_image: None,
            menu: vec![],
            average_table_turn_minutes: DEFAULT_TABLE_TURN_MINUTES,
            max_hold_minutes: DEFAULT_MAX_HOLD_MINUTES,
            indoor_seating: true,
            outdoor_seating: true,
        }
    }

    pub fn booking(mode: BookingMode, name: &str, party_size: u8) -> ValidBooking {
        ValidBooking {
            mode,
            party_size,
            contact: Contact::phone("(555) 234-5678"),
            seating: Default::default(),
            guest_name: name.to_string(),
        }
    }
}
