use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_TABLE_NAME_LENGTH: usize = 2;
pub const MAX_TABLE_CAPACITY: u32 = 20;
pub const WALK_IN_GUEST_NAME: &str = "Walk-in Customer";

/// A free table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: Uuid,
    pub label: String,
    pub capacity: u32,
}

/// An occupied table and who is sitting at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatedTable {
    pub id: Uuid,
    pub label: String,
    pub capacity: u32,
    pub guest_name: String,
    pub party_size: u32,
    pub seated_at: DateTime<Utc>,
    /// Set when the party came off the waitlist rather than walking in
    #[serde(default)]
    pub queue_entry_id: Option<Uuid>,
}

impl SeatedTable {
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        (now - self.seated_at).max(Duration::zero())
    }

    /// "15 min", "1h", "1h 30m"
    pub fn duration_label(&self, now: DateTime<Utc>) -> String {
        let minutes = self.duration(now).num_minutes();
        let (hours, rest) = (minutes / 60, minutes % 60);
        match (hours, rest) {
            (0, m) => format!("{} min", m),
            (h, 0) => format!("{}h", h),
            (h, m) => format!("{}h {}m", h, m),
        }
    }

    fn release(self) -> Table {
        Table {
            id: self.id,
            label: self.label,
            capacity: self.capacity,
        }
    }
}

/// Free and occupied tables of one restaurant.
///
/// A table lives in exactly one of the two lists; seating and checkout move
/// the value between them, so the partition cannot drift.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableInventory {
    available: Vec<Table>,
    seated: Vec<SeatedTable>,
}

impl TableInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self) -> &[Table] {
        &self.available
    }

    pub fn seated(&self) -> &[SeatedTable] {
        &self.seated
    }

    pub fn contains(&self, table_id: &Uuid) -> bool {
        self.available.iter().any(|t| t.id == *table_id) || self.seated.iter().any(|t| t.id == *table_id)
    }

    fn name_taken(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.available.iter().map(|t| &t.label)
            .chain(self.seated.iter().map(|t| &t.label))
            .any(|label| label.to_lowercase() == wanted)
    }

    /// Add a free table. Names are compared case-insensitively against every table.
    pub fn add_table(&mut self, name: &str, capacity: u32) -> Result<&Table, TableError> {
        let name = name.trim();
        if name.chars().count() < MIN_TABLE_NAME_LENGTH {
            return Err(TableError::InvalidName(name.to_string()));
        }
        if capacity < 1 || capacity > MAX_TABLE_CAPACITY {
            return Err(TableError::InvalidCapacity(capacity));
        }
        if self.name_taken(name) {
            return Err(TableError::NameTaken(name.to_string()));
        }

        self.available.push(Table {
            id: Uuid::new_v4(),
            label: name.to_string(),
            capacity,
        });
        Ok(&self.available[self.available.len() - 1])
    }

    /// Restore an already-occupied table, e.g. from seed data.
    pub fn insert_seated(&mut self, table: SeatedTable) -> Result<(), TableError> {
        if self.contains(&table.id) {
            return Err(TableError::DuplicateId(table.id));
        }
        if self.name_taken(&table.label) {
            return Err(TableError::NameTaken(table.label));
        }
        self.seated.push(table);
        Ok(())
    }

    /// Remove a free table. Occupied tables must be checked out first.
    pub fn remove_table(&mut self, table_id: &Uuid) -> Result<Table, TableError> {
        if let Some(seated) = self.seated.iter().find(|t| t.id == *table_id) {
            return Err(TableError::Occupied(seated.label.clone()));
        }
        let index = self.available_index(table_id)?;
        Ok(self.available.remove(index))
    }

    /// Check that `party_size` guests could sit at a free table right now.
    pub fn check_fits(&self, table_id: &Uuid, party_size: i32) -> Result<&Table, TableError> {
        if let Some(seated) = self.seated.iter().find(|t| t.id == *table_id) {
            return Err(TableError::Occupied(seated.label.clone()));
        }
        let table = &self.available[self.available_index(table_id)?];
        if party_size < 1 {
            return Err(TableError::InvalidPartySize(party_size));
        }
        if party_size as u32 > table.capacity {
            return Err(TableError::ExceedsCapacity {
                party_size: party_size as u32,
                capacity: table.capacity,
            });
        }
        Ok(table)
    }

    /// Seat a walk-in party. Guest name defaults to "Walk-in Customer".
    pub fn seat_walk_in(
        &mut self,
        table_id: &Uuid,
        party_size: i32,
        guest_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&SeatedTable, TableError> {
        let guest = guest_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(WALK_IN_GUEST_NAME);
        self.seat(table_id, party_size, guest, None, now)
    }

    /// Seat a party coming off the waitlist.
    pub fn seat_queued(
        &mut self,
        table_id: &Uuid,
        party_size: u8,
        guest_name: &str,
        queue_entry_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<&SeatedTable, TableError> {
        self.seat(table_id, party_size as i32, guest_name, Some(queue_entry_id), now)
    }

    fn seat(
        &mut self,
        table_id: &Uuid,
        party_size: i32,
        guest_name: &str,
        queue_entry_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<&SeatedTable, TableError> {
        self.check_fits(table_id, party_size)?;
        let index = self.available_index(table_id)?;
        let table = self.available.remove(index);

        self.seated.push(SeatedTable {
            id: table.id,
            label: table.label,
            capacity: table.capacity,
            guest_name: guest_name.to_string(),
            party_size: party_size as u32,
            seated_at: now,
            queue_entry_id,
        });
        Ok(&self.seated[self.seated.len() - 1])
    }

    /// Free an occupied table; guest details are discarded.
    pub fn check_out(&mut self, table_id: &Uuid) -> Result<Table, TableError> {
        let index = match self.seated.iter().position(|t| t.id == *table_id) {
            Some(index) => index,
            None => {
                return Err(match self.available.iter().find(|t| t.id == *table_id) {
                    Some(table) => TableError::NotSeated(table.label.clone()),
                    None => TableError::NotFound(*table_id),
                })
            }
        };

        let table = self.seated.remove(index).release();
        self.available.push(table.clone());
        Ok(table)
    }

    fn available_index(&self, table_id: &Uuid) -> Result<usize, TableError> {
        self.available
            .iter()
            .position(|t| t.id == *table_id)
            .ok_or(TableError::NotFound(*table_id))
    }

    pub fn total(&self) -> usize {
        self.available.len() + self.seated.len()
    }

    pub fn seated_guests(&self) -> u32 {
        self.seated.iter().map(|t| t.party_size).sum()
    }

    pub fn seating_capacity(&self) -> u32 {
        self.available.iter().map(|t| t.capacity).sum::<u32>() + self.seated.iter().map(|t| t.capacity).sum::<u32>()
    }

    /// Share of tables currently occupied, 0.0 when there are none.
    pub fn occupancy(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.seated.len() as f64 / self.total() as f64
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(Uuid),

    #[error("Table name must be at least 2 characters: {0:?}")]
    InvalidName(String),

    #[error("Capacity must be between 1 and 20, got {0}")]
    InvalidCapacity(u32),

    #[error("A table with this name already exists: {0}")]
    NameTaken(String),

    #[error("Table id already in use: {0}")]
    DuplicateId(Uuid),

    #[error("Cannot remove or seat {0}: it is occupied. Please check out guests first.")]
    Occupied(String),

    #[error("{0} has no seated guests")]
    NotSeated(String),

    #[error("Invalid party size: {0}")]
    InvalidPartySize(i32),

    #[error("Party of {party_size} exceeds table capacity of {capacity}")]
    ExceedsCapacity { party_size: u32, capacity: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_partitioned(inventory: &TableInventory) {
        let free: HashSet<Uuid> = inventory.available().iter().map(|t| t.id).collect();
        let taken: HashSet<Uuid> = inventory.seated().iter().map(|t| t.id).collect();
        assert!(free.is_disjoint(&taken));
        assert_eq!(free.len() + taken.len(), inventory.total());
    }

    #[test]
    fn test_table_lifecycle() {
        let mut inventory = TableInventory::new();
        let now = Utc::now();

        let id = inventory.add_table("Corner Booth", 6).unwrap().id;
        assert_eq!(inventory.available().len(), 1);

        let seated = inventory.seat_walk_in(&id, 4, None, now).unwrap();
        assert_eq!(seated.guest_name, WALK_IN_GUEST_NAME);
        assert_eq!(seated.party_size, 4);
        assert!(inventory.available().is_empty());
        assert_eq!(inventory.seated_guests(), 4);
        assert!((inventory.occupancy() - 1.0).abs() < f64::EPSILON);

        let freed = inventory.check_out(&id).unwrap();
        assert_eq!(freed.label, "Corner Booth");
        assert!(inventory.seated().is_empty());
        assert_eq!(inventory.available()[0].id, id);
    }

    #[test]
    fn test_name_collision_is_case_insensitive() {
        let mut inventory = TableInventory::new();
        inventory.add_table("Patio A", 4).unwrap();

        let err = inventory.add_table("patio a", 6).unwrap_err();
        assert_eq!(err, TableError::NameTaken("patio a".to_string()));
        let patios: Vec<_> = inventory.available().iter().filter(|t| t.label == "Patio A").collect();
        assert_eq!(inventory.total(), 1);
        assert_eq!(patios.len(), 1);
    }

    #[test]
    fn test_name_collision_includes_seated_tables() {
        let mut inventory = TableInventory::new();
        let id = inventory.add_table("Bar Counter", 8).unwrap().id;
        inventory.seat_walk_in(&id, 2, Some("Alex"), Utc::now()).unwrap();

        assert!(matches!(inventory.add_table("  BAR COUNTER ", 8), Err(TableError::NameTaken(_))));
    }

    #[test]
    fn test_add_table_bounds() {
        let mut inventory = TableInventory::new();
        assert!(matches!(inventory.add_table(" A ", 4), Err(TableError::InvalidName(_))));
        assert_eq!(inventory.add_table("Table 1", 0).unwrap_err(), TableError::InvalidCapacity(0));
        assert_eq!(inventory.add_table("Table 1", 21).unwrap_err(), TableError::InvalidCapacity(21));
        assert!(inventory.add_table("Table 1", 20).is_ok());
    }

    #[test]
    fn test_remove_occupied_table_fails_without_change() {
        let mut inventory = TableInventory::new();
        let id = inventory.add_table("Table 5", 4).unwrap().id;
        inventory.add_table("Table 6", 2).unwrap();
        inventory.seat_walk_in(&id, 2, Some("John & Maria"), Utc::now()).unwrap();
        let before = (inventory.available().to_vec(), inventory.seated().to_vec());

        let err = inventory.remove_table(&id).unwrap_err();
        assert_eq!(err, TableError::Occupied("Table 5".to_string()));
        assert_eq!(inventory.available(), before.0.as_slice());
        assert_eq!(inventory.seated(), before.1.as_slice());
    }

    #[test]
    fn test_remove_free_table() {
        let mut inventory = TableInventory::new();
        let id = inventory.add_table("Table 2", 2).unwrap().id;
        assert_eq!(inventory.remove_table(&id).unwrap().label, "Table 2");
        assert_eq!(inventory.remove_table(&id).unwrap_err(), TableError::NotFound(id));
    }

    #[test]
    fn test_walk_in_over_capacity_is_rejected() {
        let mut inventory = TableInventory::new();
        let id = inventory.add_table("Table 1", 4).unwrap().id;

        let err = inventory.seat_walk_in(&id, 5, None, Utc::now()).unwrap_err();
        assert_eq!(err, TableError::ExceedsCapacity { party_size: 5, capacity: 4 });
        assert_eq!(inventory.available().len(), 1);
        assert!(inventory.seated().is_empty());

        assert_eq!(inventory.seat_walk_in(&id, 0, None, Utc::now()).unwrap_err(), TableError::InvalidPartySize(0));
        assert_eq!(inventory.seat_walk_in(&id, -2, None, Utc::now()).unwrap_err(), TableError::InvalidPartySize(-2));
    }

    #[test]
    fn test_cannot_seat_occupied_or_check_out_free() {
        let mut inventory = TableInventory::new();
        let id = inventory.add_table("Table 3", 4).unwrap().id;
        assert_eq!(inventory.check_out(&id).unwrap_err(), TableError::NotSeated("Table 3".to_string()));

        inventory.seat_walk_in(&id, 2, None, Utc::now()).unwrap();
        assert_eq!(inventory.seat_walk_in(&id, 2, None, Utc::now()).unwrap_err(), TableError::Occupied("Table 3".to_string()));
    }

    #[test]
    fn test_partition_holds_over_operation_sequence() {
        let mut inventory = TableInventory::new();
        let ids: Vec<Uuid> = (1..=6)
            .map(|n| inventory.add_table(&format!("Table {}", n), n + 1).unwrap().id)
            .collect();
        let now = Utc::now();

        // Deterministic but irregular mix of seat / checkout / remove attempts
        for step in 0..200usize {
            let id = ids[(step * 7 + step / 3) % ids.len()];
            match step % 4 {
                0 | 1 => {
                    let _ = inventory.seat_walk_in(&id, (step % 5) as i32, None, now);
                }
                2 => {
                    let _ = inventory.check_out(&id);
                }
                _ => {
                    if inventory.seated().iter().any(|t| t.id == id) {
                        assert!(inventory.remove_table(&id).is_err());
                    }
                }
            }
            assert_partitioned(&inventory);
        }
    }

    #[test]
    fn test_insert_seated_keeps_ids_and_names_unique() {
        let mut inventory = TableInventory::new();
        let free = inventory.add_table("Patio A", 4).unwrap().clone();
        let seated = |id: Uuid, label: &str| SeatedTable {
            id,
            label: label.to_string(),
            capacity: 4,
            guest_name: "Alex Thompson".to_string(),
            party_size: 2,
            seated_at: Utc::now(),
            queue_entry_id: None,
        };

        assert_eq!(
            inventory.insert_seated(seated(free.id, "Table 8")),
            Err(TableError::DuplicateId(free.id))
        );
        assert_eq!(
            inventory.insert_seated(seated(Uuid::new_v4(), "PATIO A")),
            Err(TableError::NameTaken("PATIO A".to_string()))
        );
        inventory.insert_seated(seated(Uuid::new_v4(), "Table 8")).unwrap();

        assert_eq!(inventory.total(), 2);
        assert_partitioned(&inventory);
    }

    #[test]
    fn test_duration_label() {
        let now = Utc::now();
        let mut table = SeatedTable {
            id: Uuid::new_v4(),
            label: "Table 12".to_string(),
            capacity: 6,
            guest_name: "The Wilson Family".to_string(),
            party_size: 4,
            seated_at: now - Duration::minutes(90),
            queue_entry_id: None,
        };
        assert_eq!(table.duration_label(now), "1h 30m");
        table.seated_at = now - Duration::minutes(60);
        assert_eq!(table.duration_label(now), "1h");
        table.seated_at = now - Duration::minutes(15);
        assert_eq!(table.duration_label(now), "15 min");
    }
}
