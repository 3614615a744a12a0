use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Something that changed on a restaurant floor. Broadcast to staff clients.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FloorEvent {
    pub restaurant_id: u32,
    pub timestamp: i64,
    #[serde(flatten)]
    pub kind: FloorEventKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FloorEventKind {
    PartyJoined {
        entry_id: Uuid,
        party_size: u8,
        position: u32,
    },
    PartyCalled {
        entry_id: Uuid,
        held_until: i64,
    },
    PartySeated {
        entry_id: Uuid,
        table_id: Option<Uuid>,
    },
    PartyNoShow {
        entry_id: Uuid,
        hold_expired: bool,
    },
    PartyRemoved {
        entry_id: Uuid,
    },
    TableAdded {
        table_id: Uuid,
        label: String,
        capacity: u32,
    },
    TableRemoved {
        table_id: Uuid,
    },
    TableSeated {
        table_id: Uuid,
        party_size: u32,
    },
    TableCheckedOut {
        table_id: Uuid,
    },
}

impl FloorEvent {
    pub fn new(restaurant_id: u32, kind: FloorEventKind) -> Self {
        Self {
            restaurant_id,
            timestamp: chrono::Utc::now().timestamp(),
            kind,
        }
    }

    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self.kind {
            FloorEventKind::PartyJoined { .. } => "party_joined",
            FloorEventKind::PartyCalled { .. } => "party_called",
            FloorEventKind::PartySeated { .. } => "party_seated",
            FloorEventKind::PartyNoShow { .. } => "party_no_show",
            FloorEventKind::PartyRemoved { .. } => "party_removed",
            FloorEventKind::TableAdded { .. } => "table_added",
            FloorEventKind::TableRemoved { .. } => "table_removed",
            FloorEventKind::TableSeated { .. } => "table_seated",
            FloorEventKind::TableCheckedOut { .. } => "table_checked_out",
        }
    }
}
