//! Live floor state for a restaurant: the waitlist, the tables and the
//! aggregate that keeps them consistent.

pub mod restaurant;
pub mod summary;
pub mod tables;
pub mod waitlist;

pub use restaurant::{CalledParty, FloorError, FloorStats, HoldSweep, QueueChange, QueueUpdate, Restaurant};
pub use summary::{FloorSnapshot, FloorSummary};
pub use tables::{SeatedTable, Table, TableError, TableInventory};
pub use waitlist::{Departure, QueueEntry, QueueOutcome, Waitlist, WaitlistError};
