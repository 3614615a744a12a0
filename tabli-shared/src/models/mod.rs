pub mod events;

pub use events::{FloorEvent, FloorEventKind};
