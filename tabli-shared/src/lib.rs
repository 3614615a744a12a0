pub mod models;
pub mod pii;

pub use models::{FloorEvent, FloorEventKind};
pub use pii::Masked;
