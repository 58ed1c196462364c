//! Notes Module
//! Mission: Per-user note storage and the protected HTTP handlers over it

pub mod api;
pub mod models;
pub mod store;

pub use models::Note;
pub use store::NoteStore;
