//! Cross-cutting domain types.

pub mod events;

pub use events::NotificationEvent;
