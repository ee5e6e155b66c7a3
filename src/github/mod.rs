pub mod actions;
pub mod event;

pub use event::{EventDescriptor, EventName, EventPayload, PayloadError, Subject};
