pub mod classifier;
pub mod config;
pub mod github;
pub mod models;
pub mod notifications;
pub mod orchestrator;

pub use classifier::{classify, Decision, UnsupportedEvent};
pub use config::{Config, PrFilter};
pub use github::{EventDescriptor, EventName, Subject};
pub use models::*;
pub use notifications::{Dispatcher, MessageCard, WebhookNotifier};
pub use orchestrator::{Orchestrator, Outcome};
