use anyhow::{Context, Result};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::classifier::{classify, Decision};
use crate::config::PrFilter;
use crate::github::EventDescriptor;
use crate::models::NotificationMessage;
use crate::notifications::Dispatcher;

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to notify about
    Skipped,
    Delivered(NotificationMessage),
    /// Dry run: the card went to stdout, nothing was posted
    Printed(NotificationMessage),
    /// The message was built but the webhook did not accept it
    DeliveryFailed(NotificationMessage),
}

/// Runs one event through classification, message building and dispatch
pub struct Orchestrator {
    pr_filter: PrFilter,
    time_zone: Tz,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    pub fn new(pr_filter: PrFilter, time_zone: Tz, dispatcher: Dispatcher) -> Self {
        Self {
            pr_filter,
            time_zone,
            dispatcher,
        }
    }

    /// Handle the triggering event. Only an unsupported event is an error;
    /// delivery problems are logged and reported through the outcome.
    pub async fn handle(&self, event: &EventDescriptor) -> Result<Outcome> {
        info!(
            event = %event.name,
            action = %event.action,
            repo = %event.repository,
            "Executing for event"
        );

        let kind = match classify(event, self.pr_filter)? {
            Decision::Skip => {
                info!("No notification for this event");
                return Ok(Outcome::Skipped);
            }
            Decision::Proceed(kind) => kind,
        };

        let subject = event
            .subject
            .as_ref()
            .with_context(|| format!("Event '{}' carries no subject", event.name))?;

        let message = NotificationMessage::build(kind, &event.repository, subject, self.time_zone);

        match self.dispatcher.dispatch(&message).await {
            Ok(()) if matches!(self.dispatcher, Dispatcher::DryRun) => {
                info!(kind = ?kind, "Dry run, notification printed instead of posted");
                Ok(Outcome::Printed(message))
            }
            Ok(()) => {
                info!(kind = ?kind, "Notification delivered");
                Ok(Outcome::Delivered(message))
            }
            Err(err) => {
                warn!(error = %format!("{:#}", err), "Notification could not be delivered");
                Ok(Outcome::DeliveryFailed(message))
            }
        }
    }
}
