use thiserror::Error;
use tracing::debug;

use crate::config::PrFilter;
use crate::github::{EventDescriptor, EventName};
use crate::models::TemplateKind;

/// The workflow was triggered by an event this notifier does not handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported event ({0})")]
pub struct UnsupportedEvent(pub String);

/// Outcome of classifying an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Proceed(TemplateKind),
}

/// Decide whether an event should produce a notification.
///
/// Recognized events with a non-matching action are skipped silently; only an
/// unrecognized event name is an error.
pub fn classify(event: &EventDescriptor, pr_filter: PrFilter) -> Result<Decision, UnsupportedEvent> {
    if let EventName::Other(name) = &event.name {
        return Err(UnsupportedEvent(name.clone()));
    }

    if event.name.trigger_action() != Some(event.action.as_str()) {
        debug!(
            event = %event.name,
            action = %event.action,
            "Action does not trigger a notification"
        );
        return Ok(Decision::Skip);
    }

    let kind = match event.name {
        EventName::Issues => TemplateKind::IssueOpened,
        EventName::Discussion => TemplateKind::DiscussionCreated,
        EventName::PullRequest => {
            let is_fork = event.subject.as_ref().is_some_and(|s| s.is_fork);
            if pr_filter == PrFilter::OnlyExternal && !is_fork {
                debug!("Pull request comes from the repository itself, skipping");
                return Ok(Decision::Skip);
            }
            TemplateKind::PullRequestOpened
        }
        EventName::Other(_) => return Ok(Decision::Skip),
    };

    Ok(Decision::Proceed(kind))
}
