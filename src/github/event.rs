use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Name of the workflow trigger, as found in `GITHUB_EVENT_NAME`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventName {
    Issues,
    Discussion,
    /// Both `pull_request` and `pull_request_target`
    PullRequest,
    Other(String),
}

impl EventName {
    /// The action that produces a notification for this event, if any
    pub fn trigger_action(&self) -> Option<&'static str> {
        match self {
            EventName::Issues => Some("opened"),
            EventName::Discussion => Some("created"),
            EventName::PullRequest => Some("opened"),
            EventName::Other(_) => None,
        }
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        match name {
            "issues" => EventName::Issues,
            "discussion" => EventName::Discussion,
            "pull_request" | "pull_request_target" => EventName::PullRequest,
            other => EventName::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::Issues => f.write_str("issues"),
            EventName::Discussion => f.write_str("discussion"),
            EventName::PullRequest => f.write_str("pull_request"),
            EventName::Other(name) => f.write_str(name),
        }
    }
}

/// A payload that lacks what a notification needs
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Event payload for '{event}' has no '{field}' object")]
    Missing { event: String, field: &'static str },

    #[error("Event payload for '{event}' has an invalid '{field}' object: {source}")]
    Invalid {
        event: String,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw webhook payload, limited to the fields the notifier reads.
///
/// Sub-objects stay raw until the event is known to trigger a notification,
/// so payloads of other events never fail on fields nobody reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    pub action: Option<String>,
    pub repository: Option<Repository>,
    pub issue: Option<Value>,
    pub discussion: Option<Value>,
    pub pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// An issue or a discussion
#[derive(Debug, Deserialize)]
pub struct Item {
    pub user: GitHubUser,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub user: GitHubUser,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    pub head: PrHead,
}

#[derive(Debug, Deserialize)]
pub struct PrHead {
    // null once the source fork has been deleted
    pub repo: Option<Repository>,
}

impl PullRequest {
    /// A pull request is a fork when its head lives outside the target repository
    pub fn is_fork(&self, repository: &str) -> bool {
        self.head
            .repo
            .as_ref()
            .map_or(true, |repo| repo.full_name != repository)
    }
}

/// The issue, discussion or pull request an event is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub link: String,
    pub is_fork: bool,
}

impl From<Item> for Subject {
    fn from(item: Item) -> Self {
        Self {
            author: item.user.login,
            created_at: item.created_at,
            link: item.html_url,
            is_fork: false,
        }
    }
}

/// Everything the notifier needs to know about the triggering event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: EventName,
    pub action: String,
    /// Empty when the payload carries no repository and the event is skipped
    pub repository: String,
    /// Present only when the action triggers a notification
    pub subject: Option<Subject>,
}

fn extract<T: DeserializeOwned>(
    event: &EventName,
    field: &'static str,
    value: Option<Value>,
) -> Result<T, PayloadError> {
    let value = value.ok_or_else(|| PayloadError::Missing {
        event: event.to_string(),
        field,
    })?;

    serde_json::from_value(value).map_err(|source| PayloadError::Invalid {
        event: event.to_string(),
        field,
        source,
    })
}

impl EventDescriptor {
    pub fn from_payload(name: EventName, payload: EventPayload) -> Result<Self, PayloadError> {
        let action = payload.action.unwrap_or_default();

        if name.trigger_action() != Some(action.as_str()) {
            return Ok(Self {
                name,
                action,
                repository: payload
                    .repository
                    .map(|repo| repo.full_name)
                    .unwrap_or_default(),
                subject: None,
            });
        }

        let repository = payload
            .repository
            .ok_or_else(|| PayloadError::Missing {
                event: name.to_string(),
                field: "repository",
            })?
            .full_name;

        let subject: Option<Subject> = match &name {
            EventName::Issues => Some(extract::<Item>(&name, "issue", payload.issue)?.into()),
            EventName::Discussion => {
                Some(extract::<Item>(&name, "discussion", payload.discussion)?.into())
            }
            EventName::PullRequest => {
                let pr: PullRequest = extract(&name, "pull_request", payload.pull_request)?;
                let is_fork = pr.is_fork(&repository);
                Some(Subject {
                    author: pr.user.login,
                    created_at: pr.created_at,
                    link: pr.html_url,
                    is_fork,
                })
            }
            EventName::Other(_) => None,
        };

        Ok(Self {
            name,
            action,
            repository,
            subject,
        })
    }

    /// Parse a payload from its JSON text
    pub fn parse(event_name: &str, json: &str) -> Result<Self> {
        let payload: EventPayload =
            serde_json::from_str(json).context("Failed to parse event payload")?;
        Ok(Self::from_payload(EventName::from(event_name), payload)?)
    }

    /// Load the event the workflow was triggered by
    pub fn load(event_name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload: {}", path.display()))?;

        let event = Self::parse(event_name, &content)
            .with_context(|| format!("Invalid event payload: {}", path.display()))?;

        debug!(
            event = %event.name,
            action = %event.action,
            repo = %event.repository,
            "Loaded event payload"
        );

        Ok(event)
    }
}
