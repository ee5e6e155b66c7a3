use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::github::Subject;

/// Which card to send for a matched event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    IssueOpened,
    DiscussionCreated,
    PullRequestOpened,
}

impl TemplateKind {
    pub fn summary(self) -> &'static str {
        match self {
            TemplateKind::IssueOpened => "A new issue was opened.",
            TemplateKind::DiscussionCreated => "A discussion was started.",
            TemplateKind::PullRequestOpened => "A pull request was created.",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            TemplateKind::IssueOpened => {
                "A new issue was opened. You should go and see if you can help."
            }
            TemplateKind::DiscussionCreated => {
                "A new discussion was started. You should go and see if you can participate."
            }
            TemplateKind::PullRequestOpened => {
                "A pull request from a forked repository was created. This was probably done by \
                 someone outside the organisation. You should review the pull request by clicking \
                 the button below."
            }
        }
    }
}

/// A row in the notification card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

impl Fact {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Transport independent notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: String,
    pub summary: String,
    pub body_text: String,
    pub facts: Vec<Fact>,
    pub action_label: String,
    pub action_url: String,
}

impl NotificationMessage {
    pub fn build(kind: TemplateKind, repository: &str, subject: &Subject, time_zone: Tz) -> Self {
        let summary = kind.summary().to_string();

        Self {
            title: summary.clone(),
            summary,
            body_text: kind.body().to_string(),
            facts: vec![
                Fact::new("Repository", repository),
                Fact::new("Author", subject.author.as_str()),
                Fact::new("Created At", format_timestamp(subject.created_at, time_zone)),
            ],
            action_label: "Open".to_string(),
            action_url: subject.link.clone(),
        }
    }
}

/// Render a timestamp with German date conventions, e.g. `15.1.2024, 11:00:00`
pub fn format_timestamp(at: DateTime<Utc>, time_zone: Tz) -> String {
    at.with_timezone(&time_zone)
        .format("%-d.%-m.%Y, %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    fn subject(author: &str) -> Subject {
        Subject {
            author: author.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            link: "https://x/1".to_string(),
            is_fork: false,
        }
    }

    #[test]
    fn test_build_issue_opened() {
        let message =
            NotificationMessage::build(TemplateKind::IssueOpened, "octo/repo", &subject("alice"), Berlin);

        assert_eq!(message.summary, "A new issue was opened.");
        assert_eq!(message.title, message.summary);
        assert_eq!(
            message.body_text,
            "A new issue was opened. You should go and see if you can help."
        );
        assert_eq!(
            message.facts,
            vec![
                Fact::new("Repository", "octo/repo"),
                Fact::new("Author", "alice"),
                Fact::new("Created At", "15.1.2024, 11:00:00"),
            ]
        );
        assert_eq!(message.action_label, "Open");
        assert_eq!(message.action_url, "https://x/1");
    }

    #[test]
    fn test_pull_request_body() {
        let body = TemplateKind::PullRequestOpened.body();
        assert_eq!(
            body,
            "A pull request from a forked repository was created. This was probably done by someone outside the organisation. You should review the pull request by clicking the button below."
        );
    }

    #[test]
    fn test_discussion_template() {
        let message = NotificationMessage::build(
            TemplateKind::DiscussionCreated,
            "octo/repo",
            &subject("carol"),
            Berlin,
        );
        assert_eq!(message.summary, "A discussion was started.");
        assert_eq!(
            message.body_text,
            "A new discussion was started. You should go and see if you can participate."
        );
    }

    #[test]
    fn test_format_timestamp_summer_time() {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 8, 5, 3).unwrap();
        assert_eq!(format_timestamp(at, Berlin), "1.7.2024, 10:05:03");
    }

    #[test]
    fn test_format_timestamp_crosses_midnight() {
        let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(format_timestamp(at, Berlin), "1.1.2024, 00:30:00");
    }

    #[test]
    fn test_format_timestamp_other_zone() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(at, chrono_tz::UTC), "15.1.2024, 10:00:00");
    }
}
