use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{Fact, NotificationMessage};

/// Where a built notification goes
pub enum Dispatcher {
    Webhook(WebhookNotifier),
    /// Print the payload to stdout instead of posting it
    DryRun,
}

impl Dispatcher {
    pub async fn dispatch(&self, message: &NotificationMessage) -> Result<()> {
        let card = MessageCard::from(message);

        match self {
            Dispatcher::Webhook(webhook) => webhook.send(&card).await,
            Dispatcher::DryRun => {
                let payload = serde_json::to_string_pretty(&card)?;
                println!("{}", payload);
                Ok(())
            }
        }
    }
}

/// Chat webhook notifier
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
}

/// Card payload accepted by the webhook
#[derive(Debug, Serialize)]
pub struct MessageCard<'a> {
    title: &'a str,
    summary: &'a str,
    text: &'a str,
    sections: Vec<CardSection<'a>>,
    #[serde(rename = "potentialAction")]
    potential_action: Vec<CardAction<'a>>,
}

#[derive(Debug, Serialize)]
struct CardSection<'a> {
    facts: &'a [Fact],
}

#[derive(Debug, Serialize)]
struct CardAction<'a> {
    #[serde(rename = "@type")]
    action_type: &'static str,
    name: &'a str,
    targets: Vec<CardTarget<'a>>,
}

#[derive(Debug, Serialize)]
struct CardTarget<'a> {
    os: &'static str,
    uri: &'a str,
}

impl<'a> From<&'a NotificationMessage> for MessageCard<'a> {
    fn from(message: &'a NotificationMessage) -> Self {
        Self {
            title: &message.title,
            summary: &message.summary,
            text: &message.body_text,
            sections: vec![CardSection {
                facts: &message.facts,
            }],
            potential_action: vec![CardAction {
                action_type: "OpenUri",
                name: &message.action_label,
                targets: vec![CardTarget {
                    os: "default",
                    uri: &message.action_url,
                }],
            }],
        }
    }
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Post the card once; a failed delivery is returned, never retried
    pub async fn send(&self, card: &MessageCard<'_>) -> Result<()> {
        let payload = serde_json::to_string_pretty(card)?;
        debug!(payload = %payload, "Sending webhook notification");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(card)
            .send()
            .await
            .context("Failed to send webhook notification")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Webhook notification failed");
            anyhow::bail!("Webhook returned error: {} - {}", status, body);
        }

        info!("Webhook notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::github::Subject;
    use crate::models::TemplateKind;

    fn issue_message() -> NotificationMessage {
        let subject = Subject {
            author: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            link: "https://x/1".to_string(),
            is_fork: false,
        };
        NotificationMessage::build(
            TemplateKind::IssueOpened,
            "octo/repo",
            &subject,
            chrono_tz::Europe::Berlin,
        )
    }

    fn expected_payload() -> serde_json::Value {
        json!({
            "title": "A new issue was opened.",
            "summary": "A new issue was opened.",
            "text": "A new issue was opened. You should go and see if you can help.",
            "sections": [{
                "facts": [
                    { "name": "Repository", "value": "octo/repo" },
                    { "name": "Author", "value": "alice" },
                    { "name": "Created At", "value": "15.1.2024, 11:00:00" }
                ]
            }],
            "potentialAction": [{
                "@type": "OpenUri",
                "name": "Open",
                "targets": [{ "os": "default", "uri": "https://x/1" }]
            }]
        })
    }

    #[test]
    fn test_card_payload_shape() {
        let message = issue_message();
        let payload = serde_json::to_value(MessageCard::from(&message)).unwrap();
        assert_eq!(payload, expected_payload());
    }

    #[tokio::test]
    async fn test_send_posts_card() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(body_json(expected_payload()))
            .respond_with(ResponseTemplate::new(200).set_body_string("1"))
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            WebhookNotifier::new(format!("{}/webhook", server.uri()), Duration::from_secs(5)).unwrap();
        let dispatcher = Dispatcher::Webhook(notifier);

        dispatcher.dispatch(&issue_message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_reports_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad payload"))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = Dispatcher::Webhook(notifier)
            .dispatch(&issue_message())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("Bad payload"));
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        Dispatcher::DryRun.dispatch(&issue_message()).await.unwrap();
    }
}
