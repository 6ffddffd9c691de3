// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Delivery of finished notification payloads to a messaging webhook.
//!
//! Consumes the engine's [`NotificationPayload`] and posts the incoming-
//! webhook envelope: one attachment whose `fallback` is the payload title
//! and whose `pretext` is the body pretty-printed as JSON. Skipping delivery
//! for a suppressed payload is the caller's decision; this crate only ever
//! sees payloads that should go out.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use auditwatch_engine::NotificationPayload;

/// Webhook requests that outlive this are failed runs, not slow successes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the notification boundary.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid notifier configuration: {0}")]
    InvalidConfig(String),

    #[error("webhook delivery failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook rejected the message with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The incoming-webhook message shape.
#[derive(Debug, Serialize)]
struct WebhookMessage {
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Attachment {
    fallback: String,
    pretext: String,
}

/// The notifier collaborator. One webhook POST per delivered payload.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl Notifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        let webhook_url = webhook_url.into();
        if webhook_url.trim().is_empty() {
            return Err(NotifyError::InvalidConfig(
                "webhook URL cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Notifier {
            client,
            webhook_url,
        })
    }

    /// Deliver one payload. The body is rendered as indented JSON so the
    /// message is readable without any downstream formatting.
    pub async fn notify(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let message = WebhookMessage {
            attachments: vec![Attachment {
                fallback: payload.fallback.clone(),
                pretext: pretty_body(&payload.body),
            }],
        };

        debug!(fallback = %payload.fallback, "delivering notification");
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(())
    }
}

fn pretty_body(body: &Value) -> String {
    // Pretty-printing a Value cannot fail; fall back to compact just in case.
    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_webhook_url_is_rejected() {
        assert!(Notifier::new("  ").is_err());
    }

    #[test]
    fn test_pretty_body_is_indented() {
        let rendered = pretty_body(&json!({"Count": 3}));
        assert_eq!(rendered, "{\n  \"Count\": 3\n}");
    }
}
