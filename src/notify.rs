//! Slack notifications.
//!
//! [`ChatSink`] is the transport seam: [`SlackNotifier`] posts to
//! `chat.postMessage` with a bearer token, and tests count messages in
//! memory. [`Notifier`] wraps any sink with the logging policy of a run:
//! failures are logged with status and body and reported as `false`, never
//! retried and never propagated.

use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat API answered HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Something that can deliver a text message to the team channel.
pub trait ChatSink {
    async fn post(&self, text: &str) -> Result<(), NotifyError>;
}

/// JSON body of `chat.postMessage`.
#[derive(Debug, Serialize)]
pub struct PostMessage<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: Client,
    endpoint: String,
    token: String,
    channel: String,
}

impl SlackNotifier {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        channel: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::from_client(client, endpoint, token, channel))
    }

    /// Wrap an already configured client.
    pub fn from_client(
        client: Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            channel: channel.into(),
        }
    }
}

impl ChatSink for SlackNotifier {
    #[instrument(level = "debug", skip_all)]
    async fn post(&self, text: &str) -> Result<(), NotifyError> {
        let t0 = Instant::now();
        let payload = PostMessage {
            channel: &self.channel,
            text,
        };

        // `.json()` sets Content-Type: application/json
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Posted to Slack");
        Ok(())
    }
}

/// Sends messages through a [`ChatSink`] and absorbs its failures.
#[derive(Debug)]
pub struct Notifier<C> {
    sink: C,
}

impl<C: ChatSink> Notifier<C> {
    pub fn new(sink: C) -> Self {
        Self { sink }
    }

    #[cfg(test)]
    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Post `text`; `true` only when the chat API accepted it.
    pub async fn send(&self, text: &str) -> bool {
        match self.sink.post(text).await {
            Ok(()) => true,
            Err(NotifyError::Status { status, body }) => {
                warn!(
                    status = status.as_u16(),
                    body = %truncate_for_log(&body, 300),
                    "Slack rejected message"
                );
                false
            }
            Err(e) => {
                warn!(error = %e, "Slack error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use std::sync::Mutex;

    fn local_slack(base: &str) -> SlackNotifier {
        let client = Client::builder().no_proxy().build().unwrap();
        SlackNotifier::from_client(
            client,
            format!("{base}/api/chat.postMessage"),
            "xoxb-test",
            "C0123",
        )
    }

    struct Rejecting;

    impl ChatSink for Rejecting {
        async fn post(&self, _text: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    impl ChatSink for Recording {
        async fn post(&self, text: &str) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_payload_shape() {
        let body = serde_json::to_value(PostMessage {
            channel: "C0123",
            text: "✅ \"quoted\" → https://x",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"channel": "C0123", "text": "✅ \"quoted\" → https://x"})
        );
    }

    #[tokio::test]
    async fn test_send_reports_failure() {
        let notifier = Notifier::new(Rejecting);
        assert!(!notifier.send("hello").await);
    }

    #[tokio::test]
    async fn test_send_reports_success() {
        let notifier = Notifier::new(Recording::default());
        assert!(notifier.send("hello").await);
        assert_eq!(*notifier.sink().0.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_slack_notifier_builds() {
        let n = SlackNotifier::new(
            crate::cli::SLACK_POST_URL,
            "xoxb-test",
            "C0123",
            Duration::from_secs(30),
        );
        assert!(n.is_ok());
    }

    #[tokio::test]
    async fn test_post_sends_bearer_and_json() {
        let server = serve_once("200 OK", r#"{"ok":true}"#).await;

        local_slack(&server.base).post("✅ AcmeCo: SRE → https://acme.example").await.unwrap();

        let request = server.request.await.unwrap();
        let lower = request.to_lowercase();
        assert!(lower.starts_with("post /api/chat.postmessage http/1.1"));
        assert!(lower.contains("authorization: bearer xoxb-test"));
        assert!(lower.contains("content-type: application/json"));

        let body = request.split("\r\n\r\n").nth(1).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(body).unwrap(),
            serde_json::json!({"channel": "C0123", "text": "✅ AcmeCo: SRE → https://acme.example"})
        );
    }

    #[tokio::test]
    async fn test_post_only_200_is_success() {
        let server = serve_once("201 Created", "created").await;
        match local_slack(&server.base).post("hello").await {
            Err(NotifyError::Status { status, .. }) => assert_eq!(status, StatusCode::CREATED),
            other => panic!("expected status error, got {other:?}"),
        }

        let server = serve_once("500 Internal Server Error", "boom").await;
        match local_slack(&server.base).post("hello").await {
            Err(NotifyError::Status { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
