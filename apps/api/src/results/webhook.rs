//! Results persistence: posts a finished interview to the spreadsheet webhook.
//!
//! The webhook is an Apps Script endpoint that appends one row per call and
//! answers `{"status": "success"}` or `{"status": "error", "message", "details"}`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::results::record::{ResultRecord, SaveOutcome};

pub const URL_NOT_CONFIGURED: &str = "save URL is not configured";
pub const UNREACHABLE: &str = "could not reach the save endpoint";

/// The persistence collaborator. Never fails: every problem becomes a
/// `SaveOutcome` with `success = false` and a human-readable message.
#[async_trait]
pub trait ResultsStore: Send + Sync {
    async fn save_result(&self, record: &ResultRecord) -> SaveOutcome;
}

#[derive(Debug, Deserialize)]
struct ScriptReply {
    status: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

#[derive(Clone)]
pub struct SheetsWebhookStore {
    client: Client,
    url: Option<String>,
}

impl SheetsWebhookStore {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl ResultsStore for SheetsWebhookStore {
    async fn save_result(&self, record: &ResultRecord) -> SaveOutcome {
        let Some(url) = self.url.as_deref() else {
            warn!("Results webhook URL is not configured; refusing to save");
            return SaveOutcome::failed(URL_NOT_CONFIGURED);
        };

        let body = match serde_json::to_string(record) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize result record: {e}");
                return SaveOutcome::failed(UNREACHABLE);
            }
        };

        // The script only accepts a "simple" request, hence text/plain.
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Results webhook request failed: {e}");
                return SaveOutcome::failed(UNREACHABLE);
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read results webhook reply: {e}");
                return SaveOutcome::failed(UNREACHABLE);
            }
        };

        let outcome = interpret_reply(status, &text);
        if outcome.success {
            info!("Saved interview result for role '{}'", record.role);
        } else {
            warn!(
                "Results webhook rejected the save (HTTP {status}): {}",
                outcome.message.as_deref().unwrap_or_default()
            );
        }
        outcome
    }
}

/// Maps the webhook's HTTP status and body onto a `SaveOutcome`.
fn interpret_reply(status: u16, body: &str) -> SaveOutcome {
    if !(200..300).contains(&status) {
        return SaveOutcome::failed(format!("server error (HTTP {status})"));
    }

    let reply: ScriptReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(_) => return SaveOutcome::failed(UNREACHABLE),
    };

    if reply.status.as_deref() == Some("success") {
        return SaveOutcome::saved();
    }

    let message = reply
        .message
        .unwrap_or_else(|| "unknown error from the save script".to_string());
    let full = match reply.details.filter(|d| !d.is_empty()) {
        Some(details) => format!("{message}\nError: {details}"),
        None => message,
    };
    SaveOutcome::failed(format!("the save script responded with an error:\n{full}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::record::Verdict;

    fn record() -> ResultRecord {
        ResultRecord {
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            user_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: "Ingeniero de Datos".to_string(),
            topics: "SQL".to_string(),
            score: 90,
            result: Verdict::Passed,
            areas_to_reinforce: "none".to_string(),
        }
    }

    #[test]
    fn test_success_reply() {
        assert_eq!(
            interpret_reply(200, r#"{"status": "success"}"#),
            SaveOutcome::saved()
        );
    }

    #[test]
    fn test_http_error_reports_status() {
        let outcome = interpret_reply(502, "Bad gateway");
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("server error (HTTP 502)"));
    }

    #[test]
    fn test_script_error_includes_message_and_details() {
        let outcome = interpret_reply(
            200,
            r#"{"status": "error", "message": "Sheet not found", "details": "Hoja1 missing"}"#,
        );
        assert!(!outcome.success);
        let message = outcome.message.unwrap();
        assert!(message.contains("Sheet not found"));
        assert!(message.ends_with("\nError: Hoja1 missing"));
    }

    #[test]
    fn test_script_error_without_message_uses_default() {
        let outcome = interpret_reply(200, r#"{"status": "error"}"#);
        assert!(outcome
            .message
            .unwrap()
            .contains("unknown error from the save script"));
    }

    #[test]
    fn test_unparseable_reply_is_treated_as_unreachable() {
        let outcome = interpret_reply(200, "<html>login</html>");
        assert_eq!(outcome.message.as_deref(), Some(UNREACHABLE));
    }

    #[tokio::test]
    async fn test_missing_url_fails_without_network() {
        let store = SheetsWebhookStore::new(None);
        let outcome = store.save_result(&record()).await;
        assert_eq!(outcome, SaveOutcome::failed(URL_NOT_CONFIGURED));
    }
}
