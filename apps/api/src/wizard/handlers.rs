//! Axum route handlers for the Wizard API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::machine::Event;
use crate::wizard::session::QuestionCount;
use crate::wizard::views::SessionView;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Events a client may send. Collaborator completions are internal and have no
/// wire form.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    Start,
    SelectRole {
        role: String,
    },
    RetryTopics,
    ChooseTopics {
        titles: Vec<String>,
    },
    StartInterview {
        #[serde(default = "default_question_count")]
        question_count: u32,
    },
    RetryQuestions,
    RecordAnswer {
        question_index: usize,
        option_index: usize,
    },
    Advance,
    SaveProgress {
        name: String,
        email: String,
    },
    Proceed,
    ShowCareers,
}

fn default_question_count() -> u32 {
    QuestionCount::default().get()
}

impl From<UserEvent> for Event {
    fn from(event: UserEvent) -> Self {
        match event {
            UserEvent::Start => Event::Start,
            UserEvent::SelectRole { role } => Event::SelectRole { role },
            UserEvent::RetryTopics => Event::RetryTopics,
            UserEvent::ChooseTopics { titles } => Event::ChooseTopics { titles },
            UserEvent::StartInterview { question_count } => {
                Event::StartInterview { question_count }
            }
            UserEvent::RetryQuestions => Event::RetryQuestions,
            UserEvent::RecordAnswer {
                question_index,
                option_index,
            } => Event::RecordAnswer {
                question_index,
                option_index,
            },
            UserEvent::Advance => Event::Advance,
            UserEvent::SaveProgress { name, email } => Event::SaveProgress { name, email },
            UserEvent::Proceed => Event::Proceed,
            UserEvent::ShowCareers => Event::ShowCareers,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/wizard
///
/// Current screen and session.
pub async fn handle_get_wizard(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.driver.view().await)
}

/// POST /api/v1/wizard/events
///
/// Applies one user event. Requests it starts run in the background; poll
/// GET /api/v1/wizard for their outcome.
pub async fn handle_wizard_event(
    State(state): State<AppState>,
    Json(event): Json<UserEvent>,
) -> Result<Json<SessionView>, AppError> {
    let dispatch = state.driver.dispatch(event.into()).await?;
    Ok(Json(dispatch.view))
}

/// POST /api/v1/wizard/restart
///
/// Back to the welcome screen with an empty session. Outstanding requests from the
/// previous session are ignored when they finish.
pub async fn handle_restart(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let dispatch = state.driver.dispatch(Event::Restart).await?;
    Ok(Json(dispatch.view))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::routes::build_router;
    use crate::wizard::driver::WizardDriver;
    use crate::wizard::testing::{RecordingStore, ScriptedContent};

    fn app() -> Router {
        let driver = WizardDriver::new(
            Arc::new(ScriptedContent::default()),
            Arc::new(RecordingStore::succeeding()),
        );
        build_router(AppState { driver })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[test]
    fn test_user_event_wire_format() {
        let event: UserEvent =
            serde_json::from_value(json!({"type": "select_role", "role": "QA"})).unwrap();
        assert_eq!(Event::from(event), Event::SelectRole { role: "QA".into() });

        let event: UserEvent =
            serde_json::from_value(json!({"type": "start_interview"})).unwrap();
        assert_eq!(
            Event::from(event),
            Event::StartInterview { question_count: 5 }
        );
    }

    #[test]
    fn test_completion_events_have_no_wire_form() {
        let result = serde_json::from_value::<UserEvent>(json!({"type": "topics_loaded"}));
        assert!(result.is_err());
        let result = serde_json::from_value::<UserEvent>(json!({"type": "restart"}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "prepai-api");
    }

    #[tokio::test]
    async fn test_get_wizard_starts_at_welcome() {
        let (status, body) = send(&app(), "GET", "/api/v1/wizard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], 0);
        assert_eq!(body["screen"]["kind"], "WELCOME");
    }

    #[tokio::test]
    async fn test_start_then_blank_role_is_validation_error() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/wizard/events",
            Some(json!({"type": "start"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"]["kind"], "ROLE_SELECTION");

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/wizard/events",
            Some(json!({"type": "select_role", "role": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_illegal_event_is_conflict() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/wizard/events",
            Some(json!({"type": "proceed"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_restart_bumps_generation() {
        let app = app();
        send(
            &app,
            "POST",
            "/api/v1/wizard/events",
            Some(json!({"type": "start"})),
        )
        .await;
        let (status, body) = send(&app, "POST", "/api/v1/wizard/restart", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], 1);
        assert_eq!(body["screen"]["kind"], "WELCOME");
        assert!(body["session"]["role"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_event_type_is_rejected_by_extractor() {
        let (status, _) = send(
            &app(),
            "POST",
            "/api/v1/wizard/events",
            Some(json!({"type": "complete"})),
        )
        .await;
        assert!(status.is_client_error());
    }
}
