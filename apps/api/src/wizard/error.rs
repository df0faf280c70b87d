use thiserror::Error;

use crate::wizard::session::ScreenKind;

/// Why the wizard refused an event. The session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("event '{event}' is not allowed on the {screen} screen")]
    InvalidTransition {
        screen: ScreenKind,
        event: &'static str,
    },

    #[error("{0}")]
    Validation(String),

    #[error("a request for this screen is already in progress")]
    RequestInFlight,

    #[error("answer the current question before advancing")]
    AnswerRequired,

    #[error("question {index} does not exist (the interview has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option {0} does not exist; every question has 4 options")]
    OptionOutOfRange(usize),

    #[error("progress has already been saved")]
    AlreadySaved,

    #[error("save your progress before continuing")]
    SaveRequired,
}
