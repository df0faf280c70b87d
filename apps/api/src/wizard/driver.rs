//! Wizard driver: runs the machine's effects against the collaborators.
//!
//! User events are applied under the session lock and return immediately. Each
//! effect runs in its own task and feeds its completion back through
//! `Wizard::resolve`, tagged with the generation that issued it. The lock is never
//! held across a collaborator call.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

use crate::content::generator::ContentGenerator;
use crate::content::models::{accept_questions, Explanation, Feedback, Topic};
use crate::results::webhook::ResultsStore;
use crate::wizard::error::WizardError;
use crate::wizard::interview::{compute_score, incorrect_questions, InterviewResult};
use crate::wizard::machine::{Command, Effect, Event, Resolution, Wizard};
use crate::wizard::views::{render, SessionView};

const TOPICS_FAILED: &str = "could not generate topics for this role; please try again";
const QUESTIONS_FAILED: &str = "could not generate interview questions; please try again";
const CAREERS_FAILED: &str = "career suggestions are not available right now";

/// Result of a user event: the view right after it was applied, plus the tasks
/// started for its effects.
pub struct Dispatch {
    pub view: SessionView,
    pub pending: Vec<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct WizardDriver {
    wizard: Arc<Mutex<Wizard>>,
    content: Arc<dyn ContentGenerator>,
    store: Arc<dyn ResultsStore>,
}

impl WizardDriver {
    pub fn new(content: Arc<dyn ContentGenerator>, store: Arc<dyn ResultsStore>) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(Wizard::new())),
            content,
            store,
        }
    }

    pub async fn view(&self) -> SessionView {
        render(&*self.wizard.lock().await)
    }

    pub async fn dispatch(&self, event: Event) -> Result<Dispatch, WizardError> {
        let (commands, view) = {
            let mut wizard = self.wizard.lock().await;
            let commands = wizard.handle(event)?;
            (commands, render(&wizard))
        };

        let pending = commands
            .into_iter()
            .map(|command| self.spawn(command))
            .collect();
        Ok(Dispatch { view, pending })
    }

    fn spawn(&self, command: Command) -> JoinHandle<()> {
        let driver = self.clone();
        tokio::spawn(async move {
            let Command { generation, effect } = command;
            let completion = driver.execute(effect).await;
            driver.complete(generation, completion).await;
        })
    }

    async fn complete(&self, generation: u64, event: Event) {
        let name = event.name();
        let mut wizard = self.wizard.lock().await;
        match wizard.resolve(generation, event) {
            Ok(Resolution::Applied) | Ok(Resolution::Stale) => {}
            Err(e) => warn!("Completion '{name}' was not accepted: {e}"),
        }
    }

    /// Performs one effect and turns its outcome into the completion event.
    /// Failures are logged here; the session only sees a generic message.
    async fn execute(&self, effect: Effect) -> Event {
        match effect {
            Effect::ListTopics { role } => match self.content.list_topics(&role).await {
                Ok(topics) => Event::TopicsLoaded(Ok(topics)),
                Err(e) => {
                    warn!("Topic generation failed for '{role}': {e}");
                    Event::TopicsLoaded(Err(TOPICS_FAILED.to_string()))
                }
            },

            Effect::ExplainTopics { role, titles } => Event::SelectTopics {
                topics: self.explain_all(&role, titles).await,
            },

            Effect::GenerateQuestions {
                role,
                topics,
                count,
            } => match self.content.generate_questions(&role, &topics, count).await {
                Ok(raw) => {
                    let generated = raw.len();
                    let questions = accept_questions(raw, count as usize);
                    info!(
                        "Accepted {} of {generated} generated questions (requested {count})",
                        questions.len()
                    );
                    Event::QuestionsLoaded(Ok(questions))
                }
                Err(e) => {
                    warn!("Question generation failed for '{role}': {e}");
                    Event::QuestionsLoaded(Err(QUESTIONS_FAILED.to_string()))
                }
            },

            Effect::GenerateFeedback { role, questions } => {
                let score = compute_score(&questions);
                let incorrect = incorrect_questions(&questions);
                let feedback = match self
                    .content
                    .generate_feedback(&role, score, &incorrect)
                    .await
                {
                    Ok(feedback) => feedback,
                    Err(e) => {
                        warn!("Feedback generation failed, using placeholder: {e}");
                        Feedback::placeholder()
                    }
                };
                Event::Complete {
                    result: InterviewResult::new(questions, feedback),
                }
            }

            Effect::SaveResult { record } => {
                let outcome = self.store.save_result(&record).await;
                Event::SaveCompleted(outcome)
            }

            Effect::SuggestCareers { role } => match self.content.suggest_careers(&role).await {
                Ok(suggestions) => Event::CareersLoaded(Ok(suggestions)),
                Err(e) => {
                    warn!("Career suggestions failed for '{role}': {e}");
                    Event::CareersLoaded(Err(CAREERS_FAILED.to_string()))
                }
            },
        }
    }

    /// Fetches every explanation concurrently and returns the topics in the order
    /// of `titles`. A failed fetch gets the placeholder explanation.
    async fn explain_all(&self, role: &str, titles: Vec<String>) -> Vec<Topic> {
        let mut tasks = JoinSet::new();
        for (index, title) in titles.iter().cloned().enumerate() {
            let content = Arc::clone(&self.content);
            let role = role.to_string();
            tasks.spawn(async move { (index, content.explain_concept(&title, &role).await) });
        }

        let mut slots: Vec<Option<Explanation>> = vec![None; titles.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(explanation))) => slots[index] = Some(explanation),
                Ok((index, Err(e))) => {
                    warn!("Explanation for '{}' failed, using placeholder: {e}", titles[index])
                }
                Err(e) => warn!("Explanation task aborted, using placeholder: {e}"),
            }
        }

        titles
            .into_iter()
            .zip(slots)
            .map(|(title, explanation)| Topic {
                title,
                explanation: explanation.unwrap_or_else(Explanation::placeholder),
            })
            .collect()
    }
}
