//! Interview run: answer recording, advancing, scoring.

use serde::Serialize;

use crate::content::models::{Feedback, Question};
use crate::wizard::error::WizardError;

/// Percentage of questions answered correctly, rounded half away from zero.
/// Unanswered questions count as wrong; an empty interview scores 0.
pub fn compute_score(questions: &[Question]) -> u8 {
    if questions.is_empty() {
        return 0;
    }
    let correct = questions.iter().filter(|q| q.is_correct()).count();
    (100.0 * correct as f64 / questions.len() as f64).round() as u8
}

/// Questions whose recorded answer differs from the correct one, unanswered included.
pub fn incorrect_questions(questions: &[Question]) -> Vec<Question> {
    questions.iter().filter(|q| !q.is_correct()).cloned().collect()
}

/// Outcome of a finished interview. The score is always derived from `questions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewResult {
    score: u8,
    questions: Vec<Question>,
    feedback: Feedback,
}

impl InterviewResult {
    pub fn new(questions: Vec<Question>, feedback: Feedback) -> Self {
        Self {
            score: compute_score(&questions),
            questions,
            feedback,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Moved(usize),
    /// No unanswered question remains after the current one.
    Finished,
}

/// The questions being answered and the one currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewRun {
    questions: Vec<Question>,
    current: usize,
}

impl InterviewRun {
    /// `None` when there is nothing to ask.
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            current: 0,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    /// Returns `Ok(false)` when the question already had an answer; the first one is kept.
    pub fn record_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<bool, WizardError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(question_index)
            .ok_or(WizardError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;
        if option_index >= Question::OPTION_COUNT {
            return Err(WizardError::OptionOutOfRange(option_index));
        }
        Ok(question.record_answer(option_index))
    }

    /// Moves to the next unanswered question after the current one, or reports that
    /// the interview is finished. The current question must be answered first.
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        if !self.current_question().is_answered() {
            return Err(WizardError::AnswerRequired);
        }
        let next = (self.current + 1..self.questions.len()).find(|&i| !self.questions[i].is_answered());
        match next {
            Some(index) => {
                self.current = index;
                Ok(Advance::Moved(index))
            }
            None => Ok(Advance::Finished),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> Question {
        Question::new("Q", ["a", "b", "c", "d"].map(String::from), correct).unwrap()
    }

    /// `answers[i]` is the option picked for question i (`None` = unanswered);
    /// every question's correct option is 0.
    fn answered(answers: &[Option<usize>]) -> Vec<Question> {
        answers
            .iter()
            .map(|answer| {
                let mut q = question(0);
                if let Some(option) = answer {
                    q.record_answer(*option);
                }
                q
            })
            .collect()
    }

    #[test]
    fn test_score_seven_of_ten() {
        let mut answers = vec![Some(0); 7];
        answers.extend([Some(1), Some(2), Some(3)]);
        assert_eq!(compute_score(&answered(&answers)), 70);
    }

    #[test]
    fn test_score_none_answered() {
        assert_eq!(compute_score(&answered(&[None; 5])), 0);
    }

    #[test]
    fn test_score_all_correct() {
        assert_eq!(compute_score(&answered(&[Some(0); 5])), 100);
    }

    #[test]
    fn test_score_empty_interview() {
        assert_eq!(compute_score(&[]), 0);
    }

    #[test]
    fn test_score_rounds_half_away_from_zero() {
        // 1/8 = 12.5% -> 13
        let mut answers = vec![Some(0)];
        answers.extend([Some(1); 7]);
        assert_eq!(compute_score(&answered(&answers)), 13);
        // 2/3 = 66.67% -> 67
        assert_eq!(compute_score(&answered(&[Some(0), Some(0), None])), 67);
    }

    #[test]
    fn test_incorrect_questions_include_unanswered() {
        let questions = answered(&[Some(0), Some(2), None]);
        assert_eq!(incorrect_questions(&questions).len(), 2);
    }

    #[test]
    fn test_result_score_is_derived() {
        let result = InterviewResult::new(answered(&[Some(0), Some(1)]), Feedback::placeholder());
        assert_eq!(result.score(), 50);
        assert_eq!(result.questions().len(), 2);
    }

    #[test]
    fn test_empty_run_is_rejected() {
        assert!(InterviewRun::new(vec![]).is_none());
    }

    #[test]
    fn test_record_answer_is_idempotent() {
        let mut run = InterviewRun::new(vec![question(1), question(2)]).unwrap();
        assert_eq!(run.record_answer(0, 3), Ok(true));
        assert_eq!(run.record_answer(0, 1), Ok(false));
        assert_eq!(run.questions()[0].user_answer_index(), Some(3));
    }

    #[test]
    fn test_record_answer_rejects_out_of_range() {
        let mut run = InterviewRun::new(vec![question(1)]).unwrap();
        assert_eq!(
            run.record_answer(1, 0),
            Err(WizardError::QuestionOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(run.record_answer(0, 4), Err(WizardError::OptionOutOfRange(4)));
        assert!(!run.questions()[0].is_answered());
    }

    #[test]
    fn test_advance_requires_current_answer() {
        let mut run = InterviewRun::new(vec![question(0), question(0)]).unwrap();
        assert_eq!(run.advance(), Err(WizardError::AnswerRequired));
        assert_eq!(run.current_index(), 0);
    }

    #[test]
    fn test_advance_skips_already_answered_questions() {
        let mut run = InterviewRun::new(vec![question(0), question(0), question(0)]).unwrap();
        run.record_answer(1, 2).unwrap();
        run.record_answer(0, 0).unwrap();
        assert_eq!(run.advance(), Ok(Advance::Moved(2)));
        assert_eq!(run.current_index(), 2);
        run.record_answer(2, 0).unwrap();
        assert_eq!(run.advance(), Ok(Advance::Finished));
        assert_eq!(run.answered_count(), 3);
    }

    #[test]
    fn test_advance_on_last_question_finishes() {
        let mut run = InterviewRun::new(vec![question(0)]).unwrap();
        run.record_answer(0, 1).unwrap();
        assert_eq!(run.advance(), Ok(Advance::Finished));
    }
}
