use std::collections::BTreeMap;
use std::fmt;

use exam_core::model::{Question, Quiz};

use super::outcome::QuizOutcome;
use super::progress::QuizProgress;
use crate::error::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress,
    Finished,
}

/// In-memory run through one generated quiz.
///
/// Starts at question 0 with nothing answered. The current index always
/// addresses a question. Once finished, the session is frozen; trying again
/// means requesting a new quiz.
pub struct QuizSession {
    subject: String,
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, usize>,
    state: QuizState,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the quiz has no questions.
    pub fn new(quiz: Quiz) -> Result<Self, QuizError> {
        if quiz.questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            subject: quiz.subject,
            questions: quiz.questions,
            current: 0,
            answers: BTreeMap::new(),
            state: QuizState::InProgress,
        })
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == QuizState::Finished
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Option recorded for the question at `index`, if any.
    #[must_use]
    pub fn selected_answer(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.selected_answer(self.current)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            current: self.current,
            is_finished: self.is_finished(),
        }
    }

    /// Record or overwrite the answer to the current question.
    ///
    /// Does not advance. Ignored once the quiz is finished.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidOption` if `option` is not one of the
    /// current question's options.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        if self.is_finished() {
            return Ok(());
        }
        let options = self.current_question().options.len();
        if option >= options {
            return Err(QuizError::InvalidOption { option, options });
        }
        self.answers.insert(self.current, option);
        Ok(())
    }

    /// Move to the next question once the current one is answered.
    ///
    /// # Errors
    ///
    /// Returns `Finished`, `Unanswered`, or `AtLastQuestion` (use `finish` there).
    pub fn next(&mut self) -> Result<usize, QuizError> {
        self.ensure_in_progress()?;
        if self.current_answer().is_none() {
            return Err(QuizError::Unanswered);
        }
        if self.is_last_question() {
            return Err(QuizError::AtLastQuestion);
        }
        self.current += 1;
        Ok(self.current)
    }

    /// Step back one question; stays put on the first one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` after the quiz is finished.
    pub fn previous(&mut self) -> Result<usize, QuizError> {
        self.ensure_in_progress()?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Finish the quiz from the last question and score it.
    ///
    /// # Errors
    ///
    /// Returns `Finished`, `NotAtLastQuestion`, or `Unanswered`; the state is
    /// unchanged on error.
    pub fn finish(&mut self) -> Result<QuizOutcome, QuizError> {
        self.ensure_in_progress()?;
        if !self.is_last_question() {
            return Err(QuizError::NotAtLastQuestion);
        }
        if self.current_answer().is_none() {
            return Err(QuizError::Unanswered);
        }
        self.state = QuizState::Finished;
        Ok(QuizOutcome::evaluate(&self.questions, &self.answers))
    }

    /// Score of the session, available only once finished.
    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.is_finished()
            .then(|| QuizOutcome::evaluate(&self.questions, &self.answers))
    }

    fn ensure_in_progress(&self) -> Result<(), QuizError> {
        if self.is_finished() {
            Err(QuizError::Finished)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject", &self.subject)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("state", &self.state)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
