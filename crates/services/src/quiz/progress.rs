/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub is_finished: bool,
}

impl QuizProgress {
    /// One-based position of the current question, for "Question 2 of 5" labels.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current + 1
    }
}
