use std::collections::{BTreeMap, HashSet};

use exam_core::model::Question;
use exam_core::ratio_percent;

/// Percentage at or above which a quiz counts as passed.
pub const PASS_THRESHOLD: u8 = 70;

/// Score of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: usize,
    pub total: usize,
    pub percentage: u8,
    /// Distinct topics of wrong or unanswered questions, in first-seen order.
    pub weak_topics: Vec<String>,
}

impl QuizOutcome {
    /// Score `answers` (question index to chosen option) against `questions`.
    ///
    /// A question with no recorded answer counts as incorrect.
    #[must_use]
    pub fn evaluate(questions: &[Question], answers: &BTreeMap<usize, usize>) -> Self {
        let mut score = 0;
        let mut seen = HashSet::new();
        let mut weak_topics = Vec::new();

        for (index, question) in questions.iter().enumerate() {
            let correct = answers
                .get(&index)
                .is_some_and(|&option| question.is_correct(option));
            if correct {
                score += 1;
            } else if !question.topic.is_empty() && seen.insert(question.topic.as_str()) {
                weak_topics.push(question.topic.clone());
            }
        }

        Self {
            score,
            total: questions.len(),
            percentage: ratio_percent(score, questions.len()),
            weak_topics,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize, topic: &str) -> Question {
        Question::new("Q", vec!["a".into(), "b".into(), "c".into()], answer, topic)
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let questions = vec![question(1, "Gates"), question(0, "K-Maps"), question(2, "Flip-flops")];
        let answers = BTreeMap::from([(0, 1), (1, 1)]);

        let outcome = QuizOutcome::evaluate(&questions, &answers);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.percentage, 33);
        assert_eq!(outcome.weak_topics, vec!["K-Maps".to_string(), "Flip-flops".to_string()]);
        assert!(!outcome.passed());
    }

    #[test]
    fn weak_topics_are_deduplicated_in_first_seen_order() {
        let questions = vec![
            question(0, "Thermodynamics"),
            question(0, "Optics"),
            question(0, "Thermodynamics"),
        ];
        let answers = BTreeMap::from([(0, 2), (1, 2), (2, 1)]);

        let outcome = QuizOutcome::evaluate(&questions, &answers);
        assert_eq!(outcome.weak_topics, vec!["Thermodynamics".to_string(), "Optics".to_string()]);
    }

    #[test]
    fn missed_questions_without_topic_are_not_listed() {
        let questions = vec![question(0, ""), question(1, "Optics"), question(2, "")];
        let answers = BTreeMap::from([(0, 1), (1, 0)]);

        let outcome = QuizOutcome::evaluate(&questions, &answers);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.weak_topics, vec!["Optics".to_string()]);
    }

    #[test]
    fn perfect_score_passes() {
        let questions = vec![question(0, "A"), question(2, "B")];
        let answers = BTreeMap::from([(0, 0), (1, 2)]);
        let outcome = QuizOutcome::evaluate(&questions, &answers);
        assert_eq!(outcome.percentage, 100);
        assert!(outcome.weak_topics.is_empty());
        assert!(outcome.passed());
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let outcome = QuizOutcome::evaluate(&[], &BTreeMap::new());
        assert_eq!(outcome.percentage, 0);
        assert_eq!(outcome.total, 0);
    }
}
