use serde::{Deserialize, Deserializer, Serialize};

/// A single multiple-choice question supplied by the quiz generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub difficulty: String,
}

/// Absent and `null` both read as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Question {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer_index,
            topic: topic.into(),
            difficulty: String::new(),
        }
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        self.answer_index == option
    }
}

/// A generated quiz for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub subject: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn new(subject: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            subject: subject.into(),
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_reads_wire_shape() {
        let q: Question = serde_json::from_str(
            r#"{"question":"2+2?","options":["3","4"],"answerIndex":1,"topic":"Arithmetic"}"#,
        )
        .unwrap();
        assert_eq!(q.answer_index, 1);
        assert_eq!(q.topic, "Arithmetic");
        assert!(q.difficulty.is_empty());
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn null_topic_and_difficulty_read_as_empty() {
        let q: Question = serde_json::from_str(
            r#"{"question":"2+2?","options":["3","4"],"answerIndex":1,"topic":null,"difficulty":null}"#,
        )
        .unwrap();
        assert!(q.topic.is_empty());
        assert!(q.difficulty.is_empty());
    }
}
