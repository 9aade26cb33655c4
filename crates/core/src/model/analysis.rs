use crate::model::ids::DocumentId;
use crate::model::topic::Topic;

/// Normalized response of the paper-analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub id: Option<DocumentId>,
    pub exam_name: String,
    pub total_marks_analyzed: u32,
    pub overall_score: u32,
    pub topics: Vec<Topic>,
    pub key_insights: Vec<String>,
}

impl AnalysisResult {
    /// Marks analysed per submission; the service always reports out of 100.
    pub const TOTAL_MARKS: u32 = 100;

    #[must_use]
    pub fn new(exam_name: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            id: None,
            exam_name: exam_name.into(),
            total_marks_analyzed: Self::TOTAL_MARKS,
            overall_score: 0,
            topics,
            key_insights: Vec::new(),
        }
    }
}
