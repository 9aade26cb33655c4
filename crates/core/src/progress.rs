use crate::model::{Document, Topic};

/// `round(100 * part / total)` with halves rounded up, or `0` when `total` is zero.
///
/// `part` is clamped to `total`, so the result is always within `0..=100`.
#[must_use]
pub fn ratio_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u128;
    let total = total as u128;
    let rounded = (part * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Completion percentage of a topic list.
#[must_use]
pub fn percentage(topics: &[Topic]) -> u8 {
    let completed = topics.iter().filter(|t| t.is_completed()).count();
    ratio_percent(completed, topics.len())
}

/// Readiness figures shown for a document.
///
/// Always derived from the current topic list; nothing here is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentProgress {
    pub total: usize,
    pub completed: usize,
    pub percentage: u8,
    pub side_topic_count: usize,
    pub has_playlists: bool,
}

impl DocumentProgress {
    #[must_use]
    pub fn of(document: &Document) -> Self {
        let topics = document.topics();
        let completed = topics.iter().filter(|t| t.is_completed()).count();
        Self {
            total: topics.len(),
            completed,
            percentage: ratio_percent(completed, topics.len()),
            side_topic_count: topics.iter().map(|t| t.side_topics().len()).sum(),
            has_playlists: document.has_playlists(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }
}
