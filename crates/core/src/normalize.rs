//! Boundary parser for the loosely typed payloads the analysis service emits.
//!
//! Backend records come in two generations of field names. Everything here
//! resolves the current names first and falls back to the legacy aliases, so
//! callers further in only ever see canonical `Topic`/`Document` values.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::{AnalysisResult, Difficulty, Document, DocumentId, Playlist, Priority, Topic};

pub const UNTITLED_TOPIC: &str = "Untitled Topic";
pub const MISSING_DEFINITION: &str = "No description available.";

//
// ─── TOPICS ────────────────────────────────────────────────────────────────────
//

/// Map an arbitrary backend topic object onto a canonical `Topic`.
///
/// Missing optional fields are defaulted; this never fails.
#[must_use]
pub fn normalize_topic(raw: &Value) -> Topic {
    let name = first_str(raw, &["main_topic", "name", "topic"]).unwrap_or(UNTITLED_TOPIC);
    let definition =
        first_str(raw, &["definition", "description"]).unwrap_or(MISSING_DEFINITION);
    let priority = first_str(raw, &["priority"])
        .map(Priority::normalize)
        .unwrap_or_default();
    let difficulty = first_str(raw, &["difficulty"])
        .map(Difficulty::normalize)
        .unwrap_or_default();

    let topic_query = first_str(raw, &["topic_query", "topicQuery"])
        .map_or_else(|| name.to_string(), str::to_string);
    let playlist_query = first_str(raw, &["playlist_query", "playlistQuery"])
        .map_or_else(|| format!("{name} tutorial"), str::to_string);

    Topic::new(name, definition, priority, difficulty)
        .with_side_topics(string_list(raw, &["side_topics", "subTopics"]))
        .with_question_types(string_list(raw, &["question_types", "expectedQuestions"]))
        .with_completed(first_bool(raw, &["completed", "isCompleted"]))
        .with_queries(topic_query, playlist_query)
}

#[must_use]
pub fn normalize_topics(raw: &[Value]) -> Vec<Topic> {
    raw.iter().map(normalize_topic).collect()
}

//
// ─── DOCUMENTS ─────────────────────────────────────────────────────────────────
//

/// The document's topic list, if it is present and actually an array.
///
/// Looks inside the `jsonFile` envelope first, then at the top level.
#[must_use]
pub fn topics_array(raw: &Value) -> Option<&Vec<Value>> {
    raw.get("jsonFile")
        .and_then(|file| file.get("topics"))
        .and_then(Value::as_array)
        .or_else(|| raw.get("topics").and_then(Value::as_array))
}

/// Normalize one entry of the document listing.
///
/// Returns `None` for entries that must not be displayed: nulls, non-objects,
/// anything without a `topics` array, and anything without an identity.
#[must_use]
pub fn normalize_document(raw: &Value) -> Option<Document> {
    if !raw.is_object() {
        return None;
    }
    let topics = topics_array(raw)?;
    let id = document_id(raw)?;

    let file = raw.get("jsonFile").filter(|f| f.is_object());
    let document_name = first_str(raw, &["documentName", "document_name", "name"])
        .or_else(|| file.and_then(|f| first_str(f, &["subject"])))
        .or_else(|| first_str(raw, &["subject"]))
        .unwrap_or("Untitled")
        .to_string();
    let subject = file
        .and_then(|f| first_str(f, &["subject"]))
        .or_else(|| first_str(raw, &["subject"]))
        .map_or_else(|| document_name.clone(), str::to_string);

    let playlists = file
        .and_then(|f| first_array(f, &["subjectPlaylists", "subject_playlists", "playlists"]))
        .or_else(|| first_array(raw, &["subjectPlaylists", "subject_playlists", "playlists"]))
        .map(|entries| entries.iter().filter_map(normalize_playlist).collect())
        .unwrap_or_default();

    let mut document = Document::new(id, document_name, subject, normalize_topics(topics))
        .with_playlists(playlists);
    if let Some(created_at) = created_at(raw) {
        document = document.with_created_at(created_at);
    }
    Some(document)
}

/// Entries without a link are unusable and skipped.
#[must_use]
pub fn normalize_playlist(raw: &Value) -> Option<Playlist> {
    let link = first_str(raw, &["link", "url"])?;
    let thumbnail = first_str(raw, &["thumbnail"]).unwrap_or_default();
    let name = first_str(raw, &["playlist_name", "playlistName", "title"]).unwrap_or_default();
    Some(Playlist::new(link, thumbnail, name))
}

//
// ─── ANALYSIS ──────────────────────────────────────────────────────────────────
//

/// Normalize the raw response of an analysis submission.
///
/// The reported subject is only trusted when the payload also carries a
/// topic array; otherwise the user's analysis name is used.
#[must_use]
pub fn normalize_analysis(raw: &Value, analysis_name: &str) -> AnalysisResult {
    let topics = raw.get("topics").and_then(Value::as_array);
    let exam_name = match (first_str(raw, &["subject"]), topics) {
        (Some(subject), Some(_)) => subject.to_string(),
        _ => analysis_name.to_string(),
    };

    let mut result = AnalysisResult::new(
        exam_name,
        topics.map(|t| normalize_topics(t)).unwrap_or_default(),
    );
    result.id = document_id(raw);
    result.overall_score = raw
        .get("overallScore")
        .and_then(Value::as_u64)
        .and_then(|s| u32::try_from(s).ok())
        .unwrap_or(0);
    result.key_insights = string_list(raw, &["keyInsights"]);
    result
}

//
// ─── FIELD HELPERS ─────────────────────────────────────────────────────────────
//

fn document_id(raw: &Value) -> Option<DocumentId> {
    ["_id", "documentId", "id"]
        .iter()
        .filter_map(|key| raw.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(DocumentId::new(s.trim())),
            Value::Number(n) => Some(DocumentId::new(n.to_string())),
            _ => None,
        })
}

fn created_at(raw: &Value) -> Option<DateTime<Utc>> {
    let text = first_str(raw, &["createdAt", "created_at"])?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First non-empty string among `keys`.
fn first_str<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| raw.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

fn first_array<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|key| raw.get(*key).and_then(Value::as_array))
}

fn first_bool(raw: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_bool))
        .unwrap_or(false)
}

/// First array among `keys`, keeping only its string entries.
fn string_list(raw: &Value, keys: &[&str]) -> Vec<String> {
    first_array(raw, keys)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
