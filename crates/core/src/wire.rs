//! Outbound wire shapes for documents sent back to the analysis service.
//!
//! Inbound payloads are parsed by [`crate::normalize`]; these records only
//! describe what the client writes. A document that came from the service is
//! written back as received, with only client-owned state patched in.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{Document, Playlist, Topic};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "documentName")]
    pub document_name: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "jsonFile")]
    pub json_file: DocumentFileRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFileRecord {
    pub subject: String,
    pub topics: Vec<TopicRecord>,
    #[serde(rename = "subjectPlaylists")]
    pub subject_playlists: Vec<PlaylistRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRecord {
    pub main_topic: String,
    pub definition: String,
    pub priority: &'static str,
    pub difficulty: &'static str,
    pub side_topics: Vec<String>,
    pub question_types: Vec<String>,
    pub completed: bool,
    pub topic_query: String,
    pub playlist_query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistRecord {
    pub link: String,
    pub thumbnail: String,
    pub playlist_name: String,
}

impl DocumentRecord {
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id().as_str().to_string(),
            document_name: document.document_name().to_string(),
            created_at: document.created_at(),
            json_file: DocumentFileRecord {
                subject: document.subject().to_string(),
                topics: document.topics().iter().map(TopicRecord::from_topic).collect(),
                subject_playlists: document
                    .playlists()
                    .iter()
                    .map(PlaylistRecord::from_playlist)
                    .collect(),
            },
        }
    }
}

impl TopicRecord {
    #[must_use]
    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            main_topic: topic.main_topic().to_string(),
            definition: topic.definition().to_string(),
            priority: topic.priority().as_str(),
            difficulty: topic.difficulty().as_str(),
            side_topics: topic.side_topics().to_vec(),
            question_types: topic.question_types().to_vec(),
            completed: topic.is_completed(),
            topic_query: topic.topic_query().to_string(),
            playlist_query: topic.playlist_query().to_string(),
        }
    }
}

impl PlaylistRecord {
    #[must_use]
    pub fn from_playlist(playlist: &Playlist) -> Self {
        Self {
            link: playlist.link.clone(),
            thumbnail: playlist.thumbnail.clone(),
            playlist_name: playlist.playlist_name.clone(),
        }
    }
}

//
// ─── SAVE BODY ─────────────────────────────────────────────────────────────────
//

const PLAYLIST_KEYS: [&str; 3] = ["subjectPlaylists", "subject_playlists", "playlists"];

/// Full-document body for the save endpoint.
///
/// With the `source` payload the document was read from, the body is that
/// payload with each topic's completion flag and, if it had none, the
/// attached playlists written in; every other field is left as received.
/// Without a source the body is built from [`DocumentRecord`].
///
/// # Errors
///
/// Returns `serde_json::Error` if a record cannot be serialized.
pub fn save_body(document: &Document, source: Option<&Value>) -> Result<Value, serde_json::Error> {
    let Some(Value::Object(source)) = source else {
        return serde_json::to_value(DocumentRecord::from_document(document));
    };
    let mut body = source.clone();

    let nested = matches!(
        body.get("jsonFile"),
        Some(Value::Object(file)) if file.get("topics").is_some_and(Value::is_array)
    );
    let container = if nested {
        body.get_mut("jsonFile").and_then(Value::as_object_mut)
    } else {
        Some(&mut body)
    };
    let Some(container) = container else {
        return Ok(Value::Object(body));
    };

    if let Some(Value::Array(topics)) = container.get_mut("topics") {
        for (raw, topic) in topics.iter_mut().zip(document.topics()) {
            if let Value::Object(fields) = raw {
                patch_completed(fields, topic.is_completed());
            }
        }
    }

    let has_playlists = PLAYLIST_KEYS
        .iter()
        .any(|key| container.get(*key).and_then(Value::as_array).is_some_and(|p| !p.is_empty()));
    if document.has_playlists() && !has_playlists {
        let records: Vec<PlaylistRecord> =
            document.playlists().iter().map(PlaylistRecord::from_playlist).collect();
        container.insert(PLAYLIST_KEYS[0].to_string(), serde_json::to_value(records)?);
    }

    Ok(Value::Object(body))
}

/// Write the flag under `completed`, and under `isCompleted` when the entry uses that name.
fn patch_completed(fields: &mut Map<String, Value>, completed: bool) {
    fields.insert("completed".to_string(), Value::Bool(completed));
    if fields.contains_key("isCompleted") {
        fields.insert("isCompleted".to_string(), Value::Bool(completed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, DocumentId, Priority};
    use crate::normalize::normalize_document;
    use serde_json::json;

    #[test]
    fn written_records_read_back_unchanged() {
        let mut doc = Document::new(
            DocumentId::new("abc"),
            "Finals",
            "Physics",
            vec![
                Topic::new("Waves", "Oscillation", Priority::High, Difficulty::Hard)
                    .with_side_topics(vec!["Interference".into()])
                    .with_question_types(vec!["Derive".into()]),
            ],
        )
        .with_playlists(vec![Playlist::new("https://y/1", "t.jpg", "Waves 101")])
        .with_created_at(crate::time::fixed_now());
        doc.toggle_topic(0).unwrap();

        let value = serde_json::to_value(DocumentRecord::from_document(&doc)).unwrap();
        assert_eq!(value["jsonFile"]["topics"][0]["priority"], "High");
        assert_eq!(value["jsonFile"]["topics"][0]["completed"], true);

        let back = normalize_document(&value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn save_body_keeps_unmodelled_fields() {
        let source = json!({
            "_id": "a",
            "userId": "u1",
            "createdAt": "2024-03-01 10:00:00",
            "jsonFile": {
                "overallScore": 42,
                "keyInsights": ["x"],
                "topics": [
                    { "main_topic": "T0", "id": "topic-0" },
                    { "name": "T1", "isCompleted": true, "priority": "low" }
                ]
            }
        });
        let mut doc = normalize_document(&source).unwrap();
        doc.toggle_topic(0).unwrap();
        doc.toggle_topic(1).unwrap();

        let body = save_body(&doc, Some(&source)).unwrap();

        let mut expected = source.clone();
        expected["jsonFile"]["topics"][0]["completed"] = json!(true);
        expected["jsonFile"]["topics"][1]["completed"] = json!(false);
        expected["jsonFile"]["topics"][1]["isCompleted"] = json!(false);
        assert_eq!(body, expected);
    }

    #[test]
    fn save_body_adds_playlists_only_when_source_has_none() {
        let source = json!({ "_id": "a", "topics": [{ "main_topic": "T0" }] });
        let doc = normalize_document(&source)
            .unwrap()
            .with_playlists(vec![Playlist::new("https://y/1", "t.jpg", "Intro")]);

        let body = save_body(&doc, Some(&source)).unwrap();
        assert_eq!(body["subjectPlaylists"][0]["playlist_name"], "Intro");
        assert_eq!(body["topics"][0], json!({ "main_topic": "T0", "completed": false }));

        let with_playlists = json!({
            "_id": "a",
            "jsonFile": {
                "topics": [],
                "subject_playlists": [{ "link": "https://y/2", "extra": 1 }]
            }
        });
        let body = save_body(&doc, Some(&with_playlists)).unwrap();
        assert_eq!(body, with_playlists);
    }

    #[test]
    fn save_body_without_source_uses_record() {
        let doc = Document::new(DocumentId::new("n"), "New", "Logic", Vec::new());
        let body = save_body(&doc, None).unwrap();
        assert_eq!(body["_id"], "n");
        assert_eq!(body["jsonFile"]["subject"], "Logic");
    }
}
