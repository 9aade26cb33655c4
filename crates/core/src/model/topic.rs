use std::fmt;

//
// ─── PRIORITY / DIFFICULTY ─────────────────────────────────────────────────────
//

/// How much exam weight a topic carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Maps a loosely formatted backend value onto a priority.
    ///
    /// Casing is ignored. Anything unrecognised becomes `Medium`.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match capitalize(raw).as_str() {
            "High" => Self::High,
            "Low" => Self::Low,
            _ => Self::Medium,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Perceived difficulty of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Maps a loosely formatted backend value onto a difficulty.
    ///
    /// `moderate` is a synonym for `Medium`. Unrecognised values default to
    /// `Medium` rather than either extreme.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match capitalize(raw).as_str() {
            "Easy" => Self::Easy,
            "Hard" => Self::Hard,
            _ => Self::Medium,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// One syllabus unit extracted from the uploaded papers.
///
/// Topics arrive fully formed from the normalizer; the only mutation the client
/// performs is toggling `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    main_topic: String,
    definition: String,
    priority: Priority,
    difficulty: Difficulty,
    side_topics: Vec<String>,
    question_types: Vec<String>,
    completed: bool,
    topic_query: String,
    playlist_query: String,
}

impl Topic {
    /// Creates an uncompleted topic whose search queries derive from its name.
    #[must_use]
    pub fn new(
        main_topic: impl Into<String>,
        definition: impl Into<String>,
        priority: Priority,
        difficulty: Difficulty,
    ) -> Self {
        let main_topic = main_topic.into();
        let topic_query = main_topic.clone();
        let playlist_query = format!("{main_topic} tutorial");
        Self {
            main_topic,
            definition: definition.into(),
            priority,
            difficulty,
            side_topics: Vec::new(),
            question_types: Vec::new(),
            completed: false,
            topic_query,
            playlist_query,
        }
    }

    #[must_use]
    pub fn with_side_topics(mut self, side_topics: Vec<String>) -> Self {
        self.side_topics = side_topics;
        self
    }

    #[must_use]
    pub fn with_question_types(mut self, question_types: Vec<String>) -> Self {
        self.question_types = question_types;
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn with_queries(
        mut self,
        topic_query: impl Into<String>,
        playlist_query: impl Into<String>,
    ) -> Self {
        self.topic_query = topic_query.into();
        self.playlist_query = playlist_query.into();
        self
    }

    #[must_use]
    pub fn main_topic(&self) -> &str {
        &self.main_topic
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn side_topics(&self) -> &[String] {
        &self.side_topics
    }

    #[must_use]
    pub fn question_types(&self) -> &[String] {
        &self.question_types
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Search query for a single lesson on this topic.
    #[must_use]
    pub fn topic_query(&self) -> &str {
        &self.topic_query
    }

    /// Search query for a playlist covering this topic.
    #[must_use]
    pub fn playlist_query(&self) -> &str {
        &self.playlist_query
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip the completion flag, returning the new value.
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}
