use serde::{Deserialize, Serialize};

/// One row of the suggestion source document.
///
/// Extra fields in the source object are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    /// Query key. Not unique: several entries may share an id.
    pub id: String,
    /// Display text returned to the caller.
    pub name: String,
    /// Ranking weight. Lower cost ranks first.
    pub cost: f64,
}

impl SuggestionEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }
}

/// A single ranked match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Zero-based rank among the matches of one lookup.
    pub positions: usize,
    pub text: String,
}

/// The ordered matches of one lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionResult {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub(crate) fn push(&mut self, text: String) {
        let positions = self.suggestions.len();
        self.suggestions.push(Suggestion { positions, text });
    }

    /// Renders the response body: `{}` when nothing matched, otherwise
    /// `{"suggestions": [...]}` pretty-printed with a 4-space indent.
    pub fn to_json_body(&self) -> Result<String, serde_json::Error> {
        if self.is_empty() {
            return Ok("{}".to_string());
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;

        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
