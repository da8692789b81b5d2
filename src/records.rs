//! Author and work records as returned by OpenAlex.
//!
//! Records keep the raw JSON so that a malformed optional field (a string
//! where an object was expected, a `null` source, ...) only degrades that
//! field instead of failing deserialization of the whole record.

use crate::extract::{self, get_or_default, require_i64, require_str};
use crate::error::{OpenAlexError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const AUTHOR: &str = "author";
const WORK: &str = "work";

/// An OpenAlex author object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorRecord(Value);

impl AuthorRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Full id URI, e.g. `https://openalex.org/A123`.
    pub fn id(&self) -> Result<String> {
        require_str(&self.0, &["id"], AUTHOR)
    }

    /// Bare OpenAlex id, e.g. `A123`.
    pub fn openalex_id(&self) -> Result<String> {
        self.id().map(|id| extract::last_path_segment(&id).to_string())
    }

    pub fn display_name(&self) -> Result<String> {
        require_str(&self.0, &["display_name"], AUTHOR)
    }

    /// Raw `last_known_institution` value, for diagnostics.
    pub fn raw_last_known_institution(&self) -> Option<&Value> {
        extract::lookup(&self.0, &["last_known_institution"])
    }

    /// Institution name, or `""` when missing or malformed.
    pub fn last_known_institution(&self) -> String {
        get_or_default(&self.0, &["last_known_institution", "display_name"], "")
    }

    pub fn cited_by_count(&self) -> Result<i64> {
        require_i64(&self.0, &["cited_by_count"], AUTHOR)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for AuthorRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// An OpenAlex work object (search hit or full record)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkRecord(Value);

impl WorkRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Full id URI, e.g. `https://openalex.org/W9`.
    pub fn id(&self) -> Result<String> {
        require_str(&self.0, &["id"], WORK)
    }

    /// Bare OpenAlex id, e.g. `W9`.
    pub fn openalex_id(&self) -> Result<String> {
        self.id().map(|id| extract::last_path_segment(&id).to_string())
    }

    /// Title; null or missing titles make the record malformed.
    pub fn title(&self) -> Result<String> {
        require_str(&self.0, &["title"], WORK)
    }

    /// Abstract, or `""`.
    pub fn abstract_text(&self) -> String {
        extract::abstract_text(&self.0)
    }

    /// Name of the primary location's source, or `""`.
    pub fn venue(&self) -> String {
        get_or_default(&self.0, &["primary_location", "source", "display_name"], "")
    }

    /// Display names of all authorships, in upstream order.
    pub fn authors(&self) -> Result<Vec<String>> {
        let authorships = extract::lookup(&self.0, &["authorships"])
            .and_then(Value::as_array)
            .ok_or_else(|| OpenAlexError::malformed(WORK, "authorships"))?;

        authorships
            .iter()
            .enumerate()
            .map(|(i, authorship)| {
                extract::lookup(authorship, &["author", "display_name"])
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        OpenAlexError::malformed(WORK, format!("authorships[{}].author.display_name", i))
                    })
            })
            .collect()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for WorkRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_fields() {
        let author = AuthorRecord::new(json!({
            "id": "https://openalex.org/A123",
            "display_name": "Jane Doe",
            "last_known_institution": {"display_name": "University of Somewhere"},
            "cited_by_count": 17
        }));

        assert_eq!(author.openalex_id().unwrap(), "A123");
        assert_eq!(author.display_name().unwrap(), "Jane Doe");
        assert_eq!(author.last_known_institution(), "University of Somewhere");
        assert_eq!(author.cited_by_count().unwrap(), 17);
    }

    #[test]
    fn test_author_institution_defended() {
        for raw in [
            json!({}),
            json!({"last_known_institution": null}),
            json!({"last_known_institution": "just a string"}),
            json!({"last_known_institution": {"id": "I1"}}),
        ] {
            assert_eq!(AuthorRecord::new(raw).last_known_institution(), "");
        }
    }

    #[test]
    fn test_author_required_fields() {
        let author = AuthorRecord::new(json!({"display_name": "No Id"}));
        assert!(matches!(
            author.id(),
            Err(OpenAlexError::MalformedRecord { record: "author", .. })
        ));
        assert!(author.cited_by_count().is_err());
    }

    #[test]
    fn test_work_fields() {
        let work = WorkRecord::new(json!({
            "id": "https://openalex.org/W9",
            "title": "T",
            "abstract_inverted_index": {"Hello": [0], "world": [1]},
            "primary_location": {"source": {"display_name": "Venue"}},
            "authorships": [
                {"author": {"display_name": "A"}},
                {"author": {"display_name": "B"}}
            ]
        }));

        assert_eq!(work.openalex_id().unwrap(), "W9");
        assert_eq!(work.title().unwrap(), "T");
        assert_eq!(work.abstract_text(), "Hello world");
        assert_eq!(work.venue(), "Venue");
        assert_eq!(work.authors().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_work_venue_with_null_source() {
        let work = WorkRecord::new(json!({"primary_location": {"source": null}}));
        assert_eq!(work.venue(), "");
    }

    #[test]
    fn test_work_authors_required() {
        let missing = WorkRecord::new(json!({"title": "T"}));
        assert!(matches!(
            missing.authors(),
            Err(OpenAlexError::MalformedRecord { ref field, .. }) if field == "authorships"
        ));

        let broken = WorkRecord::new(json!({
            "authorships": [{"author": {"display_name": "A"}}, {"author": null}]
        }));
        assert!(matches!(
            broken.authors(),
            Err(OpenAlexError::MalformedRecord { ref field, .. })
                if field == "authorships[1].author.display_name"
        ));

        let empty = WorkRecord::new(json!({"authorships": []}));
        assert!(empty.authors().unwrap().is_empty());
    }

    #[test]
    fn test_null_title_is_malformed() {
        let work = WorkRecord::new(json!({"title": null}));
        assert!(work.title().is_err());
    }
}
