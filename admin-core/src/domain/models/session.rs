use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use strum::{Display, EnumIter, EnumString};

use super::SessionId;
use crate::domain::{FieldValue, SessionField, SessionStatus};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// How a session is organised. Wire tokens are SCREAMING_SNAKE_CASE.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    #[default]
    #[strum(to_string = "Project Based", serialize = "PROJECT_BASED")]
    ProjectBased,
    #[strum(to_string = "Product Based", serialize = "PRODUCT_BASED")]
    ProductBased,
}

impl SessionType {
    pub fn wire_form(self) -> &'static str {
        match self {
            Self::ProjectBased => "PROJECT_BASED",
            Self::ProductBased => "PRODUCT_BASED",
        }
    }
}

/// A session as the backend sends it.
///
/// Every field is optional: `get` returns the whole record but `update`
/// may answer with any subset, including derived fields the client never
/// edited. Unknown keys are kept in `extra`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: Option<SessionId>,
    pub title: Option<String>,
    pub technology: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<u32>,
    pub difficulty: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub current_status: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update body: only the keys being changed, in wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPatch(Map<String, Value>);

impl SessionPatch {
    pub fn single(field: SessionField, value: &FieldValue) -> Self {
        let mut map = Map::new();
        map.insert(field.wire_name().to_string(), value.to_wire());
        Self(map)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A session held by the detail view, with enum fields decoded to display form.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub technology: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub max_attendees: u32,
    pub difficulty: Difficulty,
    pub session_type: SessionType,
    pub current_status: SessionStatus,
    pub description: String,
    pub extra: Map<String, Value>,
}

impl Session {
    /// Build from a fetched record. `id` is used when the body omits one.
    pub fn from_record(id: SessionId, record: SessionRecord) -> Self {
        let mut session = Self {
            id,
            title: String::new(),
            technology: String::new(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            max_attendees: 0,
            difficulty: Difficulty::default(),
            session_type: SessionType::default(),
            current_status: SessionStatus::FALLBACK,
            description: String::new(),
            extra: Map::new(),
        };
        session.merge(record);
        session
    }

    pub fn value(&self, field: SessionField) -> FieldValue {
        match field {
            SessionField::Technology => FieldValue::Text(self.technology.clone()),
            SessionField::Date => FieldValue::Text(self.date.clone()),
            SessionField::Time => FieldValue::Text(self.time.clone()),
            SessionField::Location => FieldValue::Text(self.location.clone()),
            SessionField::MaxAttendees => FieldValue::Count(self.max_attendees),
            SessionField::Difficulty => FieldValue::Difficulty(self.difficulty),
            SessionField::Type => FieldValue::SessionType(self.session_type),
            SessionField::CurrentStatus => FieldValue::Status(self.current_status),
            SessionField::Description => FieldValue::Text(self.description.clone()),
        }
    }

    /// Apply every field present in `record`.
    ///
    /// Status tokens are decoded with the fallback. Difficulty and type
    /// tokens this client does not know leave the current value in place.
    /// Returns the descriptor fields that were present.
    pub fn merge(&mut self, record: SessionRecord) -> Vec<SessionField> {
        let mut applied = Vec::new();

        if let Some(id) = record.id {
            if id != self.id {
                tracing::warn!(expected = %self.id, received = %id, "session id changed in response");
            }
        }
        if let Some(title) = record.title {
            self.title = title;
        }
        if let Some(technology) = record.technology {
            self.technology = technology;
            applied.push(SessionField::Technology);
        }
        if let Some(date) = record.date {
            self.date = date;
            applied.push(SessionField::Date);
        }
        if let Some(time) = record.time {
            self.time = time;
            applied.push(SessionField::Time);
        }
        if let Some(location) = record.location {
            self.location = location;
            applied.push(SessionField::Location);
        }
        if let Some(max_attendees) = record.max_attendees {
            self.max_attendees = max_attendees;
            applied.push(SessionField::MaxAttendees);
        }
        if let Some(raw) = record.difficulty {
            match raw.parse() {
                Ok(difficulty) => {
                    self.difficulty = difficulty;
                    applied.push(SessionField::Difficulty);
                }
                Err(_) => tracing::warn!(value = %raw, "ignoring unknown difficulty"),
            }
        }
        if let Some(raw) = record.session_type {
            match raw.parse() {
                Ok(kind) => {
                    self.session_type = kind;
                    applied.push(SessionField::Type);
                }
                Err(_) => tracing::warn!(value = %raw, "ignoring unknown session type"),
            }
        }
        if let Some(raw) = record.current_status {
            self.current_status = SessionStatus::from_wire(&raw);
            applied.push(SessionField::CurrentStatus);
        }
        if let Some(description) = record.description {
            self.description = description;
            applied.push(SessionField::Description);
        }
        self.extra.extend(record.extra);

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> SessionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn record_keeps_unknown_keys() {
        let rec = record(json!({
            "id": "s1",
            "title": "Rust Workshop",
            "type": "PRODUCT_BASED",
            "registeredCount": 7
        }));
        assert_eq!(rec.session_type.as_deref(), Some("PRODUCT_BASED"));
        assert_eq!(rec.extra.get("registeredCount"), Some(&json!(7)));

        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["registeredCount"], json!(7));
        assert!(back.get("technology").is_none());
    }

    #[test]
    fn from_record_decodes_status_to_display_form() {
        let session = Session::from_record(
            SessionId::new("s1"),
            record(json!({ "currentStatus": "On_Hold", "maxAttendees": 30 })),
        );
        assert_eq!(session.current_status, SessionStatus::OnHold);
        assert_eq!(session.value(SessionField::CurrentStatus).to_string(), "On Hold");
        assert_eq!(session.max_attendees, 30);
    }

    #[test]
    fn merge_applies_only_present_fields() {
        let mut session = Session::from_record(
            SessionId::new("s1"),
            record(json!({ "technology": "Rust", "location": "Room 4" })),
        );

        let applied = session.merge(record(json!({
            "location": "Room 7",
            "currentStatus": "Testing"
        })));

        assert_eq!(
            applied,
            vec![SessionField::Location, SessionField::CurrentStatus]
        );
        assert_eq!(session.technology, "Rust");
        assert_eq!(session.location, "Room 7");
        assert_eq!(session.current_status, SessionStatus::Testing);
    }

    #[test]
    fn merge_keeps_difficulty_on_unknown_token() {
        let mut session = Session::from_record(
            SessionId::new("s1"),
            record(json!({ "difficulty": "Advanced" })),
        );
        let applied = session.merge(record(json!({ "difficulty": "Expert" })));
        assert!(applied.is_empty());
        assert_eq!(session.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn record_accepts_numeric_id() {
        let rec = record(json!({ "id": 7, "title": "Rust Workshop" }));
        assert_eq!(rec.id, Some(SessionId::new("7")));
        assert_eq!(rec.title.as_deref(), Some("Rust Workshop"));
    }

    #[test]
    fn patch_contains_single_wire_key() {
        let patch = SessionPatch::single(
            SessionField::CurrentStatus,
            &FieldValue::Status(SessionStatus::InProgress),
        );
        assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["currentStatus"]);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "currentStatus": "In_Progress" })
        );
    }
}
