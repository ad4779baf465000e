use std::fmt;

use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use time::macros::format_description;

use super::{CoercionError, Difficulty, SessionStatus, SessionType};

/// Editable fields of a session, each with a fixed wire name and kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum SessionField {
    Technology,
    Date,
    Time,
    Location,
    MaxAttendees,
    Difficulty,
    #[strum(serialize = "type")]
    Type,
    CurrentStatus,
    Description,
}

impl SessionField {
    /// Key used in JSON payloads.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Date => "date",
            Self::Time => "time",
            Self::Location => "location",
            Self::MaxAttendees => "maxAttendees",
            Self::Difficulty => "difficulty",
            Self::Type => "type",
            Self::CurrentStatus => "currentStatus",
            Self::Description => "description",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Location => "Location",
            Self::MaxAttendees => "Max Attendees",
            Self::Difficulty => "Difficulty",
            Self::Type => "Type",
            Self::CurrentStatus => "Current Status",
            Self::Description => "Description",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Technology | Self::Location => FieldKind::Text,
            Self::Description => FieldKind::LongText,
            Self::Date => FieldKind::Date,
            Self::Time => FieldKind::Time,
            Self::MaxAttendees => FieldKind::Count,
            Self::Difficulty => FieldKind::Difficulty,
            Self::Type => FieldKind::SessionType,
            Self::CurrentStatus => FieldKind::Status,
        }
    }
}

/// Value type of a field, which decides how input is coerced and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Date,
    Time,
    Count,
    Difficulty,
    SessionType,
    Status,
}

/// A field value in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Count(u32),
    Difficulty(Difficulty),
    SessionType(SessionType),
    Status(SessionStatus),
}

impl FieldValue {
    /// Coerce raw input (a form value or a CLI argument) into `kind`.
    ///
    /// Dates and times are normalized; enum kinds accept display or wire
    /// spelling.
    pub fn coerce(kind: FieldKind, raw: &str) -> Result<Self, CoercionError> {
        let trimmed = raw.trim();
        match kind {
            FieldKind::Text | FieldKind::LongText => Ok(Self::Text(raw.to_string())),
            FieldKind::Date => {
                let format = format_description!("[year]-[month]-[day]");
                let date = time::Date::parse(trimmed, format)
                    .map_err(|_| CoercionError::InvalidDate(raw.to_string()))?;
                let text = date
                    .format(format)
                    .map_err(|_| CoercionError::InvalidDate(raw.to_string()))?;
                Ok(Self::Text(text))
            }
            FieldKind::Time => {
                let short = format_description!("[hour]:[minute]");
                let long = format_description!("[hour]:[minute]:[second]");
                let parsed = time::Time::parse(trimmed, short)
                    .or_else(|_| time::Time::parse(trimmed, long))
                    .map_err(|_| CoercionError::InvalidTime(raw.to_string()))?;
                let text = parsed
                    .format(short)
                    .map_err(|_| CoercionError::InvalidTime(raw.to_string()))?;
                Ok(Self::Text(text))
            }
            FieldKind::Count => trimmed
                .parse::<u32>()
                .map(Self::Count)
                .map_err(|_| CoercionError::InvalidNumber(raw.to_string())),
            FieldKind::Difficulty => trimmed.parse::<Difficulty>().map(Self::Difficulty).map_err(
                |_| CoercionError::UnknownVariant {
                    kind: "difficulty",
                    value: raw.to_string(),
                },
            ),
            FieldKind::SessionType => trimmed
                .parse::<SessionType>()
                .map(Self::SessionType)
                .map_err(|_| CoercionError::UnknownVariant {
                    kind: "session type",
                    value: raw.to_string(),
                }),
            FieldKind::Status => trimmed.parse::<SessionStatus>().map(Self::Status).map_err(
                |_| CoercionError::UnknownVariant {
                    kind: "status",
                    value: raw.to_string(),
                },
            ),
        }
    }

    pub fn matches(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (
                Self::Text(_),
                FieldKind::Text | FieldKind::LongText | FieldKind::Date | FieldKind::Time
            ) | (Self::Count(_), FieldKind::Count)
                | (Self::Difficulty(_), FieldKind::Difficulty)
                | (Self::SessionType(_), FieldKind::SessionType)
                | (Self::Status(_), FieldKind::Status)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Count(_) => "number",
            Self::Difficulty(_) => "difficulty",
            Self::SessionType(_) => "session type",
            Self::Status(_) => "status",
        }
    }

    /// Encode for a request body. Enum values use their wire tokens.
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Count(count) => Value::from(*count),
            Self::Difficulty(difficulty) => Value::String(difficulty.to_string()),
            Self::SessionType(kind) => Value::String(kind.wire_form().to_string()),
            Self::Status(status) => Value::String(status.wire_form().to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Count(count) => write!(f, "{count}"),
            Self::Difficulty(difficulty) => write!(f, "{difficulty}"),
            Self::SessionType(kind) => write!(f, "{kind}"),
            Self::Status(status) => f.write_str(status.display_form()),
        }
    }
}
