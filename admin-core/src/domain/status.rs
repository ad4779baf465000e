use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of a session.
///
/// Every member has two spellings: the display form shown to users
/// ("In Progress") and the wire form the backend stores ("In_Progress").
/// `Display` renders the display form; `FromStr` accepts either.
/// Serde always uses the wire form, and deserializing an unknown wire value
/// yields [`SessionStatus::FALLBACK`] instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
pub enum SessionStatus {
    #[default]
    #[strum(to_string = "Planning")]
    Planning,
    #[strum(to_string = "In Progress", serialize = "In_Progress")]
    InProgress,
    #[strum(to_string = "Testing")]
    Testing,
    #[strum(to_string = "Completed")]
    Completed,
    #[strum(to_string = "On Hold", serialize = "On_Hold")]
    OnHold,
}

impl SessionStatus {
    /// Member used for wire values this client does not know.
    pub const FALLBACK: Self = Self::Planning;

    pub fn display_form(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::Testing => "Testing",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    pub fn wire_form(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In_Progress",
            Self::Testing => "Testing",
            Self::Completed => "Completed",
            Self::OnHold => "On_Hold",
        }
    }

    /// Decode a backend token. Never fails.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "Planning" => Self::Planning,
            "In_Progress" => Self::InProgress,
            "Testing" => Self::Testing,
            "Completed" => Self::Completed,
            "On_Hold" => Self::OnHold,
            other => {
                tracing::debug!(value = other, "unknown session status, using fallback");
                Self::FALLBACK
            }
        }
    }

    /// Decode a user-facing label. Only exact display forms are accepted.
    pub fn from_display(raw: &str) -> Option<Self> {
        match raw {
            "Planning" => Some(Self::Planning),
            "In Progress" => Some(Self::InProgress),
            "Testing" => Some(Self::Testing),
            "Completed" => Some(Self::Completed),
            "On Hold" => Some(Self::OnHold),
            _ => None,
        }
    }
}

impl Serialize for SessionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_form())
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}
