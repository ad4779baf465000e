use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use strum::{Display, EnumIter, EnumString};

use super::SettingsId;
use crate::domain::{CoercionError, EditError};

/// A settings object that is edited and saved as one unit.
pub trait SettingsGroup: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    type Field: Copy + Eq + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static;

    /// Notification title after a successful save.
    const SAVED_TITLE: &'static str;
    /// Notification body after a successful save.
    const SAVED_MESSAGE: &'static str;
    /// Lower-case name used in failure messages.
    const NOUN: &'static str;

    fn id(&self) -> Option<&SettingsId>;
    fn set_id(&mut self, id: SettingsId);
    fn value(&self, field: Self::Field) -> SettingValue;
    fn set_value(&mut self, field: Self::Field, value: SettingValue) -> Result<(), EditError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Flag(bool),
    Number(u32),
    Text(String),
}

impl SettingValue {
    /// Coerce `raw` into the same variant as `self`.
    pub fn coerce_like(&self, raw: &str) -> Result<SettingValue, CoercionError> {
        let trimmed = raw.trim();
        match self {
            Self::Flag(_) => match trimmed {
                "true" | "on" | "yes" => Ok(Self::Flag(true)),
                "false" | "off" | "no" => Ok(Self::Flag(false)),
                _ => Err(CoercionError::InvalidFlag(raw.to_string())),
            },
            Self::Number(_) => trimmed
                .parse()
                .map(Self::Number)
                .map_err(|_| CoercionError::InvalidNumber(raw.to_string())),
            Self::Text(_) => Ok(Self::Text(raw.to_string())),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{}", if *flag { "on" } else { "off" }),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

fn mismatch(field: impl fmt::Display, value: &SettingValue) -> EditError {
    EditError::TypeMismatch {
        field: field.to_string(),
        found: value.type_name(),
    }
}

// ============================================================================
// Admin profile
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SettingsId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Department,
    Company,
    Bio,
}

impl SettingsGroup for AdminProfile {
    type Field = ProfileField;

    const SAVED_TITLE: &'static str = "Profile Updated";
    const SAVED_MESSAGE: &'static str =
        "Your profile settings have been saved and are now reflected throughout the application.";
    const NOUN: &'static str = "profile";

    fn id(&self) -> Option<&SettingsId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: SettingsId) {
        self.id = Some(id);
    }

    fn value(&self, field: ProfileField) -> SettingValue {
        let text = match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Department => &self.department,
            ProfileField::Company => &self.company,
            ProfileField::Bio => &self.bio,
        };
        SettingValue::Text(text.clone())
    }

    fn set_value(&mut self, field: ProfileField, value: SettingValue) -> Result<(), EditError> {
        let SettingValue::Text(text) = value else {
            return Err(mismatch(field, &value));
        };
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Department => &mut self.department,
            ProfileField::Company => &mut self.company,
            ProfileField::Bio => &mut self.bio,
        };
        *slot = text;
        Ok(())
    }
}

// ============================================================================
// Team settings
// ============================================================================

/// Team management settings. The backend stores the numeric fields as
/// strings, so they are sent as strings and accepted as either.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SettingsId>,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub max_sessions_per_day: u32,
    pub auto_approve_registrations: bool,
    pub require_manager_approval: bool,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub session_reminder_hours: u32,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            id: None,
            max_sessions_per_day: 10,
            auto_approve_registrations: true,
            require_manager_approval: false,
            session_reminder_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum TeamField {
    MaxSessionsPerDay,
    AutoApproveRegistrations,
    RequireManagerApproval,
    SessionReminderHours,
}

impl SettingsGroup for TeamSettings {
    type Field = TeamField;

    const SAVED_TITLE: &'static str = "Team Settings Saved";
    const SAVED_MESSAGE: &'static str = "Team management settings have been updated successfully.";
    const NOUN: &'static str = "team settings";

    fn id(&self) -> Option<&SettingsId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: SettingsId) {
        self.id = Some(id);
    }

    fn value(&self, field: TeamField) -> SettingValue {
        match field {
            TeamField::MaxSessionsPerDay => SettingValue::Number(self.max_sessions_per_day),
            TeamField::AutoApproveRegistrations => {
                SettingValue::Flag(self.auto_approve_registrations)
            }
            TeamField::RequireManagerApproval => SettingValue::Flag(self.require_manager_approval),
            TeamField::SessionReminderHours => SettingValue::Number(self.session_reminder_hours),
        }
    }

    fn set_value(&mut self, field: TeamField, value: SettingValue) -> Result<(), EditError> {
        match (field, value) {
            (TeamField::MaxSessionsPerDay, SettingValue::Number(n)) => {
                self.max_sessions_per_day = n
            }
            (TeamField::SessionReminderHours, SettingValue::Number(n)) => {
                self.session_reminder_hours = n
            }
            (TeamField::AutoApproveRegistrations, SettingValue::Flag(flag)) => {
                self.auto_approve_registrations = flag
            }
            (TeamField::RequireManagerApproval, SettingValue::Flag(flag)) => {
                self.require_manager_approval = flag
            }
            (field, value) => return Err(mismatch(field, &value)),
        }
        Ok(())
    }
}

// ============================================================================
// Notification preferences
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SettingsId>,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub session_reminders: bool,
    pub weekly_reports: bool,
    pub marketing_emails: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            id: None,
            email_notifications: true,
            push_notifications: true,
            session_reminders: true,
            weekly_reports: false,
            marketing_emails: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum NotificationField {
    EmailNotifications,
    PushNotifications,
    SessionReminders,
    WeeklyReports,
    MarketingEmails,
}

impl NotificationSettings {
    fn flag_mut(&mut self, field: NotificationField) -> &mut bool {
        match field {
            NotificationField::EmailNotifications => &mut self.email_notifications,
            NotificationField::PushNotifications => &mut self.push_notifications,
            NotificationField::SessionReminders => &mut self.session_reminders,
            NotificationField::WeeklyReports => &mut self.weekly_reports,
            NotificationField::MarketingEmails => &mut self.marketing_emails,
        }
    }
}

impl SettingsGroup for NotificationSettings {
    type Field = NotificationField;

    const SAVED_TITLE: &'static str = "Notification Settings Saved";
    const SAVED_MESSAGE: &'static str = "Your notification preferences have been updated.";
    const NOUN: &'static str = "notification settings";

    fn id(&self) -> Option<&SettingsId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: SettingsId) {
        self.id = Some(id);
    }

    fn value(&self, field: NotificationField) -> SettingValue {
        let flag = match field {
            NotificationField::EmailNotifications => self.email_notifications,
            NotificationField::PushNotifications => self.push_notifications,
            NotificationField::SessionReminders => self.session_reminders,
            NotificationField::WeeklyReports => self.weekly_reports,
            NotificationField::MarketingEmails => self.marketing_emails,
        };
        SettingValue::Flag(flag)
    }

    fn set_value(
        &mut self,
        field: NotificationField,
        value: SettingValue,
    ) -> Result<(), EditError> {
        let SettingValue::Flag(flag) = value else {
            return Err(mismatch(field, &value));
        };
        *self.flag_mut(field) = flag;
        Ok(())
    }
}

// ============================================================================
// Advanced (system) settings
// ============================================================================

/// System settings. There is no backend resource for these; they are kept
/// by a local store for the lifetime of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SettingsId>,
    /// Minutes.
    pub session_timeout: u32,
    /// Megabytes.
    pub max_file_size: u32,
    pub enable_debug_mode: bool,
    pub auto_backup: bool,
    pub maintenance_mode: bool,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            id: None,
            session_timeout: 30,
            max_file_size: 10,
            enable_debug_mode: false,
            auto_backup: true,
            maintenance_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum AdvancedField {
    SessionTimeout,
    MaxFileSize,
    EnableDebugMode,
    AutoBackup,
    MaintenanceMode,
}

impl SettingsGroup for AdvancedSettings {
    type Field = AdvancedField;

    const SAVED_TITLE: &'static str = "Advanced Settings Saved";
    const SAVED_MESSAGE: &'static str = "System settings have been updated successfully.";
    const NOUN: &'static str = "advanced settings";

    fn id(&self) -> Option<&SettingsId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: SettingsId) {
        self.id = Some(id);
    }

    fn value(&self, field: AdvancedField) -> SettingValue {
        match field {
            AdvancedField::SessionTimeout => SettingValue::Number(self.session_timeout),
            AdvancedField::MaxFileSize => SettingValue::Number(self.max_file_size),
            AdvancedField::EnableDebugMode => SettingValue::Flag(self.enable_debug_mode),
            AdvancedField::AutoBackup => SettingValue::Flag(self.auto_backup),
            AdvancedField::MaintenanceMode => SettingValue::Flag(self.maintenance_mode),
        }
    }

    fn set_value(&mut self, field: AdvancedField, value: SettingValue) -> Result<(), EditError> {
        match (field, value) {
            (AdvancedField::SessionTimeout, SettingValue::Number(n)) => self.session_timeout = n,
            (AdvancedField::MaxFileSize, SettingValue::Number(n)) => self.max_file_size = n,
            (AdvancedField::EnableDebugMode, SettingValue::Flag(f)) => self.enable_debug_mode = f,
            (AdvancedField::AutoBackup, SettingValue::Flag(f)) => self.auto_backup = f,
            (AdvancedField::MaintenanceMode, SettingValue::Flag(f)) => self.maintenance_mode = f,
            (field, value) => return Err(mismatch(field, &value)),
        }
        Ok(())
    }
}
