use std::sync::Arc;

use strum::{Display, EnumIter, EnumString};

use super::ApiKeyRegistry;
use crate::adapters::MemorySettingsClient;
use crate::domain::ports::outbound::{Notifier, ProfileSettings, ProfileStore, SettingsClient};
use crate::domain::{
    AdminProfile, AdvancedSettings, EditError, NotificationSettings, SettingsGroup, TeamSettings,
};
use crate::edit::{GroupEditController, SaveOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SettingsTab {
    #[default]
    Profile,
    Team,
    Notifications,
    Api,
    Advanced,
}

impl SettingsTab {
    /// Parse the `tab` query value. Missing or unknown values select `Profile`.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

/// Backends for each settings group.
#[derive(Clone)]
pub struct SettingsBackends {
    pub profile: Arc<dyn ProfileStore>,
    pub team: Arc<dyn SettingsClient<TeamSettings>>,
    pub notifications: Arc<dyn SettingsClient<NotificationSettings>>,
    pub advanced: Arc<dyn SettingsClient<AdvancedSettings>>,
}

impl SettingsBackends {
    /// Remote profile, team and notification backends. Advanced settings
    /// have no remote resource and are kept in memory.
    pub fn with_local_advanced(
        profile: Arc<dyn ProfileStore>,
        team: Arc<dyn SettingsClient<TeamSettings>>,
        notifications: Arc<dyn SettingsClient<NotificationSettings>>,
    ) -> Self {
        Self {
            profile,
            team,
            notifications,
            advanced: Arc::new(MemorySettingsClient::<AdvancedSettings>::new()),
        }
    }
}

/// The settings page: one group controller per tab plus the API key list.
pub struct SettingsPage {
    tab: SettingsTab,
    profile: GroupEditController<AdminProfile>,
    team: GroupEditController<TeamSettings>,
    notifications: GroupEditController<NotificationSettings>,
    advanced: GroupEditController<AdvancedSettings>,
    api_keys: ApiKeyRegistry,
    profile_backend: ProfileSettings,
    backends: SettingsBackends,
}

impl SettingsPage {
    /// Load every group. Load failures are logged and leave the defaults
    /// in place; the page itself always opens.
    pub async fn load(
        backends: SettingsBackends,
        tab: SettingsTab,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let profile_backend = ProfileSettings::new(Arc::clone(&backends.profile));

        let profile: AdminProfile = first_or_default(&profile_backend).await;
        let team: TeamSettings = first_or_default(backends.team.as_ref()).await;
        let notifications: NotificationSettings =
            first_or_default(backends.notifications.as_ref()).await;
        let advanced: AdvancedSettings = first_or_default(backends.advanced.as_ref()).await;

        Self {
            tab,
            profile: GroupEditController::new(profile, Arc::clone(&notifier)),
            team: GroupEditController::new(team, Arc::clone(&notifier)),
            notifications: GroupEditController::new(notifications, Arc::clone(&notifier)),
            advanced: GroupEditController::new(advanced, notifier),
            api_keys: ApiKeyRegistry::with_samples(),
            profile_backend,
            backends,
        }
    }

    pub fn tab(&self) -> SettingsTab {
        self.tab
    }

    pub fn profile(&self) -> &GroupEditController<AdminProfile> {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut GroupEditController<AdminProfile> {
        &mut self.profile
    }

    pub fn team(&self) -> &GroupEditController<TeamSettings> {
        &self.team
    }

    pub fn team_mut(&mut self) -> &mut GroupEditController<TeamSettings> {
        &mut self.team
    }

    pub fn notifications(&self) -> &GroupEditController<NotificationSettings> {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut GroupEditController<NotificationSettings> {
        &mut self.notifications
    }

    pub fn advanced(&self) -> &GroupEditController<AdvancedSettings> {
        &self.advanced
    }

    pub fn advanced_mut(&mut self) -> &mut GroupEditController<AdvancedSettings> {
        &mut self.advanced
    }

    pub fn api_keys(&self) -> &ApiKeyRegistry {
        &self.api_keys
    }

    pub fn api_keys_mut(&mut self) -> &mut ApiKeyRegistry {
        &mut self.api_keys
    }

    pub async fn save_profile(&mut self) -> Result<SaveOutcome, EditError> {
        self.profile.save_with(&self.profile_backend).await
    }

    pub async fn save_team(&mut self) -> Result<SaveOutcome, EditError> {
        self.team.save_with(self.backends.team.as_ref()).await
    }

    pub async fn save_notifications(&mut self) -> Result<SaveOutcome, EditError> {
        self.notifications
            .save_with(self.backends.notifications.as_ref())
            .await
    }

    pub async fn save_advanced(&mut self) -> Result<SaveOutcome, EditError> {
        self.advanced
            .save_with(self.backends.advanced.as_ref())
            .await
    }
}

/// The first element of the collection, or the built-in defaults.
async fn first_or_default<G, C>(client: &C) -> G
where
    G: SettingsGroup + Default,
    C: SettingsClient<G> + ?Sized,
{
    match client.list_settings().await {
        Ok(groups) => {
            let found = groups.len();
            let first = groups.into_iter().next();
            tracing::debug!(group = G::NOUN, found, "settings loaded");
            first.unwrap_or_default()
        }
        Err(error) => {
            tracing::warn!(group = G::NOUN, %error, "failed to load settings, using defaults");
            G::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryProfileStore, RecordingNotifier};
    use crate::domain::{ApiError, NotificationField, SettingValue, SettingsId, TeamField};
    use crate::edit::EditMode;

    struct Fixture {
        team: MemorySettingsClient<TeamSettings>,
        notifications: MemorySettingsClient<NotificationSettings>,
        profile: MemoryProfileStore,
        notifier: RecordingNotifier,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                team: MemorySettingsClient::new(),
                notifications: MemorySettingsClient::new(),
                profile: MemoryProfileStore::new(AdminProfile {
                    name: "Grace".into(),
                    email: "grace@example.com".into(),
                    ..AdminProfile::default()
                }),
                notifier: RecordingNotifier::new(),
            }
        }

        async fn page(&self, tab: SettingsTab) -> SettingsPage {
            let backends = SettingsBackends::with_local_advanced(
                Arc::new(self.profile.clone()),
                Arc::new(self.team.clone()),
                Arc::new(self.notifications.clone()),
            );
            SettingsPage::load(backends, tab, Arc::new(self.notifier.clone())).await
        }
    }

    #[test]
    fn tab_query_parsing() {
        assert_eq!(SettingsTab::from_query(Some("team")), SettingsTab::Team);
        assert_eq!(SettingsTab::from_query(Some("api")), SettingsTab::Api);
        assert_eq!(SettingsTab::from_query(Some("billing")), SettingsTab::Profile);
        assert_eq!(SettingsTab::from_query(None), SettingsTab::Profile);
        assert_eq!(SettingsTab::Notifications.to_string(), "notifications");
    }

    #[tokio::test]
    async fn empty_collections_keep_defaults_in_create_mode() {
        let fixture = Fixture::new();
        let page = fixture.page(SettingsTab::Team).await;

        assert_eq!(page.tab(), SettingsTab::Team);
        assert_eq!(page.team().committed(), &TeamSettings::default());
        assert_eq!(page.team().id(), None);
        assert_eq!(page.notifications().committed(), &NotificationSettings::default());
        assert_eq!(page.profile().committed().name, "Grace");
        assert_eq!(page.api_keys().keys().len(), 2);
    }

    #[tokio::test]
    async fn first_stored_group_wins() {
        let fixture = Fixture::new();
        let stored = TeamSettings {
            id: Some(SettingsId::new("t1")),
            max_sessions_per_day: 6,
            ..TeamSettings::default()
        };
        let ignored = TeamSettings {
            id: Some(SettingsId::new("t2")),
            max_sessions_per_day: 99,
            ..TeamSettings::default()
        };
        let fixture = Fixture {
            team: fixture.team.with_groups(vec![stored.clone(), ignored]),
            ..fixture
        };

        let page = fixture.page(SettingsTab::Team).await;
        assert_eq!(page.team().committed(), &stored);
        assert_eq!(page.team().id(), Some(&SettingsId::new("t1")));
    }

    #[tokio::test]
    async fn load_failure_is_logged_not_notified() {
        let fixture = Fixture::new();
        fixture.notifications.fail_next(ApiError::transport("down"));
        fixture.profile.fail_next(ApiError::transport("down"));

        let page = fixture.page(SettingsTab::Notifications).await;
        assert_eq!(page.notifications().committed(), &NotificationSettings::default());
        assert_eq!(page.profile().committed(), &AdminProfile::default());
        assert!(fixture.notifier.is_empty());
    }

    #[tokio::test]
    async fn team_save_creates_then_updates() {
        let fixture = Fixture::new();
        let mut page = fixture.page(SettingsTab::Team).await;

        page.team_mut().begin_edit().unwrap();
        page.team_mut()
            .set_field(TeamField::RequireManagerApproval, SettingValue::Flag(true))
            .unwrap();
        let outcome = page.save_team().await.unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                created: true,
                cancelled: false
            }
        );

        page.team_mut().begin_edit().unwrap();
        page.team_mut()
            .set_field_input(TeamField::SessionReminderHours, "12")
            .unwrap();
        let outcome = page.save_team().await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { created: false, .. }));

        let stored = fixture.team.list_settings().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].require_manager_approval);
        assert_eq!(stored[0].session_reminder_hours, 12);

        let titles: Vec<_> = fixture
            .notifier
            .notifications()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Team Settings Saved", "Team Settings Saved"]);
    }

    #[tokio::test]
    async fn failed_notification_save_stays_editing() {
        let fixture = Fixture::new();
        let mut page = fixture.page(SettingsTab::Notifications).await;
        fixture
            .notifications
            .fail_next(ApiError::validation("weeklyReports not allowed"));

        page.notifications_mut().begin_edit().unwrap();
        page.notifications_mut()
            .set_field(NotificationField::WeeklyReports, SettingValue::Flag(true))
            .unwrap();
        let outcome = page.save_notifications().await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Failed { .. }));
        assert_eq!(page.notifications().mode(), EditMode::Editing);
        assert!(page.notifications().draft().weekly_reports);
        assert_eq!(fixture.notifier.failures().len(), 1);
    }

    #[tokio::test]
    async fn profile_save_goes_through_the_store() {
        let fixture = Fixture::new();
        let mut page = fixture.page(SettingsTab::Profile).await;

        page.profile_mut().begin_edit().unwrap();
        page.profile_mut()
            .set_field_input("department".parse().unwrap(), "Platform")
            .unwrap();
        page.save_profile().await.unwrap();

        assert_eq!(fixture.profile.profile().department, "Platform");
        assert_eq!(
            fixture.notifier.notifications()[0].title,
            AdminProfile::SAVED_TITLE
        );
    }

    #[tokio::test]
    async fn advanced_save_stays_local() {
        let fixture = Fixture::new();
        let mut page = fixture.page(SettingsTab::Advanced).await;

        page.advanced_mut().begin_edit().unwrap();
        page.advanced_mut()
            .set_field_input("maintenanceMode".parse().unwrap(), "true")
            .unwrap();
        page.save_advanced().await.unwrap();

        assert!(page.advanced().committed().maintenance_mode);
        assert!(page.advanced().id().is_some());
        assert!(fixture.team.list_settings().await.unwrap().is_empty());
    }
}
