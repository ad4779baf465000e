use std::sync::Arc;

use admin_client::ClientConfig;
use admin_core::{
    AdminProfile, AdvancedSettings, CommitOutcome, GroupEditController, NotificationSettings,
    Notifier, SaveOutcome, Session, SessionDetail, SessionField, SessionId, SettingsGroup,
    SettingsPage, SettingsTab, TeamSettings,
};
use anyhow::{anyhow, bail, Result};
use strum::IntoEnumIterator;

use crate::bootstrap::Backend;
use crate::cli::{Commands, SessionAction, SettingsAction};
use crate::console;

pub async fn run(command: Commands, backend: Backend) -> Result<()> {
    let notifier = console::notifier();
    match command {
        Commands::Session { id, action } => run_session(id, action, backend, notifier).await,
        Commands::Settings { action } => run_settings(action, backend, notifier).await,
        Commands::ConfigPath => config_path(),
    }
}

pub fn config_path() -> Result<()> {
    let path = ClientConfig::config_path()?;
    if !path.exists() {
        ClientConfig::default().save()?;
        eprintln!("Created default config");
    }
    println!("{}", path.display());
    Ok(())
}

async fn run_session(
    id: String,
    action: SessionAction,
    backend: Backend,
    notifier: Arc<dyn Notifier>,
) -> Result<()> {
    let mut detail =
        SessionDetail::load(backend.sessions, Some(SessionId::new(id)), notifier).await?;

    match action {
        SessionAction::Show => print_session(detail.session()),
        SessionAction::Set { field, value } => {
            match detail.edit(field, &value).await? {
                CommitOutcome::Saved { .. } => {
                    println!("{}: {}", field.label(), detail.editor().displayed(field));
                }
                CommitOutcome::Failed { error, .. } => {
                    bail!("{} was not saved: {error}", field.label())
                }
            }
        }
    }
    Ok(())
}

async fn run_settings(
    action: SettingsAction,
    backend: Backend,
    notifier: Arc<dyn Notifier>,
) -> Result<()> {
    match action {
        SettingsAction::Show { tab } => {
            let page = SettingsPage::load(
                backend.settings,
                SettingsTab::from_query(tab.as_deref()),
                notifier,
            )
            .await;
            print_tab(&page);
        }
        SettingsAction::Set { tab, field, value } => {
            let mut page = SettingsPage::load(backend.settings, tab, notifier).await;
            let outcome = match tab {
                SettingsTab::Profile => {
                    stage(page.profile_mut(), &field, &value)?;
                    page.save_profile().await?
                }
                SettingsTab::Team => {
                    stage(page.team_mut(), &field, &value)?;
                    page.save_team().await?
                }
                SettingsTab::Notifications => {
                    stage(page.notifications_mut(), &field, &value)?;
                    page.save_notifications().await?
                }
                SettingsTab::Advanced => {
                    stage(page.advanced_mut(), &field, &value)?;
                    page.save_advanced().await?
                }
                SettingsTab::Api => bail!("API keys are added with `settings create-api-key`"),
            };
            if let SaveOutcome::Failed { error, .. } = outcome {
                bail!("{tab} settings were not saved: {error}");
            }
            print_tab(&page);
        }
        SettingsAction::CreateApiKey { name, key } => {
            let mut page = SettingsPage::load(backend.settings, SettingsTab::Api, notifier).await;
            let today = time::OffsetDateTime::now_utc().date();
            let keys = page.api_keys_mut();
            keys.open_create(today);
            let form = keys.form_mut()?;
            form.name = name;
            form.key = key;
            keys.save_modal(today)?;
            print_tab(&page);
        }
    }
    Ok(())
}

/// Begin an edit and apply one raw value. Bad input cancels the edit.
fn stage<G: SettingsGroup>(
    controller: &mut GroupEditController<G>,
    field: &str,
    value: &str,
) -> Result<()> {
    let field: G::Field = field
        .parse()
        .map_err(|_| anyhow!("unknown {} field `{field}`", G::NOUN))?;
    controller.begin_edit()?;
    if let Err(error) = controller.set_field_input(field, value) {
        controller.cancel()?;
        return Err(error.into());
    }
    Ok(())
}

fn print_session(session: &Session) {
    println!("{} [{}]", session.title, session.id);
    for field in SessionField::iter() {
        println!("  {:<16} {}", field.label(), session.value(field));
    }
}

fn print_tab(page: &SettingsPage) {
    match page.tab() {
        SettingsTab::Profile => print_group::<AdminProfile>(page.profile()),
        SettingsTab::Team => print_group::<TeamSettings>(page.team()),
        SettingsTab::Notifications => print_group::<NotificationSettings>(page.notifications()),
        SettingsTab::Advanced => print_group::<AdvancedSettings>(page.advanced()),
        SettingsTab::Api => {
            for key in page.api_keys().keys() {
                println!(
                    "  {:<4} {:<20} {}  created {}  last used {}",
                    key.id, key.name, key.key, key.created, key.last_used
                );
            }
        }
    }
}

fn print_group<G>(controller: &GroupEditController<G>)
where
    G: SettingsGroup,
    G::Field: IntoEnumIterator,
{
    match controller.id() {
        Some(id) => println!("{} [{id}]", G::NOUN),
        None => println!("{} (not saved yet)", G::NOUN),
    }
    for field in <G::Field as IntoEnumIterator>::iter() {
        println!("  {:<28} {}", field.to_string(), controller.value(field));
    }
}
