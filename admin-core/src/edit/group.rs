use std::sync::Arc;

use super::mode::{CancelOutcome, EditMode, InFlight, Ticket, TicketSeq};
use crate::domain::ports::outbound::{Notifier, SettingsClient};
use crate::domain::{ApiError, EditError, Notification, SettingValue, SettingsGroup, SettingsId};

/// A save accepted by the group controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest<G> {
    /// No identity is known yet; the backend assigns one.
    Create { ticket: Ticket, group: G },
    Update {
        ticket: Ticket,
        id: SettingsId,
        group: G,
    },
}

impl<G> SaveRequest<G> {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Create { ticket, .. } | Self::Update { ticket, .. } => *ticket,
        }
    }

    pub fn group(&self) -> &G {
        match self {
            Self::Create { group, .. } | Self::Update { group, .. } => group,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { created: bool, cancelled: bool },
    Failed { error: ApiError, cancelled: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupEvent<G: SettingsGroup> {
    BeginEdit,
    SetField(G::Field, SettingValue),
    SaveRequested,
    SaveSucceeded(Ticket, G),
    SaveFailed(Ticket, ApiError),
    CancelRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupTransition<G> {
    Editing,
    SaveRequested(SaveRequest<G>),
    Resolved(SaveOutcome),
    Cancelled(CancelOutcome),
}

/// Whole-group edit state for one settings object.
///
/// The group is edited as a unit: `begin_edit` snapshots the current value,
/// `cancel` restores it, and `save` sends the full draft. The first
/// successful create fixes the group's identity for every later save.
pub struct GroupEditController<G: SettingsGroup> {
    mode: EditMode,
    draft: G,
    committed: G,
    id: Option<SettingsId>,
    in_flight: Option<InFlight>,
    pending_create: bool,
    tickets: TicketSeq,
    notifier: Arc<dyn Notifier>,
}

impl<G: SettingsGroup> GroupEditController<G> {
    pub fn new(initial: G, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            mode: EditMode::Viewing,
            id: initial.id().cloned(),
            draft: initial.clone(),
            committed: initial,
            in_flight: None,
            pending_create: false,
            tickets: TicketSeq::default(),
            notifier,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The value being edited. Equal to `committed` while viewing.
    pub fn draft(&self) -> &G {
        &self.draft
    }

    pub fn committed(&self) -> &G {
        &self.committed
    }

    pub fn id(&self) -> Option<&SettingsId> {
        self.id.as_ref()
    }

    pub fn value(&self, field: G::Field) -> SettingValue {
        self.draft.value(field)
    }

    pub fn is_cancel_pending(&self) -> bool {
        self.in_flight.is_some_and(|flight| flight.cancel_requested)
    }

    pub fn handle(&mut self, event: GroupEvent<G>) -> Result<GroupTransition<G>, EditError> {
        match event {
            GroupEvent::BeginEdit => {
                self.begin_edit()?;
                Ok(GroupTransition::Editing)
            }
            GroupEvent::SetField(field, value) => {
                self.set_field(field, value)?;
                Ok(GroupTransition::Editing)
            }
            GroupEvent::SaveRequested => self.save().map(GroupTransition::SaveRequested),
            GroupEvent::SaveSucceeded(ticket, group) => self
                .resolve_save(ticket, Ok(group))
                .map(GroupTransition::Resolved),
            GroupEvent::SaveFailed(ticket, error) => self
                .resolve_save(ticket, Err(error))
                .map(GroupTransition::Resolved),
            GroupEvent::CancelRequested => self.cancel().map(GroupTransition::Cancelled),
        }
    }

    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        self.require(EditMode::Viewing, "Viewing")?;
        self.committed = self.draft.clone();
        self.mode = EditMode::Editing;
        tracing::debug!(group = G::NOUN, "begin edit");
        Ok(())
    }

    pub fn set_field(&mut self, field: G::Field, value: SettingValue) -> Result<(), EditError> {
        self.require(EditMode::Editing, "Editing")?;
        self.draft.set_value(field, value)
    }

    /// Coerce raw input to the field's current type and apply it.
    pub fn set_field_input(&mut self, field: G::Field, raw: &str) -> Result<(), EditError> {
        self.require(EditMode::Editing, "Editing")?;
        let value = self.draft.value(field).coerce_like(raw)?;
        self.draft.set_value(field, value)
    }

    pub fn cancel(&mut self) -> Result<CancelOutcome, EditError> {
        match self.mode {
            EditMode::Viewing => Err(EditError::invalid_state(
                G::NOUN,
                "Editing or Saving",
                EditMode::Viewing,
            )),
            EditMode::Editing => {
                self.draft = self.committed.clone();
                self.mode = EditMode::Viewing;
                tracing::debug!(group = G::NOUN, "edit cancelled");
                Ok(CancelOutcome::Reverted)
            }
            EditMode::Saving => {
                if let Some(flight) = self.in_flight.as_mut() {
                    flight.cancel_requested = true;
                }
                tracing::debug!(group = G::NOUN, "cancel deferred until save resolves");
                Ok(CancelOutcome::Deferred)
            }
        }
    }

    /// Move to `Saving` and build a create or update request for the draft.
    pub fn save(&mut self) -> Result<SaveRequest<G>, EditError> {
        self.require(EditMode::Editing, "Editing")?;

        let ticket = self.tickets.next();
        self.mode = EditMode::Saving;
        self.in_flight = Some(InFlight::new(ticket));

        let group = self.draft.clone();
        let request = match self.id.clone() {
            Some(id) => {
                self.pending_create = false;
                SaveRequest::Update { ticket, id, group }
            }
            None => {
                self.pending_create = true;
                SaveRequest::Create { ticket, group }
            }
        };
        tracing::debug!(group = G::NOUN, %ticket, create = self.pending_create, "save requested");
        Ok(request)
    }

    /// Apply the result of the save started by `ticket`.
    pub fn resolve_save(
        &mut self,
        ticket: Ticket,
        result: Result<G, ApiError>,
    ) -> Result<SaveOutcome, EditError> {
        let flight = match self.in_flight {
            Some(flight) if flight.ticket == ticket => flight,
            _ => return Err(EditError::StaleTicket(ticket)),
        };
        self.in_flight = None;
        let cancelled = flight.cancel_requested;
        let created = std::mem::take(&mut self.pending_create);

        match result {
            Ok(mut saved) => {
                match (saved.id().cloned(), &self.id) {
                    (Some(id), _) => self.id = Some(id),
                    (None, Some(known)) => saved.set_id(known.clone()),
                    (None, None) => {
                        tracing::warn!(group = G::NOUN, "create response carried no id")
                    }
                }
                self.committed = saved.clone();
                self.draft = saved;
                self.mode = EditMode::Viewing;
                tracing::info!(group = G::NOUN, %ticket, created, cancelled, "group saved");
                self.notifier
                    .notify(Notification::success(G::SAVED_TITLE, G::SAVED_MESSAGE));
                Ok(SaveOutcome::Saved { created, cancelled })
            }
            Err(error) => {
                if cancelled {
                    self.draft = self.committed.clone();
                    self.mode = EditMode::Viewing;
                } else {
                    self.mode = EditMode::Editing;
                }
                tracing::warn!(group = G::NOUN, %ticket, %error, cancelled, "failed to save group");
                self.notifier.notify(Notification::failure(format!(
                    "Failed to save {}. Please try again.",
                    G::NOUN
                )));
                Ok(SaveOutcome::Failed { error, cancelled })
            }
        }
    }

    /// Save through `client` and resolve with its answer.
    pub async fn save_with<C>(&mut self, client: &C) -> Result<SaveOutcome, EditError>
    where
        C: SettingsClient<G> + ?Sized,
    {
        let request = self.save()?;
        let result = match &request {
            SaveRequest::Create { group, .. } => client.create_settings(group).await,
            SaveRequest::Update { id, group, .. } => client.update_settings(id, group).await,
        };
        self.resolve_save(request.ticket(), result)
    }

    fn require(&self, expected: EditMode, label: &'static str) -> Result<(), EditError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(EditError::invalid_state(G::NOUN, label, self.mode))
        }
    }
}
