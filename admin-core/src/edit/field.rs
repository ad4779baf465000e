use std::collections::BTreeMap;
use std::sync::Arc;

use super::mode::{CancelOutcome, EditMode, InFlight, Ticket, TicketSeq};
use crate::domain::ports::outbound::{Notifier, SessionClient};
use crate::domain::{
    ApiError, EditError, FieldValue, Notification, Session, SessionField, SessionId,
    SessionPatch, SessionRecord,
};

/// A commit accepted by the controller. The caller sends `patch` and
/// reports the result back with [`FieldEditController::resolve_commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRequest {
    pub ticket: Ticket,
    pub field: SessionField,
    pub session_id: SessionId,
    pub patch: SessionPatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The response was merged. `applied` lists every descriptor field it
    /// carried, which may be more than the one edited.
    Saved {
        field: SessionField,
        applied: Vec<SessionField>,
        cancelled: bool,
    },
    Failed {
        field: SessionField,
        error: ApiError,
        cancelled: bool,
    },
}

/// Inputs to the per-field state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    BeginEdit(SessionField),
    SetDraft(SessionField, FieldValue),
    CommitRequested(SessionField),
    CommitSucceeded(Ticket, SessionRecord),
    CommitFailed(Ticket, ApiError),
    CancelRequested(SessionField),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldTransition {
    Editing(SessionField),
    CommitRequested(CommitRequest),
    Resolved(CommitOutcome),
    Cancelled(SessionField, CancelOutcome),
}

#[derive(Debug, Clone, Default)]
struct FieldSlot {
    mode: EditMode,
    draft: Option<FieldValue>,
    in_flight: Option<InFlight>,
}

/// Per-field edit state for one session record.
///
/// Each field moves through `Viewing -> Editing -> Saving -> Viewing`
/// independently of the others. A failed save returns the field to
/// `Editing` with its draft intact. A cancel that arrives while a save is
/// in flight is held until the save resolves; a late success is still
/// merged so a write the server accepted is never hidden.
pub struct FieldEditController {
    record: Session,
    slots: BTreeMap<SessionField, FieldSlot>,
    tickets: TicketSeq,
    notifier: Arc<dyn Notifier>,
}

impl FieldEditController {
    pub fn new(record: Session, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            record,
            slots: BTreeMap::new(),
            tickets: TicketSeq::default(),
            notifier,
        }
    }

    /// The committed record.
    pub fn record(&self) -> &Session {
        &self.record
    }

    pub fn mode(&self, field: SessionField) -> EditMode {
        self.slots.get(&field).map(|slot| slot.mode).unwrap_or_default()
    }

    pub fn draft(&self, field: SessionField) -> Option<&FieldValue> {
        self.slots.get(&field).and_then(|slot| slot.draft.as_ref())
    }

    /// Value to render: the draft while editing, the committed value otherwise.
    pub fn displayed(&self, field: SessionField) -> FieldValue {
        self.draft(field)
            .cloned()
            .unwrap_or_else(|| self.record.value(field))
    }

    pub fn is_cancel_pending(&self, field: SessionField) -> bool {
        self.slots
            .get(&field)
            .and_then(|slot| slot.in_flight)
            .is_some_and(|flight| flight.cancel_requested)
    }

    pub fn handle(&mut self, event: FieldEvent) -> Result<FieldTransition, EditError> {
        match event {
            FieldEvent::BeginEdit(field) => {
                self.begin_edit(field)?;
                Ok(FieldTransition::Editing(field))
            }
            FieldEvent::SetDraft(field, value) => {
                self.set_draft(field, value)?;
                Ok(FieldTransition::Editing(field))
            }
            FieldEvent::CommitRequested(field) => {
                self.commit_edit(field).map(FieldTransition::CommitRequested)
            }
            FieldEvent::CommitSucceeded(ticket, record) => self
                .resolve_commit(ticket, Ok(record))
                .map(FieldTransition::Resolved),
            FieldEvent::CommitFailed(ticket, error) => self
                .resolve_commit(ticket, Err(error))
                .map(FieldTransition::Resolved),
            FieldEvent::CancelRequested(field) => {
                let outcome = self.cancel_edit(field)?;
                Ok(FieldTransition::Cancelled(field, outcome))
            }
        }
    }

    /// Start editing with the committed value as the draft.
    pub fn begin_edit(&mut self, field: SessionField) -> Result<(), EditError> {
        let seed = self.record.value(field);
        self.begin_edit_with(field, seed)
    }

    /// Start editing with a draft the caller already holds.
    pub fn begin_edit_with(
        &mut self,
        field: SessionField,
        draft: FieldValue,
    ) -> Result<(), EditError> {
        ensure_kind(field, &draft)?;
        let slot = self.slots.entry(field).or_default();
        if slot.mode != EditMode::Viewing {
            return Err(EditError::invalid_state(field, "Viewing", slot.mode));
        }
        slot.mode = EditMode::Editing;
        slot.draft = Some(draft);
        tracing::debug!(%field, "begin edit");
        Ok(())
    }

    pub fn set_draft(&mut self, field: SessionField, value: FieldValue) -> Result<(), EditError> {
        let slot = self.editing_slot(field)?;
        ensure_kind(field, &value)?;
        slot.draft = Some(value);
        Ok(())
    }

    /// Coerce raw input for `field` and store it as the draft.
    pub fn set_draft_input(&mut self, field: SessionField, raw: &str) -> Result<(), EditError> {
        self.editing_slot(field)?;
        let value = FieldValue::coerce(field.kind(), raw)?;
        self.set_draft(field, value)
    }

    pub fn cancel_edit(&mut self, field: SessionField) -> Result<CancelOutcome, EditError> {
        let Some(slot) = self.slots.get_mut(&field) else {
            return Err(EditError::invalid_state(
                field,
                "Editing or Saving",
                EditMode::Viewing,
            ));
        };
        match slot.mode {
            EditMode::Viewing => Err(EditError::invalid_state(
                field,
                "Editing or Saving",
                EditMode::Viewing,
            )),
            EditMode::Editing => {
                slot.mode = EditMode::Viewing;
                slot.draft = None;
                tracing::debug!(%field, "edit cancelled");
                Ok(CancelOutcome::Reverted)
            }
            EditMode::Saving => {
                if let Some(flight) = slot.in_flight.as_mut() {
                    flight.cancel_requested = true;
                }
                tracing::debug!(%field, "cancel deferred until save resolves");
                Ok(CancelOutcome::Deferred)
            }
        }
    }

    /// Move `field` to `Saving` and build its single-field payload.
    pub fn commit_edit(&mut self, field: SessionField) -> Result<CommitRequest, EditError> {
        let draft = self.editing_slot(field)?.draft.clone();
        let draft = draft.unwrap_or_else(|| self.record.value(field));

        let ticket = self.tickets.next();
        let slot = self.slots.entry(field).or_default();
        slot.mode = EditMode::Saving;
        slot.in_flight = Some(InFlight::new(ticket));

        let patch = SessionPatch::single(field, &draft);
        tracing::debug!(%field, %ticket, "commit requested");
        Ok(CommitRequest {
            ticket,
            field,
            session_id: self.record.id.clone(),
            patch,
        })
    }

    /// Apply the result of the update started by `ticket`.
    ///
    /// Exactly one notification is raised per resolution.
    pub fn resolve_commit(
        &mut self,
        ticket: Ticket,
        result: Result<SessionRecord, ApiError>,
    ) -> Result<CommitOutcome, EditError> {
        let (field, slot) = self
            .slots
            .iter_mut()
            .find(|(_, slot)| slot.in_flight.map(|flight| flight.ticket) == Some(ticket))
            .ok_or(EditError::StaleTicket(ticket))?;
        let field = *field;
        let cancelled = slot
            .in_flight
            .take()
            .is_some_and(|flight| flight.cancel_requested);

        match result {
            Ok(record) => {
                slot.mode = EditMode::Viewing;
                slot.draft = None;
                let applied = self.record.merge(record);
                tracing::info!(%field, %ticket, cancelled, "field saved");
                self.notifier.notify(Notification::success(
                    "Session Updated",
                    format!("{} has been updated successfully.", field.label()),
                ));
                Ok(CommitOutcome::Saved {
                    field,
                    applied,
                    cancelled,
                })
            }
            Err(error) => {
                if cancelled {
                    slot.mode = EditMode::Viewing;
                    slot.draft = None;
                } else {
                    slot.mode = EditMode::Editing;
                }
                tracing::warn!(%field, %ticket, %error, cancelled, "failed to save field");
                self.notifier.notify(Notification::failure(format!(
                    "Failed to update {}. Please try again.",
                    field.label().to_lowercase()
                )));
                Ok(CommitOutcome::Failed {
                    field,
                    error,
                    cancelled,
                })
            }
        }
    }

    /// Commit `field` through `client` and resolve with its answer.
    pub async fn commit<C>(
        &mut self,
        field: SessionField,
        client: &C,
    ) -> Result<CommitOutcome, EditError>
    where
        C: SessionClient + ?Sized,
    {
        let request = self.commit_edit(field)?;
        let result = client
            .update_session(&request.session_id, &request.patch)
            .await;
        self.resolve_commit(request.ticket, result)
    }

    fn editing_slot(&mut self, field: SessionField) -> Result<&mut FieldSlot, EditError> {
        let slot = self.slots.entry(field).or_default();
        if slot.mode != EditMode::Editing {
            return Err(EditError::invalid_state(field, "Editing", slot.mode));
        }
        Ok(slot)
    }
}

fn ensure_kind(field: SessionField, value: &FieldValue) -> Result<(), EditError> {
    if value.matches(field.kind()) {
        Ok(())
    } else {
        Err(EditError::TypeMismatch {
            field: field.to_string(),
            found: value.type_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySessionClient, RecordingNotifier};
    use crate::domain::SessionStatus;
    use async_trait::async_trait;
    use serde_json::json;

    fn record(value: serde_json::Value) -> SessionRecord {
        serde_json::from_value(value).unwrap()
    }

    fn session() -> Session {
        Session::from_record(
            SessionId::new("s1"),
            record(json!({
                "id": "s1",
                "title": "Rust Workshop",
                "technology": "Rust",
                "date": "2024-03-01",
                "time": "10:00",
                "location": "Room 4",
                "maxAttendees": 20,
                "difficulty": "Beginner",
                "type": "PROJECT_BASED",
                "currentStatus": "Planning",
                "description": "Intro session"
            })),
        )
    }

    fn controller() -> (FieldEditController, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let controller = FieldEditController::new(session(), Arc::new(notifier.clone()));
        (controller, notifier)
    }

    #[test]
    fn begin_then_cancel_leaves_record_untouched() {
        let (mut controller, notifier) = controller();
        let before = controller.record().clone();

        controller.begin_edit(SessionField::Location).unwrap();
        assert_eq!(controller.mode(SessionField::Location), EditMode::Editing);
        assert_eq!(
            controller.draft(SessionField::Location),
            Some(&FieldValue::Text("Room 4".into()))
        );

        let outcome = controller.cancel_edit(SessionField::Location).unwrap();
        assert_eq!(outcome, CancelOutcome::Reverted);
        assert_eq!(controller.mode(SessionField::Location), EditMode::Viewing);
        assert_eq!(controller.draft(SessionField::Location), None);
        assert_eq!(controller.record(), &before);
        assert!(notifier.is_empty());
    }

    #[test]
    fn cancel_while_viewing_is_rejected() {
        let (mut controller, _) = controller();
        let err = controller.cancel_edit(SessionField::Date).unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidState {
                actual: EditMode::Viewing,
                ..
            }
        ));
    }

    #[test]
    fn status_commit_sends_wire_form_and_displays_label() {
        let (mut controller, notifier) = controller();

        controller.begin_edit(SessionField::CurrentStatus).unwrap();
        controller
            .set_draft_input(SessionField::CurrentStatus, "In Progress")
            .unwrap();
        let request = controller.commit_edit(SessionField::CurrentStatus).unwrap();

        assert_eq!(request.session_id, SessionId::new("s1"));
        assert_eq!(
            serde_json::to_value(&request.patch).unwrap(),
            json!({ "currentStatus": "In_Progress" })
        );
        assert_eq!(controller.mode(SessionField::CurrentStatus), EditMode::Saving);

        let outcome = controller
            .resolve_commit(
                request.ticket,
                Ok(record(json!({ "currentStatus": "In_Progress" }))),
            )
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Saved { cancelled: false, .. }));
        assert_eq!(controller.mode(SessionField::CurrentStatus), EditMode::Viewing);
        assert_eq!(
            controller.record().current_status,
            SessionStatus::InProgress
        );
        assert_eq!(
            controller.displayed(SessionField::CurrentStatus).to_string(),
            "In Progress"
        );
        assert_eq!(notifier.len(), 1);
        assert!(!notifier.notifications()[0].is_failure());
    }

    #[test]
    fn failed_commit_keeps_draft_and_committed_value() {
        let (mut controller, notifier) = controller();

        controller.begin_edit(SessionField::Location).unwrap();
        controller
            .set_draft(SessionField::Location, FieldValue::Text("Room 9".into()))
            .unwrap();
        let request = controller.commit_edit(SessionField::Location).unwrap();

        let outcome = controller
            .resolve_commit(request.ticket, Err(ApiError::transport("timed out")))
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Failed { cancelled: false, .. }));
        assert_eq!(controller.mode(SessionField::Location), EditMode::Editing);
        assert_eq!(
            controller.draft(SessionField::Location),
            Some(&FieldValue::Text("Room 9".into()))
        );
        assert_eq!(controller.record().location, "Room 4");
        assert_eq!(notifier.len(), 1);
        assert!(notifier.notifications()[0].is_failure());

        // Retry is a plain second commit.
        let retry = controller.commit_edit(SessionField::Location).unwrap();
        assert_ne!(retry.ticket, request.ticket);
    }

    #[test]
    fn second_commit_while_saving_is_rejected() {
        let (mut controller, _) = controller();
        controller.begin_edit(SessionField::Technology).unwrap();
        controller.commit_edit(SessionField::Technology).unwrap();

        let err = controller.commit_edit(SessionField::Technology).unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidState {
                actual: EditMode::Saving,
                ..
            }
        ));
    }

    #[test]
    fn fields_do_not_block_each_other() {
        let (mut controller, _) = controller();

        controller.begin_edit(SessionField::Date).unwrap();
        controller
            .set_draft_input(SessionField::Date, "2024-04-15")
            .unwrap();
        let date_request = controller.commit_edit(SessionField::Date).unwrap();

        controller.begin_edit(SessionField::Technology).unwrap();
        controller
            .set_draft(SessionField::Technology, FieldValue::Text("Go".into()))
            .unwrap();
        assert_eq!(controller.mode(SessionField::Date), EditMode::Saving);

        let tech_request = controller.commit_edit(SessionField::Technology).unwrap();
        controller
            .resolve_commit(tech_request.ticket, Ok(record(json!({ "technology": "Go" }))))
            .unwrap();

        assert_eq!(controller.mode(SessionField::Technology), EditMode::Viewing);
        assert_eq!(controller.mode(SessionField::Date), EditMode::Saving);
        assert_eq!(
            controller.draft(SessionField::Date),
            Some(&FieldValue::Text("2024-04-15".into()))
        );

        controller
            .resolve_commit(date_request.ticket, Ok(record(json!({ "date": "2024-04-15" }))))
            .unwrap();
        assert_eq!(controller.record().technology, "Go");
        assert_eq!(controller.record().date, "2024-04-15");
    }

    #[test]
    fn merge_does_not_overwrite_other_drafts() {
        let (mut controller, _) = controller();

        controller.begin_edit(SessionField::Location).unwrap();
        controller
            .set_draft(SessionField::Location, FieldValue::Text("Room 12".into()))
            .unwrap();

        controller.begin_edit(SessionField::Time).unwrap();
        let request = controller.commit_edit(SessionField::Time).unwrap();
        controller
            .resolve_commit(
                request.ticket,
                Ok(record(json!({ "time": "10:00", "location": "Room 5" }))),
            )
            .unwrap();

        assert_eq!(controller.record().location, "Room 5");
        assert_eq!(
            controller.draft(SessionField::Location),
            Some(&FieldValue::Text("Room 12".into()))
        );
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let (mut controller, notifier) = controller();
        controller.begin_edit(SessionField::Location).unwrap();
        let request = controller.commit_edit(SessionField::Location).unwrap();
        controller
            .resolve_commit(request.ticket, Ok(SessionRecord::default()))
            .unwrap();

        let err = controller
            .resolve_commit(request.ticket, Ok(SessionRecord::default()))
            .unwrap_err();
        assert_eq!(err, EditError::StaleTicket(request.ticket));
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn cancel_during_save_still_merges_late_success() {
        let (mut controller, notifier) = controller();
        controller.begin_edit(SessionField::Location).unwrap();
        controller
            .set_draft(SessionField::Location, FieldValue::Text("Hall A".into()))
            .unwrap();
        let request = controller.commit_edit(SessionField::Location).unwrap();

        let outcome = controller.cancel_edit(SessionField::Location).unwrap();
        assert_eq!(outcome, CancelOutcome::Deferred);
        assert!(controller.is_cancel_pending(SessionField::Location));
        assert!(controller.begin_edit(SessionField::Location).is_err());

        let outcome = controller
            .resolve_commit(request.ticket, Ok(record(json!({ "location": "Hall A" }))))
            .unwrap();
        assert!(matches!(outcome, CommitOutcome::Saved { cancelled: true, .. }));
        assert_eq!(controller.record().location, "Hall A");
        assert_eq!(controller.mode(SessionField::Location), EditMode::Viewing);
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn cancel_during_save_then_failure_discards_draft() {
        let (mut controller, notifier) = controller();
        controller.begin_edit(SessionField::Location).unwrap();
        controller
            .set_draft(SessionField::Location, FieldValue::Text("Hall A".into()))
            .unwrap();
        let request = controller.commit_edit(SessionField::Location).unwrap();
        controller.cancel_edit(SessionField::Location).unwrap();

        controller
            .resolve_commit(request.ticket, Err(ApiError::validation("bad location")))
            .unwrap();

        assert_eq!(controller.mode(SessionField::Location), EditMode::Viewing);
        assert_eq!(controller.draft(SessionField::Location), None);
        assert_eq!(controller.record().location, "Room 4");
        assert_eq!(notifier.failures().len(), 1);
    }

    #[test]
    fn set_draft_rejects_wrong_kind_and_bad_input() {
        let (mut controller, _) = controller();
        controller.begin_edit(SessionField::MaxAttendees).unwrap();

        let err = controller
            .set_draft(SessionField::MaxAttendees, FieldValue::Text("lots".into()))
            .unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));

        let err = controller
            .set_draft_input(SessionField::MaxAttendees, "lots")
            .unwrap_err();
        assert!(matches!(err, EditError::Coercion(_)));
        assert_eq!(
            controller.draft(SessionField::MaxAttendees),
            Some(&FieldValue::Count(20))
        );
    }

    #[test]
    fn set_draft_requires_editing() {
        let (mut controller, _) = controller();
        let err = controller
            .set_draft(SessionField::Technology, FieldValue::Text("Zig".into()))
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidState { .. }));
    }

    #[test]
    fn events_drive_the_same_transitions() {
        let (mut controller, _) = controller();

        controller
            .handle(FieldEvent::BeginEdit(SessionField::Difficulty))
            .unwrap();
        controller
            .handle(FieldEvent::SetDraft(
                SessionField::Difficulty,
                FieldValue::coerce(SessionField::Difficulty.kind(), "Advanced").unwrap(),
            ))
            .unwrap();
        let FieldTransition::CommitRequested(request) = controller
            .handle(FieldEvent::CommitRequested(SessionField::Difficulty))
            .unwrap()
        else {
            panic!("expected a commit request");
        };

        let transition = controller
            .handle(FieldEvent::CommitFailed(
                request.ticket,
                ApiError::transport("offline"),
            ))
            .unwrap();
        assert!(matches!(
            transition,
            FieldTransition::Resolved(CommitOutcome::Failed { .. })
        ));

        let transition = controller
            .handle(FieldEvent::CancelRequested(SessionField::Difficulty))
            .unwrap();
        assert_eq!(
            transition,
            FieldTransition::Cancelled(SessionField::Difficulty, CancelOutcome::Reverted)
        );
    }

    /// Answers every update with a server-computed field on top of the patch.
    struct DerivingClient;

    #[async_trait]
    impl SessionClient for DerivingClient {
        async fn get_session(&self, _id: &SessionId) -> Result<SessionRecord, ApiError> {
            Err(ApiError::NotFound)
        }

        async fn update_session(
            &self,
            _id: &SessionId,
            patch: &SessionPatch,
        ) -> Result<SessionRecord, ApiError> {
            let mut body = patch.as_map().clone();
            body.insert("currentStatus".into(), json!("Completed"));
            body.insert("updatedBy".into(), json!("admin"));
            serde_json::from_value(serde_json::Value::Object(body))
                .map_err(|e| ApiError::transport(e.to_string()))
        }
    }

    #[tokio::test]
    async fn commit_merges_derived_fields() {
        let (mut controller, _) = controller();
        controller.begin_edit(SessionField::MaxAttendees).unwrap();
        controller
            .set_draft(SessionField::MaxAttendees, FieldValue::Count(40))
            .unwrap();

        let outcome = controller
            .commit(SessionField::MaxAttendees, &DerivingClient)
            .await
            .unwrap();

        let CommitOutcome::Saved { applied, .. } = outcome else {
            panic!("expected save to succeed");
        };
        assert_eq!(
            applied,
            vec![SessionField::MaxAttendees, SessionField::CurrentStatus]
        );
        assert_eq!(controller.record().max_attendees, 40);
        assert_eq!(controller.record().current_status, SessionStatus::Completed);
        assert_eq!(controller.record().extra.get("updatedBy"), Some(&json!("admin")));
    }

    #[tokio::test]
    async fn commit_against_memory_backend_reports_transport_failure() {
        let client = MemorySessionClient::new().with_session(record(json!({
            "id": "s1",
            "location": "Room 4"
        })));
        client.fail_next(ApiError::transport("connection reset"));

        let (mut controller, notifier) = controller();
        controller.begin_edit(SessionField::Location).unwrap();
        controller
            .set_draft(SessionField::Location, FieldValue::Text("Room 8".into()))
            .unwrap();

        let outcome = controller
            .commit(SessionField::Location, &client)
            .await
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Failed { .. }));
        assert_eq!(controller.mode(SessionField::Location), EditMode::Editing);
        assert_eq!(controller.record().location, "Room 4");
        assert_eq!(notifier.len(), 1);
        assert!(client.updates().is_empty());
    }
}
