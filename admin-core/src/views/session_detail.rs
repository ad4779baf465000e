use std::sync::Arc;

use crate::domain::ports::outbound::{Notifier, SessionClient};
use crate::domain::{EditError, FetchFailure, Notification, Session, SessionField, SessionId};
use crate::edit::{CommitOutcome, FieldEditController};

/// The session detail page: one fetched record and its field editor.
pub struct SessionDetail<C: ?Sized> {
    client: Arc<C>,
    editor: FieldEditController,
}

impl<C: SessionClient + ?Sized> SessionDetail<C> {
    /// Fetch the session and build its editor.
    ///
    /// A missing id fails before any request. A failed fetch raises one
    /// notification.
    pub async fn load(
        client: Arc<C>,
        id: Option<SessionId>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, FetchFailure> {
        let Some(id) = id else {
            return Err(FetchFailure::MissingId("session"));
        };

        match client.get_session(&id).await {
            Ok(record) => {
                tracing::debug!(session = %id, "session loaded");
                let session = Session::from_record(id, record);
                Ok(Self {
                    client,
                    editor: FieldEditController::new(session, notifier),
                })
            }
            Err(source) => {
                tracing::warn!(session = %id, error = %source, "failed to load session");
                notifier.notify(Notification::failure(
                    "Failed to load session details. Please try again.",
                ));
                Err(FetchFailure::Api {
                    what: "session",
                    source,
                })
            }
        }
    }

    pub fn session(&self) -> &Session {
        self.editor.record()
    }

    pub fn title(&self) -> &str {
        &self.session().title
    }

    pub fn editor(&self) -> &FieldEditController {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut FieldEditController {
        &mut self.editor
    }

    /// Commit the field's current draft.
    pub async fn save(&mut self, field: SessionField) -> Result<CommitOutcome, EditError> {
        self.editor.commit(field, self.client.as_ref()).await
    }

    /// Edit one field from raw input and save it.
    ///
    /// Input that does not coerce cancels the edit and is returned as an
    /// error without any request being made.
    pub async fn edit(
        &mut self,
        field: SessionField,
        raw: &str,
    ) -> Result<CommitOutcome, EditError> {
        self.editor.begin_edit(field)?;
        if let Err(error) = self.editor.set_draft_input(field, raw) {
            self.editor.cancel_edit(field)?;
            return Err(error);
        }
        self.save(field).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySessionClient, RecordingNotifier};
    use crate::domain::{ApiError, SessionStatus};
    use crate::edit::EditMode;
    use serde_json::json;

    fn client() -> Arc<MemorySessionClient> {
        Arc::new(
            MemorySessionClient::new().with_session(
                serde_json::from_value(json!({
                    "id": "42",
                    "title": "Async Rust",
                    "technology": "Rust",
                    "maxAttendees": 12,
                    "currentStatus": "On_Hold"
                }))
                .unwrap(),
            ),
        )
    }

    #[tokio::test]
    async fn load_decodes_status_to_display_form() {
        let notifier = RecordingNotifier::new();
        let detail = SessionDetail::load(
            client(),
            Some(SessionId::new("42")),
            Arc::new(notifier.clone()),
        )
        .await
        .unwrap();

        assert_eq!(detail.title(), "Async Rust");
        assert_eq!(detail.session().current_status, SessionStatus::OnHold);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn missing_id_fails_without_a_request() {
        let client = client();
        client.fail_next(ApiError::transport("should not be reached"));
        let notifier = RecordingNotifier::new();

        let err = SessionDetail::load(client.clone(), None, Arc::new(notifier.clone()))
            .await
            .err()
            .unwrap();

        assert_eq!(err, FetchFailure::MissingId("session"));
        assert!(notifier.is_empty());
        // The queued failure is still there.
        assert!(client.get_session(&SessionId::new("42")).await.is_err());
    }

    #[tokio::test]
    async fn failed_load_notifies_once() {
        let notifier = RecordingNotifier::new();
        let err = SessionDetail::load(
            client(),
            Some(SessionId::new("missing")),
            Arc::new(notifier.clone()),
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(
            err,
            FetchFailure::Api {
                source: ApiError::NotFound,
                ..
            }
        ));
        assert_eq!(notifier.failures().len(), 1);
        assert_eq!(
            notifier.failures()[0].description,
            "Failed to load session details. Please try again."
        );
    }

    #[tokio::test]
    async fn edit_saves_and_names_the_field() {
        let client = client();
        let notifier = RecordingNotifier::new();
        let mut detail = SessionDetail::load(
            client.clone(),
            Some(SessionId::new("42")),
            Arc::new(notifier.clone()),
        )
        .await
        .unwrap();

        let outcome = detail
            .edit(SessionField::Technology, "Rust + Tokio")
            .await
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Saved { .. }));
        assert_eq!(detail.session().technology, "Rust + Tokio");
        assert_eq!(
            notifier.notifications()[0].description,
            "Technology has been updated successfully."
        );
        assert_eq!(client.updates().len(), 1);
    }

    #[tokio::test]
    async fn bad_input_cancels_the_edit() {
        let client = client();
        let mut detail = SessionDetail::load(
            client.clone(),
            Some(SessionId::new("42")),
            Arc::new(RecordingNotifier::new()),
        )
        .await
        .unwrap();

        let err = detail
            .edit(SessionField::Date, "next tuesday")
            .await
            .unwrap_err();

        assert!(matches!(err, EditError::Coercion(_)));
        assert_eq!(detail.editor().mode(SessionField::Date), EditMode::Viewing);
        assert!(client.updates().is_empty());
    }
}
