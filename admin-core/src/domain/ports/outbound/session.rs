use async_trait::async_trait;

use crate::domain::{ApiError, SessionId, SessionPatch, SessionRecord};

/// Outbound port for the sessions resource.
///
/// Records cross this boundary in wire form; decoding to display form is
/// the caller's job.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Fetch a full session record.
    ///
    /// Fails with `NotFound` or `Transport`.
    async fn get_session(&self, id: &SessionId) -> Result<SessionRecord, ApiError>;

    /// Apply a partial update and return the resulting record.
    ///
    /// The response may carry fields beyond those in `patch`.
    /// Fails with `Validation` or `Transport`.
    async fn update_session(
        &self,
        id: &SessionId,
        patch: &SessionPatch,
    ) -> Result<SessionRecord, ApiError>;
}
