use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::outbound::{ProfileStore, SessionClient, SettingsClient};
use crate::domain::{
    AdminProfile, ApiError, SessionId, SessionPatch, SessionRecord, SettingsGroup, SettingsId,
};

/// Errors queued to be returned by the next calls, oldest first.
#[derive(Debug, Clone, Default)]
struct FailureQueue(Arc<RwLock<VecDeque<ApiError>>>);

impl FailureQueue {
    fn push(&self, error: ApiError) {
        self.0
            .write()
            .expect("failure queue lock poisoned")
            .push_back(error);
    }

    fn pop(&self) -> Option<ApiError> {
        self.0
            .write()
            .expect("failure queue lock poisoned")
            .pop_front()
    }
}

/// Session backend held in a `HashMap`.
///
/// Updates behave like the real API: the patch is merged into the stored
/// record and the whole record is returned.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionClient {
    sessions: Arc<RwLock<HashMap<SessionId, SessionRecord>>>,
    updates: Arc<RwLock<Vec<(SessionId, SessionPatch)>>>,
    failures: FailureQueue,
}

impl MemorySessionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record. Records without an id are skipped.
    pub fn with_session(self, record: SessionRecord) -> Self {
        self.with_sessions(vec![record])
    }

    pub fn with_sessions(self, records: Vec<SessionRecord>) -> Self {
        {
            let mut sessions = self.sessions.write().expect("session store lock poisoned");
            for record in records {
                match record.id.clone() {
                    Some(id) => {
                        sessions.insert(id, record);
                    }
                    None => tracing::warn!("skipping seeded session without id"),
                }
            }
        }
        self
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.failures.push(error);
    }

    /// Every accepted update, in order.
    pub fn updates(&self) -> Vec<(SessionId, SessionPatch)> {
        self.updates
            .read()
            .expect("session store lock poisoned")
            .clone()
    }

    pub fn session(&self, id: &SessionId) -> Option<SessionRecord> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(id)
            .cloned()
    }
}

#[async_trait]
impl SessionClient for MemorySessionClient {
    async fn get_session(&self, id: &SessionId) -> Result<SessionRecord, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }
        self.session(id).ok_or(ApiError::NotFound)
    }

    async fn update_session(
        &self,
        id: &SessionId,
        patch: &SessionPatch,
    ) -> Result<SessionRecord, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }

        let mut sessions = self.sessions.write().expect("session store lock poisoned");
        let current = sessions.get(id).ok_or(ApiError::NotFound)?;

        let mut body = match serde_json::to_value(current) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ApiError::transport("session did not encode as an object")),
            Err(e) => return Err(ApiError::transport(e.to_string())),
        };
        body.extend(patch.as_map().clone());
        let updated: SessionRecord = serde_json::from_value(Value::Object(body))
            .map_err(|e| ApiError::validation(e.to_string()))?;

        sessions.insert(id.clone(), updated.clone());
        self.updates
            .write()
            .expect("session store lock poisoned")
            .push((id.clone(), patch.clone()));
        Ok(updated)
    }
}

/// A settings collection held in memory. Created groups get sequential ids.
#[derive(Debug)]
pub struct MemorySettingsClient<G> {
    groups: Arc<RwLock<Vec<G>>>,
    next_id: Arc<AtomicU64>,
    failures: FailureQueue,
    _group: PhantomData<fn() -> G>,
}

impl<G> Clone for MemorySettingsClient<G> {
    fn clone(&self) -> Self {
        Self {
            groups: Arc::clone(&self.groups),
            next_id: Arc::clone(&self.next_id),
            failures: self.failures.clone(),
            _group: PhantomData,
        }
    }
}

impl<G> Default for MemorySettingsClient<G> {
    fn default() -> Self {
        Self {
            groups: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            failures: FailureQueue::default(),
            _group: PhantomData,
        }
    }
}

impl<G: SettingsGroup> MemorySettingsClient<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(self, groups: Vec<G>) -> Self {
        self.groups
            .write()
            .expect("settings store lock poisoned")
            .extend(groups);
        self
    }

    pub fn fail_next(&self, error: ApiError) {
        self.failures.push(error);
    }
}

#[async_trait]
impl<G: SettingsGroup> SettingsClient<G> for MemorySettingsClient<G> {
    async fn list_settings(&self) -> Result<Vec<G>, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }
        Ok(self
            .groups
            .read()
            .expect("settings store lock poisoned")
            .clone())
    }

    async fn create_settings(&self, group: &G) -> Result<G, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = group.clone();
        created.set_id(SettingsId::new(format!("local-{id}")));
        self.groups
            .write()
            .expect("settings store lock poisoned")
            .push(created.clone());
        Ok(created)
    }

    async fn update_settings(&self, id: &SettingsId, group: &G) -> Result<G, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }
        let mut groups = self.groups.write().expect("settings store lock poisoned");
        let slot = groups
            .iter_mut()
            .find(|stored| stored.id() == Some(id))
            .ok_or(ApiError::NotFound)?;
        let mut updated = group.clone();
        updated.set_id(id.clone());
        *slot = updated.clone();
        Ok(updated)
    }
}

/// Profile store holding a single profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profile: Arc<RwLock<AdminProfile>>,
    failures: FailureQueue,
}

impl MemoryProfileStore {
    pub fn new(profile: AdminProfile) -> Self {
        Self {
            profile: Arc::new(RwLock::new(profile)),
            failures: FailureQueue::default(),
        }
    }

    pub fn fail_next(&self, error: ApiError) {
        self.failures.push(error);
    }

    pub fn profile(&self) -> AdminProfile {
        self.profile
            .read()
            .expect("profile store lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn current_profile(&self) -> Result<AdminProfile, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }
        Ok(self.profile())
    }

    async fn update_profile(&self, profile: &AdminProfile) -> Result<AdminProfile, ApiError> {
        if let Some(error) = self.failures.pop() {
            return Err(error);
        }
        let mut stored = self.profile.write().expect("profile store lock poisoned");
        let mut updated = profile.clone();
        if updated.id.is_none() {
            updated.id = stored.id.clone();
        }
        *stored = updated.clone();
        Ok(updated)
    }
}
