use thiserror::Error;
use time::macros::date;
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created: Date,
    pub last_used: Date,
}

/// Values held by the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyForm {
    pub name: String,
    pub key: String,
    pub created: Option<Date>,
    pub last_used: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyModal {
    Create(ApiKeyForm),
    Edit { id: String, form: ApiKeyForm },
}

impl ApiKeyModal {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Create(_) => "Create New API Key",
            Self::Edit { .. } => "Edit API Key",
        }
    }

    pub fn form(&self) -> &ApiKeyForm {
        match self {
            Self::Create(form) | Self::Edit { form, .. } => form,
        }
    }

    fn form_mut(&mut self) -> &mut ApiKeyForm {
        match self {
            Self::Create(form) | Self::Edit { form, .. } => form,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiKeyError {
    #[error("no API key with id `{0}`")]
    UnknownKey(String),
    #[error("no API key form is open")]
    NoForm,
}

/// Locally held API keys with a single modal form for create and edit.
///
/// Nothing here talks to a backend.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyRegistry {
    keys: Vec<ApiKey>,
    modal: Option<ApiKeyModal>,
    next_id: u64,
}

impl ApiKeyRegistry {
    pub fn new(keys: Vec<ApiKey>) -> Self {
        let next_id = keys
            .iter()
            .filter_map(|key| key.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            keys,
            modal: None,
            next_id,
        }
    }

    /// The two keys every fresh settings page starts with.
    pub fn with_samples() -> Self {
        Self::new(vec![
            ApiKey {
                id: "1".into(),
                name: "Production API".into(),
                key: "sk-***************8392".into(),
                created: date!(2024 - 01 - 15),
                last_used: date!(2024 - 01 - 12),
            },
            ApiKey {
                id: "2".into(),
                name: "Development API".into(),
                key: "sk-***************2847".into(),
                created: date!(2024 - 01 - 20),
                last_used: date!(2024 - 01 - 11),
            },
        ])
    }

    pub fn keys(&self) -> &[ApiKey] {
        &self.keys
    }

    pub fn get(&self, id: &str) -> Option<&ApiKey> {
        self.keys.iter().find(|key| key.id == id)
    }

    pub fn modal(&self) -> Option<&ApiKeyModal> {
        self.modal.as_ref()
    }

    pub fn open_create(&mut self, today: Date) {
        self.modal = Some(ApiKeyModal::Create(ApiKeyForm {
            created: Some(today),
            last_used: Some(today),
            ..ApiKeyForm::default()
        }));
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), ApiKeyError> {
        let key = self
            .get(id)
            .ok_or_else(|| ApiKeyError::UnknownKey(id.to_string()))?;
        let form = ApiKeyForm {
            name: key.name.clone(),
            key: key.key.clone(),
            created: Some(key.created),
            last_used: Some(key.last_used),
        };
        self.modal = Some(ApiKeyModal::Edit {
            id: id.to_string(),
            form,
        });
        Ok(())
    }

    pub fn form_mut(&mut self) -> Result<&mut ApiKeyForm, ApiKeyError> {
        self.modal
            .as_mut()
            .map(ApiKeyModal::form_mut)
            .ok_or(ApiKeyError::NoForm)
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Apply the open form and close it. Empty dates become `today`.
    pub fn save_modal(&mut self, today: Date) -> Result<&ApiKey, ApiKeyError> {
        let modal = self.modal.take().ok_or(ApiKeyError::NoForm)?;
        match modal {
            ApiKeyModal::Create(form) => {
                let id = self.next_id.to_string();
                self.next_id += 1;
                self.keys.push(ApiKey {
                    id,
                    name: form.name,
                    key: form.key,
                    created: form.created.unwrap_or(today),
                    last_used: form.last_used.unwrap_or(today),
                });
                tracing::debug!("api key created");
                let index = self.keys.len() - 1;
                Ok(&self.keys[index])
            }
            ApiKeyModal::Edit { id, form } => {
                let index = self
                    .keys
                    .iter()
                    .position(|key| key.id == id)
                    .ok_or_else(|| ApiKeyError::UnknownKey(id.clone()))?;
                let key = &mut self.keys[index];
                key.name = form.name;
                key.key = form.key;
                if let Some(created) = form.created {
                    key.created = created;
                }
                if let Some(last_used) = form.last_used {
                    key.last_used = last_used;
                }
                tracing::debug!(%id, "api key updated");
                Ok(&self.keys[index])
            }
        }
    }
}
