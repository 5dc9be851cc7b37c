// ==========================================
// ModelApi - printable model CRUD
// ==========================================
// Tags come in as plain names; unknown ones are created on the fly.
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::model::{ModelWithTags, PrintModel};
use crate::repository::model_repo::ModelRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelPayload {
    pub name: String,
    pub link: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModelPayload {
    pub name: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
    /// Replaces the whole tag set when present.
    pub tags: Option<Vec<String>>,
}

pub struct ModelApi {
    model_repo: Arc<ModelRepository>,
}

impl ModelApi {
    pub fn new(model_repo: Arc<ModelRepository>) -> Self {
        Self { model_repo }
    }

    pub fn list(&self) -> ApiResult<Vec<ModelWithTags>> {
        Ok(self.model_repo.list_with_tags()?)
    }

    pub fn get(&self, id: &str) -> ApiResult<ModelWithTags> {
        self.model_repo
            .find_with_tags(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Model {id} not found")))
    }

    pub fn create(&self, payload: CreateModelPayload) -> ApiResult<ModelWithTags> {
        if payload.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("name must not be empty".to_string()));
        }

        let now = Utc::now();
        let model = PrintModel {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            link: payload.link,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };
        self.model_repo.insert(&model, &payload.tags)?;
        self.get(&model.id)
    }

    pub fn update(&self, id: &str, payload: UpdateModelPayload) -> ApiResult<ModelWithTags> {
        let mut model = self
            .model_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Model {id} not found")))?;

        if let Some(name) = payload.name {
            if name.trim().is_empty() {
                return Err(ApiError::InvalidInput("name must not be empty".to_string()));
            }
            model.name = name;
        }
        if let Some(link) = payload.link {
            model.link = Some(link);
        }
        if let Some(notes) = payload.notes {
            model.notes = Some(notes);
        }

        model.updated_at = Utc::now();
        if !self.model_repo.update(&model, payload.tags.as_deref())? {
            return Err(ApiError::NotFound(format!("Model {id} not found")));
        }
        self.get(id)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.model_repo.delete(id)? {
            return Err(ApiError::NotFound(format!("Model {id} not found")));
        }
        Ok(())
    }
}
