// ==========================================
// spooltrack - printable model and tag domain models
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A printable design, linked to tags many-to-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintModel {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name-only label entity, unique by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Model expanded with its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelWithTags {
    #[serde(flatten)]
    pub model: PrintModel,
    pub tags: Vec<Tag>,
}
