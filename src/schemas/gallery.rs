use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::schemas::look::ProductTag;
use crate::services::ordering::HasStringId;

/// gallery 中一个 look 的位置与 featured 标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookAssociation {
    pub look_id: i32,
    #[serde(default)]
    pub is_featured: bool,
}

impl LookAssociation {
    pub fn new(look_id: i32, is_featured: bool) -> Self {
        Self {
            look_id,
            is_featured,
        }
    }
}

impl HasStringId for LookAssociation {
    fn string_id(&self) -> Cow<'_, str> {
        Cow::Owned(self.look_id.to_string())
    }
}

/// gallery 的完整 look 列表（不是增量）
///
/// 整体替换会先删除该 gallery 的全部关联再按此顺序重建，
/// 列表里没有的 look 会被移出，featured 以此处为准。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GalleryLookSnapshot(Vec<LookAssociation>);

impl GalleryLookSnapshot {
    pub fn new(looks: Vec<LookAssociation>) -> Self {
        Self(looks)
    }

    pub fn looks(&self) -> &[LookAssociation] {
        &self.0
    }

    pub fn look_ids(&self) -> Vec<i32> {
        self.0.iter().map(|a| a.look_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 同一个 look 不能在列表中出现两次
    pub fn check_unique(&self) -> AppResult<()> {
        let mut seen = HashSet::with_capacity(self.0.len());
        let duplicated: Vec<i32> = self
            .0
            .iter()
            .filter(|a| !seen.insert(a.look_id))
            .map(|a| a.look_id)
            .collect();

        if duplicated.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "look 在 gallery 中重复出现: {duplicated:?}"
            )))
        }
    }
}

impl From<Vec<LookAssociation>> for GalleryLookSnapshot {
    fn from(looks: Vec<LookAssociation>) -> Self {
        Self(looks)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GalleryRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub looks: GalleryLookSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateGalleryRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub is_active: bool,
    #[serde(default)]
    pub looks: GalleryLookSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryLookEntry {
    pub id: i32,
    pub media_key: String,
    pub media_url: Option<String>,
    pub is_active: bool,
    pub should_display_product: bool,
    pub model_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub unpublished_at: Option<DateTime<Utc>>,
    pub is_featured: bool,
    pub position: i32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub products: Vec<ProductTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub id: i32,
    pub title: String,
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub looks: Vec<GalleryLookEntry>,
}
