use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "look")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub media_key: String,
    pub media_url: Option<String>,
    pub is_active: bool,
    pub should_display_product: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub model_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub unpublished_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 在 `now` 时刻是否对外可见：启用中且处于发布窗口内
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.published_at.map_or(true, |published| published < now)
            && self.unpublished_at.map_or(true, |unpublished| unpublished > now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::gallery_look::Entity")]
    GalleryLooks,
    #[sea_orm(has_many = "super::look_product::Entity")]
    LookProducts,
}

impl Related<super::gallery_look::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GalleryLooks.def()
    }
}

impl Related<super::look_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LookProducts.def()
    }
}

impl Related<super::gallery::Entity> for Entity {
    fn to() -> RelationDef {
        super::gallery_look::Relation::Gallery.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::gallery_look::Relation::Look.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn look(published_at: Option<DateTime<Utc>>, unpublished_at: Option<DateTime<Utc>>) -> Model {
        Model {
            id: 1,
            media_key: "assets/look.jpg".to_string(),
            media_url: None,
            is_active: true,
            should_display_product: false,
            model_description: None,
            published_at,
            unpublished_at,
            registered_at: Utc::now(),
            modified_at: None,
        }
    }

    #[test]
    fn open_window_is_visible() {
        assert!(look(None, None).is_visible_at(Utc::now()));
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let now = Utc::now();
        assert!(!look(Some(now), None).is_visible_at(now));
        assert!(!look(None, Some(now)).is_visible_at(now));
        assert!(look(Some(now - Duration::hours(1)), Some(now + Duration::hours(1)))
            .is_visible_at(now));
    }

    #[test]
    fn inactive_look_is_hidden() {
        let mut model = look(None, None);
        model.is_active = false;
        assert!(!model.is_visible_at(Utc::now()));
    }
}
