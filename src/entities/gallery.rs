use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gallery")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::gallery_look::Entity")]
    GalleryLooks,
}

impl Related<super::gallery_look::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GalleryLooks.def()
    }
}

impl Related<super::look::Entity> for Entity {
    fn to() -> RelationDef {
        super::gallery_look::Relation::Look.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::gallery_look::Relation::Gallery.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
