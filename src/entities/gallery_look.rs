use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// gallery 与 look 的关联行
///
/// `(gallery_id, look_id)` 唯一；`position` 是 gallery 内的顺序，
/// `id` 自增，同时作为 look 一侧的插入顺序。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gallery_look")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub gallery_id: i32,
    pub look_id: i32,
    pub is_featured: bool,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gallery::Entity",
        from = "Column::GalleryId",
        to = "super::gallery::Column::Id",
        on_delete = "Cascade"
    )]
    Gallery,
    #[sea_orm(
        belongs_to = "super::look::Entity",
        from = "Column::LookId",
        to = "super::look::Column::Id",
        on_delete = "Cascade"
    )]
    Look,
}

impl Related<super::gallery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gallery.def()
    }
}

impl Related<super::look::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Look.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
