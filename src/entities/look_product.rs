use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "look_product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub look_id: i32,
    pub product_id: String,
    pub product_handle: String,
    pub spot_x: i32,
    pub spot_y: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::look::Entity",
        from = "Column::LookId",
        to = "super::look::Column::Id",
        on_delete = "Cascade"
    )]
    Look,
}

impl Related<super::look::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Look.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
