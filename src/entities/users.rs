use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    /// Connected YouTube channel, if any.
    pub channel_id: Option<String>,

    pub channel_name: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cached_videos::Entity")]
    CachedVideos,
    #[sea_orm(has_many = "super::analyses::Entity")]
    Analyses,
}

impl Related<super::cached_videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CachedVideos.def()
    }
}

impl Related<super::analyses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
