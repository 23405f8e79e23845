use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "plannings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Assignee of the shift.
    pub user_id: i32,

    pub magasin_id: i32,

    pub date: chrono::NaiveDate,

    pub heure_debut: chrono::NaiveTime,

    pub heure_fin: chrono::NaiveTime,

    pub tache: String,

    pub notes: Option<String>,

    /// Set once at creation; cleared if the creator account is removed.
    pub created_by_id: Option<i32>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Assignee,
    #[sea_orm(
        belongs_to = "super::magasins::Entity",
        from = "Column::MagasinId",
        to = "super::magasins::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Magasins,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Creator,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignee.def()
    }
}

impl Related<super::magasins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Magasins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
