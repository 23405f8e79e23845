use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    pub nom: String,

    pub prenom: String,

    /// One of `admin`, `manager`, `employe`; anything else grants no access.
    pub role: String,

    /// Store a manager is affiliated with.
    pub magasin_id: Option<i32>,

    /// Argon2id password hash
    pub password_hash: String,

    /// Random API key (64-char hex string)
    #[sea_orm(unique)]
    pub api_key: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::magasins::Entity",
        from = "Column::MagasinId",
        to = "super::magasins::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Magasins,
}

impl Related<super::magasins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Magasins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
