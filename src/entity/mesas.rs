use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mesas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub numero: i32,
    pub estado: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comandas::Entity")]
    Comandas,
}

impl Related<super::comandas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comandas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
