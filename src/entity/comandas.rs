use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comandas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub fecha: DateTimeWithTimeZone,
    pub estado: String,
    #[sea_orm(column_type = "Decimal(Some((5, 4)))", nullable)]
    pub iva: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub total_con_iva: Option<Decimal>,
    pub mesa_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::mesas::Entity",
        from = "Column::MesaId",
        to = "super::mesas::Column::Id",
        on_delete = "SetNull"
    )]
    Mesas,
    #[sea_orm(has_many = "super::comanda_detalles::Entity")]
    ComandaDetalles,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::mesas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mesas.def()
    }
}

impl Related<super::comanda_detalles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComandaDetalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
