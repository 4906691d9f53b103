use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comanda_detalles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub comanda_id: Uuid,
    pub producto_id: Uuid,
    pub cantidad: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub precio_unitario: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comandas::Entity",
        from = "Column::ComandaId",
        to = "super::comandas::Column::Id",
        on_delete = "Cascade"
    )]
    Comandas,
    #[sea_orm(
        belongs_to = "super::productos::Entity",
        from = "Column::ProductoId",
        to = "super::productos::Column::Id"
    )]
    Productos,
}

impl Related<super::comandas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comandas.def()
    }
}

impl Related<super::productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
