use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "productos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub nombre: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub precio: Decimal,
    pub categoria_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categorias::Entity",
        from = "Column::CategoriaId",
        to = "super::categorias::Column::Id"
    )]
    Categorias,
    #[sea_orm(has_many = "super::comanda_detalles::Entity")]
    ComandaDetalles,
}

impl Related<super::categorias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categorias.def()
    }
}

impl Related<super::comanda_detalles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComandaDetalles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
