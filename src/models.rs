use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Categoria {
    pub id: Uuid,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Producto {
    pub id: Uuid,
    pub nombre: String,
    pub precio: Decimal,
    pub categoria_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Mesa {
    pub id: Uuid,
    pub numero: i32,
    pub estado: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Comanda {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fecha: DateTime<Utc>,
    pub estado: String,
    pub iva: Option<Decimal>,
    pub total_con_iva: Option<Decimal>,
    pub mesa_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComandaDetalle {
    pub id: Uuid,
    pub comanda_id: Uuid,
    pub producto_id: Uuid,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
