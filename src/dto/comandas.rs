use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Comanda, ComandaDetalle, Mesa};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DetalleInput {
    pub producto_id: Uuid,
    pub cantidad: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComandaRequest {
    pub user_id: Uuid,
    pub fecha: DateTime<Utc>,
    pub estado: String,
    pub productos: Vec<DetalleInput>,
    pub iva: Option<Decimal>,
    pub mesa_id: Option<Uuid>,
}

/// Partial update. `productos`, when present, replaces the whole detalle set;
/// an absent `mesa_id` detaches the comanda from its mesa.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComandaRequest {
    pub user_id: Option<Uuid>,
    pub estado: Option<String>,
    pub productos: Option<Vec<DetalleInput>>,
    pub iva: Option<Decimal>,
    pub mesa_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PagarComandaRequest {
    pub iva: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComandaWithDetalles {
    pub comanda: Comanda,
    pub detalles: Vec<ComandaDetalle>,
}

/// Read view: subtotal recomputed live from the persisted detalles, rate
/// resolved with the display precedence.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComandaView {
    pub comanda: Comanda,
    pub detalles: Vec<ComandaDetalle>,
    pub mesa: Option<Mesa>,
    pub subtotal: Decimal,
    pub iva: Decimal,
    pub total_con_iva: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagoResult {
    pub subtotal: Decimal,
    pub iva: Decimal,
    pub total_con_iva: Decimal,
    pub comanda: Comanda,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComandaList {
    pub items: Vec<Comanda>,
}
