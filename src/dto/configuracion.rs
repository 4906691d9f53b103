use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct IvaConfig {
    pub iva: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetIvaRequest {
    pub iva: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonedaConfig {
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetMonedaRequest {
    pub currency: String,
}
