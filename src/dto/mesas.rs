use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Mesa;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMesaRequest {
    pub numero: i32,
    pub estado: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMesaRequest {
    pub numero: Option<i32>,
    pub estado: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TotalMesasRequest {
    pub total_mesas: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MesaList {
    pub items: Vec<Mesa>,
}
