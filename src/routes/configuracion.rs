use axum::{Json, Router, extract::State, routing::get, routing::post};

use crate::{
    dto::configuracion::{IvaConfig, MonedaConfig, SetIvaRequest, SetMonedaRequest},
    dto::mesas::{MesaList, TotalMesasRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{configuracion_service, mesa_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/iva", get(get_iva).post(set_iva))
        .route("/moneda", get(get_moneda).post(set_moneda))
        .route("/total-mesas", post(set_total_mesas))
}

#[utoipa::path(
    get,
    path = "/api/configuracion/iva",
    responses(
        (status = 200, description = "Current global VAT rate (0.21 when unset)", body = ApiResponse<IvaConfig>)
    ),
    security(("bearer_auth" = [])),
    tag = "Configuracion"
)]
pub async fn get_iva(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<IvaConfig>>> {
    let resp = configuracion_service::get_iva(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/configuracion/iva",
    request_body = SetIvaRequest,
    responses(
        (status = 200, description = "Global VAT rate stored", body = ApiResponse<IvaConfig>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Rate outside [0, 1]")
    ),
    security(("bearer_auth" = [])),
    tag = "Configuracion"
)]
pub async fn set_iva(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetIvaRequest>,
) -> AppResult<Json<ApiResponse<IvaConfig>>> {
    let resp = configuracion_service::set_iva(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/configuracion/moneda",
    responses(
        (status = 200, description = "Current currency code, null when unset", body = ApiResponse<MonedaConfig>)
    ),
    security(("bearer_auth" = [])),
    tag = "Configuracion"
)]
pub async fn get_moneda(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<MonedaConfig>>> {
    let resp = configuracion_service::get_moneda(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/configuracion/moneda",
    request_body = SetMonedaRequest,
    responses(
        (status = 200, description = "Currency stored", body = ApiResponse<MonedaConfig>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Not a 3-letter code")
    ),
    security(("bearer_auth" = [])),
    tag = "Configuracion"
)]
pub async fn set_moneda(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetMonedaRequest>,
) -> AppResult<Json<ApiResponse<MonedaConfig>>> {
    let resp = configuracion_service::set_moneda(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/configuracion/total-mesas",
    request_body = TotalMesasRequest,
    responses(
        (status = 200, description = "Mesa set resized", body = ApiResponse<MesaList>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Occupied mesas would be removed"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Configuracion"
)]
pub async fn set_total_mesas(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TotalMesasRequest>,
) -> AppResult<Json<ApiResponse<MesaList>>> {
    let resp = mesa_service::set_total_mesas(&state, &user, payload).await?;
    Ok(Json(resp))
}
