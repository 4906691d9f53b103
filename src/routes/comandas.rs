use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::comandas::{
        ComandaList, ComandaView, ComandaWithDetalles, CreateComandaRequest, PagarComandaRequest,
        PagoResult, UpdateComandaRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ComandaListQuery,
    services::comanda_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comandas).post(create_comanda))
        .route(
            "/{id}",
            get(get_comanda).put(update_comanda).delete(delete_comanda),
        )
        .route("/{id}/pagar", put(pagar_comanda))
}

#[utoipa::path(
    get,
    path = "/api/comandas",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("estado" = Option<String>, Query, description = "Filter by estado: abierta, cerrada"),
        ("mesa_id" = Option<Uuid>, Query, description = "Filter by mesa"),
        ("sort_order" = Option<String>, Query, description = "Sort by fecha: asc, desc")
    ),
    responses(
        (status = 200, description = "List comandas", body = ApiResponse<ComandaList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Comandas"
)]
pub async fn list_comandas(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ComandaListQuery>,
) -> AppResult<Json<ApiResponse<ComandaList>>> {
    let resp = comanda_service::list_comandas(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/comandas/{id}",
    params(
        ("id" = Uuid, Path, description = "Comanda ID")
    ),
    responses(
        (status = 200, description = "Comanda with live subtotal, rate and total", body = ApiResponse<ComandaView>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comandas"
)]
pub async fn get_comanda(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ComandaView>>> {
    let resp = comanda_service::get_comanda(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/comandas",
    request_body = CreateComandaRequest,
    responses(
        (status = 201, description = "Comanda created", body = ApiResponse<ComandaWithDetalles>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comandas"
)]
pub async fn create_comanda(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateComandaRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ComandaWithDetalles>>)> {
    let resp = comanda_service::create_comanda(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/comandas/{id}",
    params(
        ("id" = Uuid, Path, description = "Comanda ID")
    ),
    request_body = UpdateComandaRequest,
    responses(
        (status = 200, description = "Comanda updated", body = ApiResponse<ComandaWithDetalles>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comandas"
)]
pub async fn update_comanda(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateComandaRequest>,
) -> AppResult<Json<ApiResponse<ComandaWithDetalles>>> {
    let resp = comanda_service::update_comanda(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/comandas/{id}/pagar",
    params(
        ("id" = Uuid, Path, description = "Comanda ID")
    ),
    request_body = PagarComandaRequest,
    responses(
        (status = 200, description = "Comanda paid", body = ApiResponse<PagoResult>),
        (status = 400, description = "Already cerrada"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comandas"
)]
pub async fn pagar_comanda(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PagarComandaRequest>,
) -> AppResult<Json<ApiResponse<PagoResult>>> {
    let resp = comanda_service::pagar_comanda(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/comandas/{id}",
    params(
        ("id" = Uuid, Path, description = "Comanda ID")
    ),
    responses(
        (status = 200, description = "Comanda deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comandas"
)]
pub async fn delete_comanda(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = comanda_service::delete_comanda(&state, &user, id).await?;
    Ok(Json(resp))
}
