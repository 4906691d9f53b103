use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::mesas::{CreateMesaRequest, MesaList, UpdateMesaRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Mesa,
    response::ApiResponse,
    services::mesa_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mesas).post(create_mesa))
        .route("/{id}", get(get_mesa).put(update_mesa).delete(delete_mesa))
}

#[utoipa::path(
    get,
    path = "/api/mesas",
    responses(
        (status = 200, description = "List mesas ordered by numero", body = ApiResponse<MesaList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Mesas"
)]
pub async fn list_mesas(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<MesaList>>> {
    let resp = mesa_service::list_mesas(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mesas/{id}",
    params(
        ("id" = Uuid, Path, description = "Mesa ID")
    ),
    responses(
        (status = 200, description = "Get mesa", body = ApiResponse<Mesa>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Mesas"
)]
pub async fn get_mesa(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Mesa>>> {
    let resp = mesa_service::get_mesa(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/mesas",
    request_body = CreateMesaRequest,
    responses(
        (status = 201, description = "Mesa created", body = ApiResponse<Mesa>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Mesas"
)]
pub async fn create_mesa(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateMesaRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Mesa>>)> {
    let resp = mesa_service::create_mesa(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/mesas/{id}",
    params(
        ("id" = Uuid, Path, description = "Mesa ID")
    ),
    request_body = UpdateMesaRequest,
    responses(
        (status = 200, description = "Mesa updated", body = ApiResponse<Mesa>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Mesas"
)]
pub async fn update_mesa(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMesaRequest>,
) -> AppResult<Json<ApiResponse<Mesa>>> {
    let resp = mesa_service::update_mesa(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/mesas/{id}",
    params(
        ("id" = Uuid, Path, description = "Mesa ID")
    ),
    responses(
        (status = 200, description = "Mesa deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Mesa is ocupada")
    ),
    security(("bearer_auth" = [])),
    tag = "Mesas"
)]
pub async fn delete_mesa(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = mesa_service::delete_mesa(&state, id).await?;
    Ok(Json(resp))
}
