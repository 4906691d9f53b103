use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::Categoria,
    response::ApiResponse,
    services::categoria_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoriaRequest {
    pub nombre: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoriaRequest {
    pub nombre: String,
}

#[derive(Serialize, ToSchema)]
pub struct CategoriaList {
    pub items: Vec<Categoria>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categorias).post(create_categoria))
        .route(
            "/{id}",
            get(get_categoria)
                .put(update_categoria)
                .delete(delete_categoria),
        )
}

#[utoipa::path(
    get,
    path = "/api/categorias",
    responses(
        (status = 200, description = "List categorias", body = ApiResponse<CategoriaList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Categorias"
)]
pub async fn list_categorias(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<CategoriaList>>> {
    let resp = categoria_service::list_categorias(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categorias/{id}",
    params(
        ("id" = Uuid, Path, description = "Categoria ID")
    ),
    responses(
        (status = 200, description = "Get categoria", body = ApiResponse<Categoria>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categorias"
)]
pub async fn get_categoria(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Categoria>>> {
    let resp = categoria_service::get_categoria(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categorias",
    request_body = CreateCategoriaRequest,
    responses(
        (status = 201, description = "Categoria created", body = ApiResponse<Categoria>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Categorias"
)]
pub async fn create_categoria(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoriaRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Categoria>>)> {
    let resp = categoria_service::create_categoria(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/categorias/{id}",
    params(
        ("id" = Uuid, Path, description = "Categoria ID")
    ),
    request_body = UpdateCategoriaRequest,
    responses(
        (status = 200, description = "Categoria updated", body = ApiResponse<Categoria>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categorias"
)]
pub async fn update_categoria(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoriaRequest>,
) -> AppResult<Json<ApiResponse<Categoria>>> {
    let resp = categoria_service::update_categoria(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/categorias/{id}",
    params(
        ("id" = Uuid, Path, description = "Categoria ID")
    ),
    responses(
        (status = 200, description = "Categoria deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categorias"
)]
pub async fn delete_categoria(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = categoria_service::delete_categoria(&state, &user, id).await?;
    Ok(Json(resp))
}
