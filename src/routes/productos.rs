use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::Producto,
    response::ApiResponse,
    routes::params::ProductoQuery,
    services::producto_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductoRequest {
    pub nombre: String,
    pub precio: Decimal,
    pub categoria_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductoRequest {
    pub nombre: Option<String>,
    pub precio: Option<Decimal>,
    pub categoria_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductoList {
    pub items: Vec<Producto>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_productos).post(create_producto))
        .route(
            "/{id}",
            get(get_producto).put(update_producto).delete(delete_producto),
        )
}

#[utoipa::path(
    get,
    path = "/api/productos",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in nombre"),
        ("categoria_id" = Option<Uuid>, Query, description = "Filter by categoria")
    ),
    responses(
        (status = 200, description = "List productos", body = ApiResponse<ProductoList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Productos"
)]
pub async fn list_productos(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ProductoQuery>,
) -> AppResult<Json<ApiResponse<ProductoList>>> {
    let resp = producto_service::list_productos(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    params(
        ("id" = Uuid, Path, description = "Producto ID")
    ),
    responses(
        (status = 200, description = "Get producto", body = ApiResponse<Producto>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Productos"
)]
pub async fn get_producto(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Producto>>> {
    let resp = producto_service::get_producto(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    request_body = CreateProductoRequest,
    responses(
        (status = 201, description = "Producto created", body = ApiResponse<Producto>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "Productos"
)]
pub async fn create_producto(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductoRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Producto>>)> {
    let resp = producto_service::create_producto(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    params(
        ("id" = Uuid, Path, description = "Producto ID")
    ),
    request_body = UpdateProductoRequest,
    responses(
        (status = 200, description = "Producto updated", body = ApiResponse<Producto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Productos"
)]
pub async fn update_producto(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductoRequest>,
) -> AppResult<Json<ApiResponse<Producto>>> {
    let resp = producto_service::update_producto(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    params(
        ("id" = Uuid, Path, description = "Producto ID")
    ),
    responses(
        (status = 200, description = "Producto deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Productos"
)]
pub async fn delete_producto(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = producto_service::delete_producto(&state, &user, id).await?;
    Ok(Json(resp))
}
