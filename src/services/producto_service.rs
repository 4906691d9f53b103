use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    entity::{
        productos::{
            ActiveModel as ProductoActive, Column as ProductoCol, Entity as Productos,
            Model as ProductoModel,
        },
        Categorias,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Producto,
    response::{ApiResponse, Meta},
    routes::params::ProductoQuery,
    routes::productos::{CreateProductoRequest, ProductoList, UpdateProductoRequest},
    state::AppState,
};

fn validate_precio(precio: Decimal) -> Result<(), AppError> {
    if precio < Decimal::ZERO {
        return Err(AppError::Validation("precio must not be negative".into()));
    }
    Ok(())
}

pub async fn list_productos(
    state: &AppState,
    query: ProductoQuery,
) -> AppResult<ApiResponse<ProductoList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(ProductoCol::Nombre).ilike(pattern));
    }
    if let Some(categoria_id) = query.categoria_id {
        condition = condition.add(ProductoCol::CategoriaId.eq(categoria_id));
    }

    let finder = Productos::find()
        .filter(condition)
        .order_by_asc(ProductoCol::Nombre);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(producto_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Productos",
        ProductoList { items },
        Some(meta),
    ))
}

pub async fn get_producto(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Producto>> {
    let producto = Productos::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Producto",
        producto_from_entity(producto),
        None,
    ))
}

pub async fn create_producto(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductoRequest,
) -> AppResult<ApiResponse<Producto>> {
    ensure_admin(user)?;
    validate_precio(payload.precio)?;

    if Categorias::find_by_id(payload.categoria_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "categoria {} does not exist",
            payload.categoria_id
        )));
    }

    let producto = ProductoActive {
        id: Set(Uuid::new_v4()),
        nombre: Set(payload.nombre),
        precio: Set(payload.precio),
        categoria_id: Set(payload.categoria_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Producto creado",
        producto_from_entity(producto),
        Some(Meta::empty()),
    ))
}

pub async fn update_producto(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductoRequest,
) -> AppResult<ApiResponse<Producto>> {
    ensure_admin(user)?;

    let producto = Productos::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(precio) = payload.precio {
        validate_precio(precio)?;
    }
    if let Some(categoria_id) = payload.categoria_id {
        if Categorias::find_by_id(categoria_id)
            .one(&state.orm)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "categoria {categoria_id} does not exist"
            )));
        }
    }

    let nombre = payload.nombre.unwrap_or(producto.nombre.clone());
    let precio = payload.precio.unwrap_or(producto.precio);
    let categoria_id = payload.categoria_id.unwrap_or(producto.categoria_id);

    let mut active: ProductoActive = producto.into();
    active.nombre = Set(nombre);
    active.precio = Set(precio);
    active.categoria_id = Set(categoria_id);
    let producto = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Producto actualizado",
        producto_from_entity(producto),
        Some(Meta::empty()),
    ))
}

pub async fn delete_producto(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Productos::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Producto eliminado",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn producto_from_entity(model: ProductoModel) -> Producto {
    Producto {
        id: model.id,
        nombre: model.nombre,
        precio: model.precio,
        categoria_id: model.categoria_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
