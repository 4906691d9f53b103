use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    entity::categorias::{
        ActiveModel as CategoriaActive, Column as CategoriaCol, Entity as Categorias,
        Model as CategoriaModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Categoria,
    response::{ApiResponse, Meta},
    routes::categorias::{CategoriaList, CreateCategoriaRequest, UpdateCategoriaRequest},
    state::AppState,
};

pub async fn list_categorias(state: &AppState) -> AppResult<ApiResponse<CategoriaList>> {
    let items = Categorias::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(categoria_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Categorias",
        CategoriaList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_categoria(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Categoria>> {
    let categoria = Categorias::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Categoria",
        categoria_from_entity(categoria),
        None,
    ))
}

pub async fn create_categoria(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoriaRequest,
) -> AppResult<ApiResponse<Categoria>> {
    ensure_admin(user)?;

    let taken = Categorias::find()
        .filter(CategoriaCol::Nombre.eq(payload.nombre.clone()))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::Validation(format!(
            "categoria '{}' already exists",
            payload.nombre
        )));
    }

    let categoria = CategoriaActive {
        id: Set(Uuid::new_v4()),
        nombre: Set(payload.nombre),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Categoria creada",
        categoria_from_entity(categoria),
        Some(Meta::empty()),
    ))
}

pub async fn update_categoria(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoriaRequest,
) -> AppResult<ApiResponse<Categoria>> {
    ensure_admin(user)?;

    let categoria = Categorias::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoriaActive = categoria.into();
    active.nombre = Set(payload.nombre);
    let categoria = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Categoria actualizada",
        categoria_from_entity(categoria),
        Some(Meta::empty()),
    ))
}

pub async fn delete_categoria(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Categorias::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Categoria eliminada",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn categoria_from_entity(model: CategoriaModel) -> Categoria {
    Categoria {
        id: model.id,
        nombre: model.nombre,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
