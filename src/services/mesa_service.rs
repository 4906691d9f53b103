use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::mesas::{CreateMesaRequest, MesaList, TotalMesasRequest, UpdateMesaRequest},
    entity::{
        comandas::Column as ComandaCol,
        mesas::{ActiveModel as MesaActive, Column as MesaCol, Entity as Mesas, Model as MesaModel},
        Comandas,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Mesa,
    response::{ApiResponse, Meta},
    services::comanda_service::ESTADO_ABIERTA,
    state::AppState,
};

pub const ESTADO_LIBRE: &str = "libre";
pub const ESTADO_OCUPADA: &str = "ocupada";

fn validate_estado(estado: &str) -> Result<(), AppError> {
    const VALID: [&str; 2] = [ESTADO_LIBRE, ESTADO_OCUPADA];
    if VALID.contains(&estado) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid mesa estado".into()))
    }
}

/// Re-derive a mesa's occupancy from its open comandas.
///
/// A mesa is ocupada iff at least one comanda with estado 'abierta' still
/// references it. Idempotent; safe to call from inside any lifecycle
/// transaction. A dangling mesa id is a no-op.
pub async fn reconcile_mesa<C: ConnectionTrait>(conn: &C, mesa_id: Uuid) -> AppResult<()> {
    let mesa = match Mesas::find_by_id(mesa_id).one(conn).await? {
        Some(m) => m,
        None => return Ok(()),
    };

    let abiertas = Comandas::find()
        .filter(
            Condition::all()
                .add(ComandaCol::MesaId.eq(mesa_id))
                .add(ComandaCol::Estado.eq(ESTADO_ABIERTA)),
        )
        .count(conn)
        .await?;

    let target = if abiertas > 0 {
        ESTADO_OCUPADA
    } else {
        ESTADO_LIBRE
    };
    if mesa.estado != target {
        let mut active: MesaActive = mesa.into();
        active.estado = Set(target.to_string());
        active.update(conn).await?;
    }

    Ok(())
}

pub async fn list_mesas(state: &AppState) -> AppResult<ApiResponse<MesaList>> {
    let items = Mesas::find()
        .order_by_asc(MesaCol::Numero)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(mesa_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Mesas",
        MesaList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_mesa(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Mesa>> {
    let mesa = Mesas::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Mesa", mesa_from_entity(mesa), None))
}

pub async fn create_mesa(
    state: &AppState,
    payload: CreateMesaRequest,
) -> AppResult<ApiResponse<Mesa>> {
    if payload.numero < 1 {
        return Err(AppError::Validation("numero must be at least 1".into()));
    }
    let estado = payload.estado.unwrap_or_else(|| ESTADO_LIBRE.to_string());
    validate_estado(&estado)?;

    let taken = Mesas::find()
        .filter(MesaCol::Numero.eq(payload.numero))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::Validation(format!(
            "mesa numero {} already exists",
            payload.numero
        )));
    }

    let mesa = MesaActive {
        id: Set(Uuid::new_v4()),
        numero: Set(payload.numero),
        estado: Set(estado),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Mesa creada",
        mesa_from_entity(mesa),
        Some(Meta::empty()),
    ))
}

pub async fn update_mesa(
    state: &AppState,
    id: Uuid,
    payload: UpdateMesaRequest,
) -> AppResult<ApiResponse<Mesa>> {
    let mesa = Mesas::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(numero) = payload.numero {
        if numero < 1 {
            return Err(AppError::Validation("numero must be at least 1".into()));
        }
        let taken = Mesas::find()
            .filter(
                Condition::all()
                    .add(MesaCol::Numero.eq(numero))
                    .add(MesaCol::Id.ne(mesa.id)),
            )
            .count(&state.orm)
            .await?;
        if taken > 0 {
            return Err(AppError::Validation(format!(
                "mesa numero {numero} already exists"
            )));
        }
    }
    if let Some(estado) = payload.estado.as_deref() {
        validate_estado(estado)?;
    }

    let numero = payload.numero.unwrap_or(mesa.numero);
    let estado = payload.estado.clone().unwrap_or_else(|| mesa.estado.clone());

    let mut active: MesaActive = mesa.into();
    active.numero = Set(numero);
    active.estado = Set(estado);
    let mesa = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Mesa actualizada",
        mesa_from_entity(mesa),
        Some(Meta::empty()),
    ))
}

pub async fn delete_mesa(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let mesa = Mesas::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if mesa.estado == ESTADO_OCUPADA {
        return Err(AppError::Conflict(format!(
            "mesa {} is ocupada and cannot be deleted",
            mesa.numero
        )));
    }

    Mesas::delete_by_id(mesa.id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Mesa eliminada",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Resize the numbered mesa set: grow with fresh numbers, shrink from the
/// highest number down. Shrinking refuses while any mesa on the chopping
/// block is still ocupada.
pub async fn set_total_mesas(
    state: &AppState,
    user: &AuthUser,
    payload: TotalMesasRequest,
) -> AppResult<ApiResponse<MesaList>> {
    ensure_admin(user)?;
    if payload.total_mesas < 0 {
        return Err(AppError::Validation("total_mesas must be at least 0".into()));
    }
    let new_total = payload.total_mesas as usize;

    let txn = state.orm.begin().await?;

    let current = Mesas::find()
        .order_by_asc(MesaCol::Numero)
        .all(&txn)
        .await?;

    let message = if new_total > current.len() {
        let max_numero = current.last().map(|m| m.numero).unwrap_or(0);
        for offset in 1..=(new_total - current.len()) as i32 {
            MesaActive {
                id: Set(Uuid::new_v4()),
                numero: Set(max_numero + offset),
                estado: Set(ESTADO_LIBRE.to_string()),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
        "Mesas añadidas"
    } else if new_total < current.len() {
        let to_delete = &current[new_total..];
        let ocupadas: Vec<String> = to_delete
            .iter()
            .filter(|m| m.estado == ESTADO_OCUPADA)
            .map(|m| m.numero.to_string())
            .collect();
        if !ocupadas.is_empty() {
            return Err(AppError::Conflict(format!(
                "mesas {} are ocupadas and cannot be removed",
                ocupadas.join(", ")
            )));
        }
        let ids: Vec<Uuid> = to_delete.iter().map(|m| m.id).collect();
        Mesas::delete_many()
            .filter(MesaCol::Id.is_in(ids))
            .exec(&txn)
            .await?;
        "Mesas eliminadas"
    } else {
        "Sin cambios"
    };

    txn.commit().await?;

    // Return the resulting set so clients can refresh in one round trip.
    let items = Mesas::find()
        .order_by_asc(MesaCol::Numero)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(mesa_from_entity)
        .collect();

    Ok(ApiResponse::success(
        message,
        MesaList { items },
        Some(Meta::empty()),
    ))
}

fn mesa_from_entity(model: MesaModel) -> Mesa {
    Mesa {
        id: model.id,
        numero: model.numero,
        estado: model.estado,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
