use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    billing,
    dto::comandas::{
        ComandaList, ComandaView, ComandaWithDetalles, CreateComandaRequest, DetalleInput,
        PagarComandaRequest, PagoResult, UpdateComandaRequest,
    },
    entity::{
        comanda_detalles::{
            ActiveModel as DetalleActive, Column as DetalleCol, Entity as ComandaDetalles,
            Model as DetalleModel,
        },
        comandas::{
            ActiveModel as ComandaActive, Column as ComandaCol, Entity as Comandas,
            Model as ComandaModel,
        },
        mesas::Model as MesaModel,
        Mesas, Productos, Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Comanda, ComandaDetalle, Mesa},
    response::{ApiResponse, Meta},
    routes::params::{ComandaListQuery, SortOrder},
    services::{configuracion_service::GlobalConfig, mesa_service},
    state::AppState,
};

pub const ESTADO_ABIERTA: &str = "abierta";
pub const ESTADO_CERRADA: &str = "cerrada";

fn validate_estado(estado: &str) -> Result<(), AppError> {
    const VALID: [&str; 2] = [ESTADO_ABIERTA, ESTADO_CERRADA];
    if VALID.contains(&estado) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid comanda estado".into()))
    }
}

/// A detalle priced against the current catalog, before it is written.
/// `precio_unitario` is a snapshot; later price changes never touch it.
struct PricedDetalle {
    producto_id: Uuid,
    cantidad: i32,
    precio_unitario: Decimal,
    total: Decimal,
}

/// Price every requested line against the catalog and sum the subtotal.
/// Read-only, so create/update can fail fast before writing anything.
async fn price_detalles<C: ConnectionTrait>(
    conn: &C,
    productos: &[DetalleInput],
) -> AppResult<(Vec<PricedDetalle>, Decimal)> {
    let mut priced = Vec::with_capacity(productos.len());
    let mut subtotal = Decimal::ZERO;

    for input in productos {
        if input.cantidad < 1 {
            return Err(AppError::Validation("cantidad must be at least 1".into()));
        }
        let producto = Productos::find_by_id(input.producto_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("producto {} does not exist", input.producto_id))
            })?;

        let total = billing::line_total(producto.precio, input.cantidad);
        subtotal += total;
        priced.push(PricedDetalle {
            producto_id: producto.id,
            cantidad: input.cantidad,
            precio_unitario: producto.precio,
            total,
        });
    }

    Ok((priced, subtotal))
}

async fn insert_detalles<C: ConnectionTrait>(
    conn: &C,
    comanda_id: Uuid,
    priced: Vec<PricedDetalle>,
) -> AppResult<Vec<ComandaDetalle>> {
    let mut detalles = Vec::with_capacity(priced.len());
    for line in priced {
        let detalle = DetalleActive {
            id: Set(Uuid::new_v4()),
            comanda_id: Set(comanda_id),
            producto_id: Set(line.producto_id),
            cantidad: Set(line.cantidad),
            precio_unitario: Set(line.precio_unitario),
            total: Set(line.total),
        }
        .insert(conn)
        .await?;
        detalles.push(detalle_from_entity(detalle));
    }
    Ok(detalles)
}

async fn subtotal_of_persisted<C: ConnectionTrait>(
    conn: &C,
    comanda_id: Uuid,
) -> AppResult<(Vec<DetalleModel>, Decimal)> {
    let detalles = ComandaDetalles::find()
        .filter(DetalleCol::ComandaId.eq(comanda_id))
        .all(conn)
        .await?;
    let subtotal = detalles.iter().map(|d| d.total).sum();
    Ok((detalles, subtotal))
}

pub async fn list_comandas(
    state: &AppState,
    query: ComandaListQuery,
) -> AppResult<ApiResponse<ComandaList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(estado) = query.estado.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ComandaCol::Estado.eq(estado.clone()));
    }
    if let Some(mesa_id) = query.mesa_id {
        condition = condition.add(ComandaCol::MesaId.eq(mesa_id));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Comandas::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(ComandaCol::Fecha),
        SortOrder::Desc => finder.order_by_desc(ComandaCol::Fecha),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(comanda_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Comandas",
        ComandaList { items },
        Some(meta),
    ))
}

/// Read view. The subtotal is recomputed from the persisted detalles rather
/// than trusted from `total_con_iva`, and the rate follows the display
/// precedence: a cerrada comanda keeps its settled rate.
pub async fn get_comanda(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ComandaView>> {
    let comanda = Comandas::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let (detalles, subtotal) = subtotal_of_persisted(&state.orm, comanda.id).await?;

    let mesa = match comanda.mesa_id {
        Some(mesa_id) => Mesas::find_by_id(mesa_id).one(&state.orm).await?,
        None => None,
    };

    let global = GlobalConfig::load(&state.orm).await?;
    let cerrada = comanda.estado == ESTADO_CERRADA;
    let iva = billing::display_iva(cerrada, comanda.iva, global.iva);
    let total_con_iva = billing::total_con_iva(subtotal, iva);

    Ok(ApiResponse::success(
        "Comanda",
        ComandaView {
            comanda: comanda_from_entity(comanda),
            detalles: detalles.into_iter().map(detalle_from_entity).collect(),
            mesa: mesa.map(mesa_from_entity),
            subtotal,
            iva,
            total_con_iva,
        },
        Some(Meta::empty()),
    ))
}

pub async fn create_comanda(
    state: &AppState,
    payload: CreateComandaRequest,
) -> AppResult<ApiResponse<ComandaWithDetalles>> {
    validate_estado(&payload.estado)?;
    if let Some(iva) = payload.iva {
        billing::validate_iva(iva)?;
    }

    let txn = state.orm.begin().await?;

    if Users::find_by_id(payload.user_id).one(&txn).await?.is_none() {
        return Err(AppError::Validation(format!(
            "user {} does not exist",
            payload.user_id
        )));
    }
    if let Some(mesa_id) = payload.mesa_id {
        if Mesas::find_by_id(mesa_id).one(&txn).await?.is_none() {
            return Err(AppError::Validation(format!("mesa {mesa_id} does not exist")));
        }
    }

    let (priced, subtotal) = price_detalles(&txn, &payload.productos).await?;

    let global = GlobalConfig::load(&txn).await?;
    let iva = billing::resolve_iva(payload.iva, None, global.iva);
    let total_con_iva = billing::total_con_iva(subtotal, iva);

    let comanda = ComandaActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        fecha: Set(payload.fecha.into()),
        estado: Set(payload.estado),
        iva: Set(Some(iva)),
        total_con_iva: Set(Some(total_con_iva)),
        mesa_id: Set(payload.mesa_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let detalles = insert_detalles(&txn, comanda.id, priced).await?;

    // Occupancy is derived from open comandas; a comanda created directly as
    // cerrada must not occupy its mesa, so re-derive instead of flipping.
    if let Some(mesa_id) = comanda.mesa_id {
        mesa_service::reconcile_mesa(&txn, mesa_id).await?;
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Comanda creada",
        ComandaWithDetalles {
            comanda: comanda_from_entity(comanda),
            detalles,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_comanda(
    state: &AppState,
    id: Uuid,
    payload: UpdateComandaRequest,
) -> AppResult<ApiResponse<ComandaWithDetalles>> {
    if let Some(estado) = payload.estado.as_deref() {
        validate_estado(estado)?;
    }
    if let Some(iva) = payload.iva {
        billing::validate_iva(iva)?;
    }

    let txn = state.orm.begin().await?;

    let comanda = Comandas::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let old_mesa_id = comanda.mesa_id;

    if let Some(user_id) = payload.user_id {
        if Users::find_by_id(user_id).one(&txn).await?.is_none() {
            return Err(AppError::Validation(format!("user {user_id} does not exist")));
        }
    }
    let new_mesa_id = payload.mesa_id;
    if let Some(mesa_id) = new_mesa_id {
        if Mesas::find_by_id(mesa_id).one(&txn).await?.is_none() {
            return Err(AppError::Validation(format!("mesa {mesa_id} does not exist")));
        }
    }

    // A supplied line set replaces the old one wholesale; detalles are never
    // patched individually.
    let (detalles, subtotal) = match payload.productos.as_deref() {
        Some(productos) => {
            let (priced, subtotal) = price_detalles(&txn, productos).await?;
            ComandaDetalles::delete_many()
                .filter(DetalleCol::ComandaId.eq(comanda.id))
                .exec(&txn)
                .await?;
            let detalles = insert_detalles(&txn, comanda.id, priced).await?;
            (detalles, subtotal)
        }
        None => {
            let (existing, subtotal) = subtotal_of_persisted(&txn, comanda.id).await?;
            (
                existing.into_iter().map(detalle_from_entity).collect(),
                subtotal,
            )
        }
    };

    let global = GlobalConfig::load(&txn).await?;
    let iva = billing::resolve_iva(payload.iva, comanda.iva, global.iva);
    let total_con_iva = billing::total_con_iva(subtotal, iva);

    let user_id = payload.user_id.unwrap_or(comanda.user_id);
    let estado = payload
        .estado
        .clone()
        .unwrap_or_else(|| comanda.estado.clone());

    let mut active: ComandaActive = comanda.into();
    active.user_id = Set(user_id);
    active.estado = Set(estado);
    active.mesa_id = Set(new_mesa_id);
    active.iva = Set(Some(iva));
    active.total_con_iva = Set(Some(total_con_iva));
    active.updated_at = Set(Utc::now().into());
    let comanda = active.update(&txn).await?;

    // Every mesa this update could have touched gets its occupancy
    // re-derived: the one left behind, the one newly referenced, or the one
    // still attached when the estado flipped.
    let mut touched: Vec<Uuid> = old_mesa_id.into_iter().chain(new_mesa_id).collect();
    touched.dedup();
    for mesa_id in touched {
        mesa_service::reconcile_mesa(&txn, mesa_id).await?;
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Comanda actualizada",
        ComandaWithDetalles {
            comanda: comanda_from_entity(comanda),
            detalles,
        },
        Some(Meta::empty()),
    ))
}

/// Close a comanda. The rate is mandatory here, the subtotal comes from the
/// persisted detalles, and a comanda that is already cerrada is rejected
/// without touching its stored rate or total.
pub async fn pagar_comanda(
    state: &AppState,
    id: Uuid,
    payload: PagarComandaRequest,
) -> AppResult<ApiResponse<PagoResult>> {
    billing::validate_iva(payload.iva)?;

    let txn = state.orm.begin().await?;

    let comanda = Comandas::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if comanda.estado == ESTADO_CERRADA {
        return Err(AppError::AlreadyClosed);
    }

    let (_, subtotal) = subtotal_of_persisted(&txn, comanda.id).await?;
    let total_con_iva = billing::total_con_iva(subtotal, payload.iva);

    let mesa_id = comanda.mesa_id;
    let mut active: ComandaActive = comanda.into();
    active.estado = Set(ESTADO_CERRADA.to_string());
    active.iva = Set(Some(payload.iva));
    active.total_con_iva = Set(Some(total_con_iva));
    active.updated_at = Set(Utc::now().into());
    let comanda = active.update(&txn).await?;

    if let Some(mesa_id) = mesa_id {
        mesa_service::reconcile_mesa(&txn, mesa_id).await?;
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Comanda pagada",
        PagoResult {
            subtotal,
            iva: payload.iva,
            total_con_iva,
            comanda: comanda_from_entity(comanda),
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_comanda(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;

    let comanda = Comandas::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let mesa_id = comanda.mesa_id;

    ComandaDetalles::delete_many()
        .filter(DetalleCol::ComandaId.eq(comanda.id))
        .exec(&txn)
        .await?;
    Comandas::delete_by_id(comanda.id).exec(&txn).await?;

    if let Some(mesa_id) = mesa_id {
        mesa_service::reconcile_mesa(&txn, mesa_id).await?;
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Comanda eliminada",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn comanda_from_entity(model: ComandaModel) -> Comanda {
    Comanda {
        id: model.id,
        user_id: model.user_id,
        fecha: model.fecha.with_timezone(&Utc),
        estado: model.estado,
        iva: model.iva,
        total_con_iva: model.total_con_iva,
        mesa_id: model.mesa_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn detalle_from_entity(model: DetalleModel) -> ComandaDetalle {
    ComandaDetalle {
        id: model.id,
        comanda_id: model.comanda_id,
        producto_id: model.producto_id,
        cantidad: model.cantidad,
        precio_unitario: model.precio_unitario,
        total: model.total,
    }
}

fn mesa_from_entity(model: MesaModel) -> Mesa {
    Mesa {
        id: model.id,
        numero: model.numero,
        estado: model.estado,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
