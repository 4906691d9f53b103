use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use crate::{
    billing,
    dto::configuracion::{IvaConfig, MonedaConfig, SetIvaRequest, SetMonedaRequest},
    entity::settings::{ActiveModel as SettingActive, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const GLOBAL_IVA_KEY: &str = "global_iva";
pub const GLOBAL_CURRENCY_KEY: &str = "global_currency";

/// Global billing settings, loaded fresh for each lifecycle operation.
#[derive(Debug, Clone, Default)]
pub struct GlobalConfig {
    pub iva: Option<Decimal>,
    pub currency: Option<String>,
}

impl GlobalConfig {
    pub async fn load<C: ConnectionTrait>(conn: &C) -> AppResult<Self> {
        let iva = get_value(conn, GLOBAL_IVA_KEY)
            .await?
            .and_then(|v| v.parse::<Decimal>().ok());
        let currency = get_value(conn, GLOBAL_CURRENCY_KEY).await?;
        Ok(Self { iva, currency })
    }
}

async fn get_value<C: ConnectionTrait>(conn: &C, key: &str) -> AppResult<Option<String>> {
    let setting = Settings::find_by_id(key).one(conn).await?;
    Ok(setting.map(|s| s.value))
}

async fn upsert<C: ConnectionTrait>(conn: &C, key: &str, value: String) -> AppResult<()> {
    match Settings::find_by_id(key).one(conn).await? {
        Some(existing) => {
            let mut active: SettingActive = existing.into();
            active.value = Set(value);
            active.update(conn).await?;
        }
        None => {
            SettingActive {
                key: Set(key.to_string()),
                value: Set(value),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

pub async fn get_iva(state: &AppState) -> AppResult<ApiResponse<IvaConfig>> {
    let config = GlobalConfig::load(&state.orm).await?;
    let iva = config.iva.unwrap_or(billing::DEFAULT_IVA);
    Ok(ApiResponse::success("IVA", IvaConfig { iva }, Some(Meta::empty())))
}

pub async fn set_iva(
    state: &AppState,
    user: &AuthUser,
    payload: SetIvaRequest,
) -> AppResult<ApiResponse<IvaConfig>> {
    ensure_admin(user)?;
    billing::validate_iva(payload.iva)?;

    upsert(&state.orm, GLOBAL_IVA_KEY, payload.iva.to_string()).await?;

    Ok(ApiResponse::success(
        "IVA configurado",
        IvaConfig { iva: payload.iva },
        Some(Meta::empty()),
    ))
}

pub async fn get_moneda(state: &AppState) -> AppResult<ApiResponse<MonedaConfig>> {
    let config = GlobalConfig::load(&state.orm).await?;
    let message = if config.currency.is_some() {
        "Moneda"
    } else {
        "Moneda no configurada"
    };
    Ok(ApiResponse::success(
        message,
        MonedaConfig {
            currency: config.currency,
        },
        Some(Meta::empty()),
    ))
}

pub async fn set_moneda(
    state: &AppState,
    user: &AuthUser,
    payload: SetMonedaRequest,
) -> AppResult<ApiResponse<MonedaConfig>> {
    ensure_admin(user)?;

    let currency = payload.currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation(
            "currency must be a 3-letter code".into(),
        ));
    }

    upsert(&state.orm, GLOBAL_CURRENCY_KEY, currency.clone()).await?;

    Ok(ApiResponse::success(
        "Moneda configurada",
        MonedaConfig {
            currency: Some(currency),
        },
        Some(Meta::empty()),
    ))
}
