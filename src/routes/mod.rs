use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod categorias;
pub mod comandas;
pub mod configuracion;
pub mod doc;
pub mod health;
pub mod mesas;
pub mod params;
pub mod productos;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/comandas", comandas::router())
        .nest("/mesas", mesas::router())
        .nest("/productos", productos::router())
        .nest("/categorias", categorias::router())
        .nest("/configuracion", configuracion::router())
}
