pub mod auth_service;
pub mod categoria_service;
pub mod comanda_service;
pub mod configuracion_service;
pub mod mesa_service;
pub mod producto_service;
