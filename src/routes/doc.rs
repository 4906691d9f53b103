use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        comandas::{
            ComandaList, ComandaView, ComandaWithDetalles, CreateComandaRequest, DetalleInput,
            PagarComandaRequest, PagoResult, UpdateComandaRequest,
        },
        configuracion::{IvaConfig, MonedaConfig, SetIvaRequest, SetMonedaRequest},
        mesas::{CreateMesaRequest, MesaList, TotalMesasRequest, UpdateMesaRequest},
    },
    models::{Categoria, Comanda, ComandaDetalle, Mesa, Producto, Setting, User},
    response::{ApiResponse, Meta},
    routes::{auth, categorias, comandas, configuracion, health, mesas, params, productos},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        comandas::list_comandas,
        comandas::get_comanda,
        comandas::create_comanda,
        comandas::update_comanda,
        comandas::pagar_comanda,
        comandas::delete_comanda,
        mesas::list_mesas,
        mesas::get_mesa,
        mesas::create_mesa,
        mesas::update_mesa,
        mesas::delete_mesa,
        configuracion::get_iva,
        configuracion::set_iva,
        configuracion::get_moneda,
        configuracion::set_moneda,
        configuracion::set_total_mesas,
        productos::list_productos,
        productos::get_producto,
        productos::create_producto,
        productos::update_producto,
        productos::delete_producto,
        categorias::list_categorias,
        categorias::get_categoria,
        categorias::create_categoria,
        categorias::update_categoria,
        categorias::delete_categoria
    ),
    components(
        schemas(
            User,
            Categoria,
            Producto,
            Mesa,
            Comanda,
            ComandaDetalle,
            Setting,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            DetalleInput,
            CreateComandaRequest,
            UpdateComandaRequest,
            PagarComandaRequest,
            ComandaWithDetalles,
            ComandaView,
            PagoResult,
            ComandaList,
            CreateMesaRequest,
            UpdateMesaRequest,
            TotalMesasRequest,
            MesaList,
            IvaConfig,
            SetIvaRequest,
            MonedaConfig,
            SetMonedaRequest,
            productos::CreateProductoRequest,
            productos::UpdateProductoRequest,
            productos::ProductoList,
            categorias::CreateCategoriaRequest,
            categorias::UpdateCategoriaRequest,
            categorias::CategoriaList,
            params::Pagination,
            params::ComandaListQuery,
            params::ProductoQuery,
            Meta,
            ApiResponse<Comanda>,
            ApiResponse<ComandaView>,
            ApiResponse<ComandaWithDetalles>,
            ApiResponse<PagoResult>,
            ApiResponse<MesaList>,
            ApiResponse<IvaConfig>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Comandas", description = "Comanda lifecycle endpoints"),
        (name = "Mesas", description = "Mesa endpoints"),
        (name = "Configuracion", description = "Global settings endpoints"),
        (name = "Productos", description = "Producto endpoints"),
        (name = "Categorias", description = "Categoria endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
