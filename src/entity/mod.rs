pub mod categorias;
pub mod comanda_detalles;
pub mod comandas;
pub mod mesas;
pub mod productos;
pub mod settings;
pub mod users;

pub use categorias::Entity as Categorias;
pub use comanda_detalles::Entity as ComandaDetalles;
pub use comandas::Entity as Comandas;
pub use mesas::Entity as Mesas;
pub use productos::Entity as Productos;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
