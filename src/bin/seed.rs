use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use axum_pos_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categorias::{ActiveModel as CategoriaActive, Column as CategoriaCol, Entity as Categorias},
        mesas::{ActiveModel as MesaActive, Column as MesaCol, Entity as Mesas},
        productos::{ActiveModel as ProductoActive, Column as ProductoCol, Entity as Productos},
        settings::{ActiveModel as SettingActive, Entity as Settings},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    middleware::auth::{ROLE_ADMIN, ROLE_CAMARERO},
    services::configuracion_service::{GLOBAL_CURRENCY_KEY, GLOBAL_IVA_KEY},
    services::mesa_service::ESTADO_LIBRE,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    ensure_user(&orm, "Admin", "admin@example.com", "admin123", ROLE_ADMIN).await?;
    ensure_user(
        &orm,
        "Camarero",
        "camarero@example.com",
        "camarero123",
        ROLE_CAMARERO,
    )
    .await?;

    ensure_setting(&orm, GLOBAL_IVA_KEY, "0.21").await?;
    ensure_setting(&orm, GLOBAL_CURRENCY_KEY, "EUR").await?;

    seed_catalog(&orm).await?;
    seed_mesas(&orm, 8).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let existing = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(())
}

async fn ensure_setting(orm: &DatabaseConnection, key: &str, value: &str) -> anyhow::Result<()> {
    if Settings::find_by_id(key).one(orm).await?.is_none() {
        SettingActive {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        }
        .insert(orm)
        .await?;
        println!("Ensured setting {key}={value}");
    }
    Ok(())
}

async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = [
        ("Bebidas", vec![("Caña", 250_i64), ("Agua mineral", 180)]),
        (
            "Comidas",
            vec![
                ("Tortilla española", 550),
                ("Bocadillo de calamares", 650),
            ],
        ),
        ("Postres", vec![("Tarta de queso", 420), ("Café solo", 150)]),
    ];

    for (categoria_nombre, productos) in catalog {
        let categoria = match Categorias::find()
            .filter(CategoriaCol::Nombre.eq(categoria_nombre))
            .one(orm)
            .await?
        {
            Some(c) => c,
            None => {
                CategoriaActive {
                    id: Set(Uuid::new_v4()),
                    nombre: Set(categoria_nombre.to_string()),
                    created_at: NotSet,
                }
                .insert(orm)
                .await?
            }
        };

        for (nombre, cents) in productos {
            let exists = Productos::find()
                .filter(ProductoCol::Nombre.eq(nombre))
                .one(orm)
                .await?;
            if exists.is_none() {
                ProductoActive {
                    id: Set(Uuid::new_v4()),
                    nombre: Set(nombre.to_string()),
                    precio: Set(Decimal::new(cents, 2)),
                    categoria_id: Set(categoria.id),
                    created_at: NotSet,
                }
                .insert(orm)
                .await?;
            }
        }
    }

    println!("Seeded catalog");
    Ok(())
}

async fn seed_mesas(orm: &DatabaseConnection, total: i32) -> anyhow::Result<()> {
    for numero in 1..=total {
        let exists = Mesas::find()
            .filter(MesaCol::Numero.eq(numero))
            .one(orm)
            .await?;
        if exists.is_none() {
            MesaActive {
                id: Set(Uuid::new_v4()),
                numero: Set(numero),
                estado: Set(ESTADO_LIBRE.to_string()),
                created_at: NotSet,
            }
            .insert(orm)
            .await?;
        }
    }

    println!("Seeded mesas 1..={total}");
    Ok(())
}
