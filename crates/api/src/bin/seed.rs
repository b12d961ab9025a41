//! Seed the administrative API user.
//!
//! Idempotent: an existing user with the same name is left untouched.
//!
//! | Env Var               | Default             |
//! |-----------------------|---------------------|
//! | `DATABASE_URL`        | required            |
//! | `SEED_ADMIN_USERNAME` | `admin@example.com` |
//! | `SEED_ADMIN_PASSWORD` | `Admin@123`         |

use anyhow::Context;
use carbase_api::auth::password::hash_password;
use carbase_db::models::user::CreateUser;
use carbase_db::repositories::UserRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carbase_seed=info,carbase_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let username =
        std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123".into());

    let pool = carbase_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    carbase_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;
    let input = CreateUser {
        username: username.clone(),
        password_hash,
    };

    match UserRepo::create_if_absent(&pool, &input)
        .await
        .context("Failed to insert admin user")?
    {
        Some(user) => tracing::info!(user_id = user.id, %username, "Admin user seeded"),
        None => tracing::info!(%username, "Admin user already present"),
    }

    Ok(())
}
