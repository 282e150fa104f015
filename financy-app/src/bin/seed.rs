//! Writes the demo user, categories and transactions into `DATABASE_URL`.

use financy_repo::{Argon2Hasher, DEFAULT_DATABASE_URL, build_repo, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let repo = build_repo(&database_url).await?;
    let summary = seed(&repo, &Argon2Hasher).await?;

    println!("Seed completed.");
    println!("User: {}", summary.user.email);
    Ok(())
}
