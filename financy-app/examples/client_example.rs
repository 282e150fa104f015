//! Client example walking through a full budgeting session against a local server.
//!
//! Run with: cargo run -p financy-app --example client_example

use std::net::SocketAddr;
use std::sync::Arc;

use financy_client::FinancyClient;
use financy_hex::{Services, inbound::HttpServer};
use financy_repo::{Argon2Hasher, JwtTokenService, build_repo};
use financy_types::{CreateTransactionInput, Patch, TransactionType, UpdateTransactionInput};
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("financy.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    let repo = build_repo(&db_url).await?;
    let tokens = JwtTokenService::new("example-secret")?;
    let server = HttpServer::new(Services::new(repo, Arc::new(Argon2Hasher), Arc::new(tokens)));

    tokio::spawn(async move {
        if let Err(e) = server.serve(listener).await {
            eprintln!("server stopped: {e}");
        }
    });

    let client = FinancyClient::new(format!("http://{addr}"));

    println!("✅ Server health: {}", client.health().await?);

    let response = client.me().await;
    println!("✅ Anonymous `me` rejected: {}", response.unwrap_err());

    let auth = client.signup("Alice", "alice@example.com", "secret1").await?;
    println!("✅ Signed up {} ({})", auth.user.name, auth.user.email);

    let client = client.with_token(auth.token);

    let food = client.create_category("Food").await?;
    let salary = client.create_category("Salary").await?;
    println!("✅ Created categories: {}, {}", food.name, salary.name);

    let lunch = client
        .create_transaction(&CreateTransactionInput {
            title: "Lunch".into(),
            amount: 20.5,
            transaction_type: TransactionType::Expense,
            date: "2026-02-28".into(),
            notes: Some("with the team".into()),
            category_id: Some(food.id.to_string()),
        })
        .await?;
    println!("✅ Recorded {} {} on {}", lunch.title, lunch.amount, lunch.date);

    client
        .create_transaction(&CreateTransactionInput {
            title: "February pay".into(),
            amount: 3200.0,
            transaction_type: TransactionType::Income,
            date: "2026-02-27".into(),
            notes: None,
            category_id: Some(salary.id.to_string()),
        })
        .await?;

    let edited = client
        .update_transaction(&UpdateTransactionInput {
            id: lunch.id.to_string(),
            amount: Some(22.0),
            notes: Patch::Null,
            ..Default::default()
        })
        .await?;
    println!("✅ Edited lunch: amount={} notes={:?}", edited.amount, edited.notes);

    let deleted = client.delete_category(&food.id.to_string()).await?;
    println!("✅ Deleted category Food: {deleted}");

    for tx in client.list_transactions().await? {
        let category = tx.category.map(|c| c.name).unwrap_or_else(|| "-".into());
        println!(
            "   {} {:>8.2} {:<7} {:<14} {}",
            tx.date.date_naive(),
            tx.amount,
            tx.transaction_type,
            tx.title,
            category
        );
    }

    let err = client.create_category("Salary").await.unwrap_err();
    println!("✅ Duplicate category rejected: {err}");

    Ok(())
}
