//! Financy CLI
//!
//! Command-line interface for the Financy API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use financy_client::FinancyClient;
use financy_types::{CreateTransactionInput, Patch, TransactionType, UpdateTransactionInput};

#[derive(Parser)]
#[command(name = "financy")]
#[command(author, version, about = "Financy API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Financy API
    #[arg(long, env = "FINANCY_API_URL", default_value = "http://localhost:4000")]
    api_url: String,

    /// Bearer token returned by `signup` or `login`
    #[arg(long, env = "FINANCY_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Create an account and print its token
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print a fresh token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the authenticated user
    Me,
    /// Category operations
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Transaction operations
    Transaction {
        #[command(subcommand)]
        action: TransactionCommands,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List your categories, newest first
    List,
    /// Create a category
    Create {
        /// Category name (2-50 characters)
        name: String,
    },
    /// Rename a category
    Rename {
        /// Category ID (UUID)
        id: String,
        /// New name
        name: String,
    },
    /// Delete a category; its transactions become uncategorized
    Delete {
        /// Category ID (UUID)
        id: String,
    },
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// List your transactions, newest date first
    List,
    /// Record an income or expense
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        amount: f64,
        /// INCOME or EXPENSE
        #[arg(long = "type")]
        kind: TransactionType,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        date: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Change some fields of a transaction
    Edit {
        /// Transaction ID (UUID)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long)]
        clear_notes: bool,
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,
        #[arg(long)]
        clear_category: bool,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID (UUID)
        id: String,
    },
}

fn patch(value: Option<String>, clear: bool) -> Patch<String> {
    match (value, clear) {
        (_, true) => Patch::Null,
        (Some(v), false) => Patch::Value(v),
        (None, false) => Patch::Absent,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = FinancyClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Signup {
            name,
            email,
            password,
        } => {
            let payload = client.signup(&name, &email, &password).await?;
            print_json(&payload)?;
        }

        Commands::Login { email, password } => {
            let payload = client.login(&email, &password).await?;
            print_json(&payload)?;
        }

        Commands::Me => print_json(&client.me().await?)?,

        Commands::Category { action } => match action {
            CategoryCommands::List => print_json(&client.list_categories().await?)?,
            CategoryCommands::Create { name } => {
                print_json(&client.create_category(&name).await?)?
            }
            CategoryCommands::Rename { id, name } => {
                print_json(&client.update_category(&id, &name).await?)?
            }
            CategoryCommands::Delete { id } => {
                print_json(&client.delete_category(&id).await?)?
            }
        },

        Commands::Transaction { action } => match action {
            TransactionCommands::List => print_json(&client.list_transactions().await?)?,
            TransactionCommands::Add {
                title,
                amount,
                kind,
                date,
                notes,
                category,
            } => {
                let input = CreateTransactionInput {
                    title,
                    amount,
                    transaction_type: kind,
                    date,
                    notes,
                    category_id: category,
                };
                print_json(&client.create_transaction(&input).await?)?;
            }
            TransactionCommands::Edit {
                id,
                title,
                amount,
                kind,
                date,
                notes,
                clear_notes,
                category,
                clear_category,
            } => {
                let input = UpdateTransactionInput {
                    id,
                    title,
                    amount,
                    transaction_type: kind,
                    date,
                    notes: patch(notes, clear_notes),
                    category_id: patch(category, clear_category),
                };
                print_json(&client.update_transaction(&input).await?)?;
            }
            TransactionCommands::Delete { id } => {
                print_json(&client.delete_transaction(&id).await?)?
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_edit_flags_build_patches() {
        let cli = Cli::try_parse_from([
            "financy",
            "transaction",
            "edit",
            "abc",
            "--type",
            "income",
            "--clear-notes",
        ])
        .unwrap();

        let Commands::Transaction {
            action:
                TransactionCommands::Edit {
                    kind,
                    notes,
                    clear_notes,
                    category,
                    clear_category,
                    ..
                },
        } = cli.command
        else {
            panic!("expected transaction edit");
        };

        assert_eq!(kind, Some(TransactionType::Income));
        assert_eq!(patch(notes, clear_notes), Patch::Null);
        assert_eq!(patch(category, clear_category), Patch::Absent);
    }
}
