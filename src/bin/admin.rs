//! CLI administration tool for smt-order-manager.
//!
//! # Usage
//!
//! ```bash
//! # Generate an API token and print the hash for API_TOKEN_HASHES
//! cargo run --bin admin -- token create
//!
//! # Hash an existing token
//! cargo run --bin admin -- token hash "my-token"
//!
//! # Check database connection and row counts
//! cargo run --bin admin -- db check
//!
//! # Apply migrations
//! cargo run --bin admin -- db migrate
//!
//! # Seed demo data into an empty database
//! cargo run --bin admin -- seed
//!
//! # Write an order's production snapshot to disk
//! cargo run --bin admin -- download 6f1c...e2 --out ./snapshots
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*`): required for `db`, `seed` and `download`
//! - `TOKEN_SIGNING_SECRET`: required for `token`

use smt_order_manager::application::clock::Clock;
use smt_order_manager::application::services::AuthService;
use smt_order_manager::config::{self, mask_connection_string};
use smt_order_manager::infrastructure::clock::SystemClock;
use smt_order_manager::infrastructure::persistence::PgCatalog;
use smt_order_manager::infrastructure::seed::{SeedOutcome, seed_demo_data};
use smt_order_manager::infrastructure::storage::Storage;
use smt_order_manager::state::AppState;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing smt-order-manager.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Seed demo components, boards and an order into an empty database
    Seed {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Write an order's production snapshot to a JSON file
    Download {
        order_id: Uuid,

        /// Target directory (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print the hash of an existing token
    Hash { token: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and show row counts
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Token { action } => {
            let secret = config
                .token_signing_secret
                .filter(|s| !s.is_empty())
                .context("TOKEN_SIGNING_SECRET must be set")?;
            handle_token_action(action, &secret)?
        }
        Commands::Db { action } => {
            let pool = connect(config.database_url.as_deref()).await?;
            handle_db_action(action, &pool).await?
        }
        Commands::Seed { yes } => {
            let pool = connect(config.database_url.as_deref()).await?;
            seed(pool, yes).await?
        }
        Commands::Download { order_id, out } => {
            let pool = connect(config.database_url.as_deref()).await?;
            download(pool, order_id, out).await?
        }
    }

    Ok(())
}

async fn connect(database_url: Option<&str>) -> Result<PgPool> {
    let url = database_url.context("DATABASE_URL must be set")?;
    PgPool::connect(url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(url)))
}

fn app_state(pool: PgPool) -> (AppState, Arc<dyn Clock>) {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::new(
        Storage::postgres(Arc::new(pool)),
        clock.clone(),
        AuthService::disabled(),
    );
    (state, clock)
}

fn handle_token_action(action: TokenAction, secret: &str) -> Result<()> {
    match action {
        TokenAction::Create { token, yes } => create_token(secret, token, yes),
        TokenAction::Hash { token } => {
            println!("{}", AuthService::hash_token(secret, &token));
            Ok(())
        }
    }
}

/// Creates a new API token.
///
/// The raw token is printed once. Only its HMAC goes into
/// `API_TOKEN_HASHES`; nothing is stored by this command.
fn create_token(secret: &str, token: Option<String>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token()?;
            println!("{}", "✨ Generated new token".green());
            generated
        }
    };

    println!();
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Print the hash for this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = AuthService::hash_token(secret, &token_value);

    println!();
    println!("{}", "Append this to API_TOKEN_HASHES:".bright_white());
    println!("  {}", token_hash.bright_green());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/orders",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
            println!();

            let (components, boards, orders) = PgCatalog::new(Arc::new(pool.clone()))
                .counts()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count rows: {}", e))?;

            println!("  Components: {}", components.to_string().bright_green().bold());
            println!("  Boards:     {}", boards.to_string().bright_green().bold());
            println!("  Orders:     {}", orders.to_string().bright_green().bold());
            println!();
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to apply migrations")?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

async fn seed(pool: PgPool, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Seed demo data?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let (state, clock) = app_state(pool);
    let outcome = seed_demo_data(&state, clock.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed: {}", e))?;

    match outcome {
        SeedOutcome::Seeded => println!("{}", "✅ Demo data seeded".green().bold()),
        SeedOutcome::Skipped => println!("{}", "⚠️  Database not empty, nothing seeded".yellow()),
    }

    Ok(())
}

async fn download(pool: PgPool, order_id: Uuid, out: Option<PathBuf>) -> Result<()> {
    let (state, _) = app_state(pool);
    let payload = state
        .order_service
        .download(order_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build snapshot: {}", e))?;

    let path = out.unwrap_or_default().join(&payload.file_name);
    std::fs::write(&path, &payload.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {}",
        "✅ Snapshot written to".green().bold(),
        path.display().to_string().bright_white()
    );

    Ok(())
}

/// Generates a random token: 32 bytes, base64url without padding.
fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
