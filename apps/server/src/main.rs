use anyhow::Context;
use circle_config::{load as load_config, AppConfig};
use circle_database::initialize_database;
use circle_gateway::{create_router, GatewayState, SessionCookieConfig};
use circle_runtime::{telemetry, BackendServices};
use clap::{Parser, Subcommand};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "circle-server")]
#[command(about = "Circle backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print every user with follower and following counts
    DumpUsers,
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::DumpUsers => dump_users(config).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting Circle backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.db_pool.clone(),
        services.users.clone(),
        SessionCookieConfig::from_auth_config(&config.auth),
        config.http.cors_allowed_origins.clone(),
    );
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(circle_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn dump_users(config: AppConfig) -> anyhow::Result<()> {
    let pool = initialize_database(&config.database)
        .await
        .context("failed to open database")?;

    let users = sqlx::query(
        r#"
        SELECT u.public_id, u.username, u.email, u.gender, u.created_at,
               (SELECT COUNT(*) FROM follows f WHERE f.followee_id = u.id) AS followers,
               (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following
        FROM users u
        ORDER BY u.id ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found in database");
        return Ok(());
    }

    println!("Found {} users:", users.len());
    println!(
        "{:<26} {:<20} {:<30} {:<8} {:<10} {:<10} {:<25}",
        "Public ID", "Username", "Email", "Gender", "Followers", "Following", "Created At"
    );
    println!("{}", "-".repeat(135));

    for user in users {
        let public_id: String = user.try_get("public_id")?;
        let username: String = user.try_get("username")?;
        let email: String = user.try_get("email")?;
        let gender: Option<String> = user.try_get("gender")?;
        let followers: i64 = user.try_get("followers")?;
        let following: i64 = user.try_get("following")?;
        let created_at: String = user.try_get("created_at")?;

        println!(
            "{:<26} {:<20} {:<30} {:<8} {:<10} {:<10} {:<25}",
            public_id,
            username,
            email,
            gender.as_deref().unwrap_or("NULL"),
            followers,
            following,
            created_at
        );
    }

    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let pool = initialize_database(&config.database)
        .await
        .context("failed to apply migrations")?;

    pool.close().await;
    info!(url = %config.database.url, "migrations applied");
    Ok(())
}
