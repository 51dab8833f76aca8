use clap::Parser;
use cookshare::{
    api::{create_router, AppState},
    cli::{
        commands::{self, SearchOptions},
        Cli, Commands,
    },
    config::{seed, Settings},
    db, Error, Result,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cookshare=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Migrate => {
            migrate(settings).await?;
        }
        Commands::Seed { file } => {
            seed_database(settings, file).await?;
        }
        Commands::Search {
            query,
            cuisine,
            tags,
            difficulty,
            max_time,
            sort,
            page,
            limit,
        } => {
            let options = SearchOptions {
                query,
                cuisine,
                tags,
                difficulty,
                max_time,
                sort,
                page,
                limit,
            };
            commands::search(&settings.server_url(), &options).await?;
        }
        Commands::Suggest { ingredients } => {
            commands::suggest(&settings.server_url(), &ingredients).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting CookShare server");
    info!("Database: {}", settings.database.url);

    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    if let Ok(seed_path) = std::env::var("SEED_PATH") {
        if let Err(e) = seed::seed_from_file(&pool, &seed_path).await {
            warn!("Failed to seed from {}: {}", seed_path, e);
            warn!("Continuing without sample data");
        }
    }

    let state = AppState::new(pool, settings.clone());
    let app = create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn migrate(settings: Settings) -> Result<()> {
    info!("Running database migrations");

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed successfully");
    Ok(())
}

async fn seed_database(settings: Settings, file: PathBuf) -> Result<()> {
    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    let report = seed::seed_from_file(&pool, &file).await?;
    if report.skipped {
        println!("Database already has recipes, nothing seeded");
    } else {
        println!(
            "✓ Seeded {} recipes ({} errors)",
            report.inserted,
            report.errors.len()
        );
    }
    Ok(())
}
