pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod state;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, HabitCommands, ProgressCommands};
use client::HabitPatch;
pub use config::Config;

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &config.source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => run_server(config).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("Created config.toml with default settings");
            } else {
                println!("config.toml already exists, leaving it alone");
            }
            Ok(())
        }

        Commands::ResetDb => cli::cmd_reset_db(&config).await,

        Commands::Register {
            username,
            email,
            password,
        } => cli::cmd_register(&config, &username, &email, &password).await,

        Commands::Login { username, password } => {
            cli::cmd_login(&config, &username, &password).await
        }

        Commands::Logout => cli::cmd_logout(&config),

        Commands::Habit { command } => match command {
            HabitCommands::Add {
                name,
                category,
                target,
            } => cli::cmd_habit_add(&config, &name, category.as_deref(), target).await,
            HabitCommands::List => cli::cmd_habit_list(&config).await,
            HabitCommands::Show { id } => cli::cmd_habit_show(&config, id).await,
            HabitCommands::Update {
                id,
                name,
                category,
                target,
            } => {
                let patch = HabitPatch {
                    name,
                    category,
                    target_per_day: target,
                };
                cli::cmd_habit_update(&config, id, patch).await
            }
            HabitCommands::Remove { id } => cli::cmd_habit_remove(&config, id).await,
        },

        Commands::Progress { command } => match command {
            ProgressCommands::Log {
                habit_id,
                amount,
                date,
            } => cli::cmd_progress_log(&config, habit_id, amount, date).await,
            ProgressCommands::List { habit } => cli::cmd_progress_list(&config, habit).await,
        },
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("habitrack v{} starting...", env!("CARGO_PKG_VERSION"));

    let state = api::create_app_state_from_config(config.clone()).await?;
    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API listening at http://{addr}");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {e}");
        }
    });

    info!("Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {e}"),
    }

    server_handle.abort();
    info!("Server stopped");

    Ok(())
}
