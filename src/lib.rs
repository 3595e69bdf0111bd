pub mod api;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod game;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
pub use config::Config;
use db::Store;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let mut log_level = config.general.log_level.clone();
    if config.general.suppress_connection_errors {
        log_level.push_str(",hyper_util=off");
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "vulnquest")?
            .extra_field("env", "production")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "daemon" | "-d" | "--daemon" => run_daemon(config, prometheus_handle).await,

        "top" | "leaderboard" => {
            let limit = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);
            cmd_leaderboard(&config, limit).await
        }

        "user" | "u" => {
            if args.len() < 3 {
                println!("Usage: vulnquest user <username>");
                return Ok(());
            }
            cmd_user_info(&config, &args[2]).await
        }

        "init" => {
            if Config::create_default_if_missing()? {
                println!("Created config.toml with defaults");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        unknown => {
            println!("Unknown command: {unknown}");
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Vulnquest - Gamified Vulnerability Tracker");
    println!("Report bugs, clear quests, climb the leaderboard");
    println!();
    println!("USAGE:");
    println!("  vulnquest <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  daemon            Run the web API server");
    println!("  top [n]           Show the top n users (default: 10)");
    println!("  user <name>       Show a user's profile and achievements");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  vulnquest daemon              # Start the server");
    println!("  vulnquest top 25              # Top 25 leaderboard");
    println!("  vulnquest user admin          # Profile for 'admin'");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the server, database, and rewards.");
}

async fn run_daemon(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Vulnquest v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let shared = Arc::new(SharedState::new(config.clone()).await?);
    let api_state = api::create_app_state(shared, prometheus_handle);

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let port = config.server.port;
        info!("Starting Web API on port {}", port);

        let app = api::router(api_state).await;
        let addr = format!("0.0.0.0:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Some(tokio::spawn(async move {
            info!("Web Server running at http://0.0.0.0:{}", port);
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        None
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }
    info!("Daemon stopped");

    Ok(())
}

async fn cmd_leaderboard(config: &Config, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let (users, _) = store.leaderboard(1, limit.clamp(1, 100)).await?;

    if users.is_empty() {
        println!("No users yet.");
        return Ok(());
    }

    println!(
        "{:<5} {:<20} {:<6} {:<8} {:<12} {}",
        "#", "USER", "LVL", "EXP", "REPUTATION", "TITLE"
    );
    for (i, user) in users.iter().enumerate() {
        println!(
            "{:<5} {:<20} {:<6} {:<8} {:<12} {}",
            i + 1,
            user.username,
            user.level,
            user.exp,
            user.reputation,
            user.title
        );
    }

    Ok(())
}

async fn cmd_user_info(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(user) = store.get_user_by_username(username).await? else {
        println!("User '{username}' not found");
        return Ok(());
    };

    println!("{} [{}] (level {})", user.username, user.title, user.level);
    println!(
        "  exp: {}/{}  reputation: {}",
        user.exp,
        game::level_threshold(user.level),
        user.reputation
    );

    let reported = store.count_vulnerabilities_reported_by(user.id).await?;
    let resolved = store.count_vulnerabilities_resolved_by(user.id).await?;
    let quests = store.count_quests_completed_by(user.id).await?;
    println!("  reported: {reported}  resolved: {resolved}  quests cleared: {quests}");

    let unlocked = store.achievements_by_user(user.id).await?;
    if unlocked.is_empty() {
        println!("  no achievements yet");
    } else {
        println!("  achievements:");
        for (ua, achievement) in unlocked {
            let name = achievement.map_or_else(|| format!("#{}", ua.achievement_id), |a| a.name);
            println!("    {} ({})", name, ua.unlocked_at);
        }
    }

    Ok(())
}
