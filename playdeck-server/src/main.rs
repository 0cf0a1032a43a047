use anyhow::Result;
use clap::Parser;
use playdeck_auth::{AuthError, Role};
use playdeck_server::{create_app, PlaydeckServer};
use std::net::SocketAddr;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Playdeck HTTP API server
#[derive(Parser, Debug)]
#[command(name = "playdeck-server")]
#[command(about = "Playdeck game platform HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "3001", env = "API_PORT")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seed demo accounts at startup
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let environment =
        std::env::var("PLAYDECK_ENV").unwrap_or_else(|_| "development".to_string());
    init_tracing(args.verbose, &environment);

    info!("🎮 Starting Playdeck API server");
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION"));

    let server = PlaydeckServer::from_env().await?;

    if args.seed {
        seed_demo_accounts(&server).await?;
    }

    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🚀 Playdeck API running on http://{addr}");
    info!("📋 Health check available at: http://{addr}/health");
    info!("🔐 Authentication endpoints: http://{addr}/api/auth");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(verbose: bool, environment: &str) {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "playdeck_server={level},playdeck_auth={level},playdeck_scores={level},tower_http=info,sqlx=warn"
        ))
    });

    if environment == "production" {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_ansi(false).json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

/// Create the demo accounts the front-end README points people at. Safe to
/// run against an existing database; accounts that already exist are skipped.
async fn seed_demo_accounts(server: &PlaydeckServer) -> Result<()> {
    let accounts = [
        ("Admin User", "admin@example.com", Role::Admin),
        ("Moderator User", "moderator@example.com", Role::Moderator),
        ("Regular User", "user@example.com", Role::User),
    ];

    let mut created = 0;
    for (name, email, role) in accounts {
        match server
            .auth
            .register(playdeck_auth::RegisterUser {
                name: name.to_string(),
                email: email.to_string(),
                secret: "password123".to_string(),
                scheme: None,
            })
            .await
        {
            Ok(user) => {
                if role != Role::User {
                    server.auth.update_user(user.id, None, Some(role)).await?;
                }
                created += 1;
            }
            Err(AuthError::DuplicateEmail) => {
                debug!(%email, "seed account already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("✅ Seeded {created} demo accounts (secret: \"password123\")");
    Ok(())
}
