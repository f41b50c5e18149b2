use avk_events_config::{error::AppResult, handler, service::config, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn run() -> AppResult<()> {
    let settings = config::load()?;
    let bind_addr = settings.server_addr();

    let state = AppState::new(settings).await?;
    state.uploads().ensure_dir().await?;
    tracing::info!(
        dir = %state.uploads().root().display(),
        mail = state.mailer().endpoint(),
        mail_security = ?state.mailer().security(),
        "collaborators ready"
    );

    let app = handler::app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Local development keeps its variables in `.env`; real env wins.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("startup failed: {}", err);
        std::process::exit(1);
    }
}
