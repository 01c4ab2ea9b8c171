use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadcommander_backend::{build_router, config::Config, state::AppState};

fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None | Some("") => "<unset>".into(),
        Some(s) => {
            let prefix = s.chars().take(4).collect::<String>();
            format!("{}*** (len={})", prefix, s.len())
        }
    }
}

fn mask_database_url(url: Option<&str>) -> String {
    match url {
        None => "<unset>".into(),
        Some(url) => match url.split_once('@') {
            Some((_, host)) => format!("***@{}", host),
            None => url.to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadcommander_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        database_url = %mask_database_url(config.database_url.as_deref()),
        openai_api_key = %mask_secret(config.openai_api_key.as_deref()),
        openai_model = %config.openai_model,
        stripe_webhook_secret = %mask_secret(config.stripe_webhook_secret.as_deref()),
        data_dir = %config.data_dir.display(),
        log_dir = %config.log_dir.display(),
        payload_file_naming = ?config.payload_file_naming,
        "Loaded configuration from environment/.env"
    );

    let bind_addr = config.bind_addr;
    let state = AppState::from_config(config).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
