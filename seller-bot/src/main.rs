use anyhow::Context as _;
use dialog_flow::InMemorySessionStorage;
use parts_api::PartsApi;
use seller_bot::{AppState, BotConfig, IntentDispatcher, LogFormat, build_router, dialogs};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "seller_bot=debug,dialog_flow=debug,parts_api=debug,tower_http=debug".into()
    });

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BotConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    info!(
        base_url = %config.api.base_url,
        partner_id = %config.credentials.partner.id,
        user_id = %config.credentials.user.id,
        "starting seller bot"
    );

    let api = Arc::new(
        PartsApi::new(config.api.clone(), config.credentials.clone())
            .context("failed to build the parts API client")?,
    );
    let dispatcher = IntentDispatcher::new(
        dialogs::build_dialogs(api.clone(), &config.credentials),
        api,
        Arc::new(InMemorySessionStorage::new()),
    );

    let app = build_router(AppState {
        dispatcher: Arc::new(dispatcher),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
