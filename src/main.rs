use std::net::SocketAddr;

use recruitment_tracker::{
    app,
    config::{get_config, init_config},
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recruitment_tracker=info,tower_http=info")),
        )
        .with(fmt::layer())
        .init();

    init_config()?;
    let config = get_config().clone();

    tokio::fs::create_dir_all(&config.candidates_dir).await?;
    tokio::fs::create_dir_all(&config.templates_dir).await?;
    info!(
        workbook = %config.workbook_path.display(),
        candidates = %config.candidates_dir.display(),
        templates = %config.templates_dir.display(),
        "Storage locations"
    );

    let addr: SocketAddr = config.server_address.parse()?;
    let app_state = AppState::new(config);
    let app = app(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
