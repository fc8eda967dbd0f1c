use anyhow::Result;
use solar_forecast::{app::App, config::Config, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let app = App::start(&cfg).await?;

    let addr = cfg.server.socket_addr()?;
    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0, forecast pages are reachable from the network");
    }
    info!(
        %addr,
        model = %cfg.model.artifact_path.display(),
        timezone = %cfg.site.timezone,
        "starting solar forecast service"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.router())
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    app.shutdown().await;
    warn!("shutdown complete");
    Ok(())
}
