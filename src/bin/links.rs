use tablegate::{app, config::LinksConfig, links};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let config = LinksConfig::from_env()?;
    tracing::info!(backends = ?config.backends, "link backends configured");

    let backends = links::LinkBackends::from_config(&config)?;
    app::serve(links::router(backends)).await
}
