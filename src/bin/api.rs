use tablegate::{app, config::GatewayConfig, db, gateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let config = GatewayConfig::from_env()?;
    let pool = db::connect(&config.db).await?;
    db::migrate(&pool).await;

    let state = gateway::GatewayState::new(pool, &config);
    app::serve(gateway::router(state)).await
}
