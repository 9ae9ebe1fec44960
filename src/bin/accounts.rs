use tablegate::{accounts, app, config::AccountsConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let config = AccountsConfig::from_env()?;
    let pool = db::connect(&config.db).await?;
    db::migrate(&pool).await;

    let state = accounts::AccountsState::new(pool, &config)?;
    app::serve(accounts::router(state)).await
}
