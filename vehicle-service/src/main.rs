use anyhow::Context;
use vehicle_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config)?;

    let pool = create_pool(config.require_database()?)
        .await
        .context("connecting to the vehicle database")?;
    let store = PgVehicleStore::new(pool);

    let auth = config
        .auth
        .as_ref()
        .map(DealerAuth::new)
        .transpose()
        .context("loading dealer authentication key")?;
    if auth.is_none() {
        tracing::info!("Dealer authentication not configured; dealerID must be supplied by the caller");
    }

    let app = router(AppState::new(config.clone(), store), auth);
    Server::new(config).serve(app).await?;

    Ok(())
}
