use lookbook_api_rt::{
    logging::{init_logging, log_shutdown, log_store_ready},
    services::{database::ensure_schema, GalleryService, LookService},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let app_state = AppState::new().await?;

    tracing::info!("检查数据表...");
    if let Err(e) = ensure_schema(app_state.db.as_ref()).await {
        tracing::error!("建表失败: {}", e);
        return Err(e.into());
    }

    let (looks, galleries) = tokio::try_join!(
        LookService::count(&app_state.db),
        GalleryService::count(&app_state.db)
    )?;

    log_store_ready(looks, galleries);

    log_shutdown();
    Ok(())
}
