use searchbot::error::BotError;

#[tokio::main]
async fn main() -> searchbot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("searchbot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting searchbot Discord bot");

    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| BotError::Config("Failed to install TLS crypto provider".to_string()))?;

    match searchbot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
