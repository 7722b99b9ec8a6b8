use imgrelay_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, spool, cloud client, routes)
    let (_state, router) = imgrelay_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    imgrelay_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
