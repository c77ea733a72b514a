use qugate_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (record store, state, routes)
    let (_state, router) = qugate_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    qugate_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
