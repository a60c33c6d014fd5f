use anyhow::Result;
use invoice2erpnext::orchestrator::App;
use invoice2erpnext::utils::logging;
use invoice2erpnext::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    logging::init(config.verbose_logging);

    // Initialize and run the application
    App::initialize(config)?.run().await?;

    Ok(())
}
