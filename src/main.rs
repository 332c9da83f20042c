use anyhow::Context;
use log::info;

use parley::api::ChatClient;
use parley::config::{get_config, initialize_config};
use parley::logging::init_logging;
use parley::ui::run_ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    initialize_config().context("failed to initialize configuration")?;
    let config = get_config();

    let _logger = init_logging(&config.log_level).context("failed to start logging")?;
    info!("parley starting, endpoint: {}", config.endpoint);

    let client = ChatClient::new(config.endpoint);
    run_ui(client).await
}
