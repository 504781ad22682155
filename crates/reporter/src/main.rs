use std::sync::Arc;

use collector::HttpTicketClient;
use common::{config::AppConfig, logging, AppError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;

    let client = Arc::new(HttpTicketClient::new(&config.api).map_err(AppError::http)?);
    reporter::run(&config, client)
        .await
        .map_err(AppError::report)?;
    Ok(())
}
